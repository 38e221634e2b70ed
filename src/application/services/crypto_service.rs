//! CryptoMate commands: quotes from the price API plus stored price alerts.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::{CommandError, QuoteError};
use crate::application::formatter;
use crate::application::services::{sender_id, CommandService};
use crate::domain::entities::{Command, Message, NewAlert, PriceAlert};
use crate::domain::traits::{QuoteSource, ResourceStore};

/// Coin identifiers and currency codes go into request URLs verbatim.
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._-]{0,63}$").expect("identifier pattern compiles")
});

const USAGE_PRICE: &str = "❌ Usage: /price [coin]";
const USAGE_TOP: &str = "❌ Usage: /top [quantity]";
const USAGE_CONVERT: &str = "❌ Usage: /convert [amount] [from] [to]\nExample: /convert 1 bitcoin usd";
const USAGE_ALERT: &str = "❌ Usage: /alert [coin] [target_price]\nExample: /alert bitcoin 100000";
const USAGE_DELALERT: &str = "❌ Usage: /delalert [alert_id]";

/// Dependencies shared by every CryptoMate handler.
#[derive(Clone)]
pub struct CryptoContext {
    pub alerts: Arc<dyn ResourceStore<PriceAlert>>,
    pub quotes: Arc<dyn QuoteSource>,
    pub max_top: u32,
}

pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Register all CryptoMate commands, followed by `/start` and `/help`.
pub fn register_crypto_commands(commands: &mut CommandService, ctx: CryptoContext) {
    let c = ctx.clone();
    commands.register(Command::new("price")
        .with_description("Get coin's price in USD")
        .with_usage("/price [coin]")
        .with_handler(move |msg| price(c.clone(), msg)));

    let c = ctx.clone();
    commands.register(Command::new("top")
        .with_description("Retrieve the top cryptocurrencies by market capitalization")
        .with_usage("/top [quantity]")
        .with_handler(move |msg| top(c.clone(), msg)));

    let c = ctx.clone();
    commands.register(Command::new("convert")
        .with_description("Convert an amount of a cryptocurrency into another currency")
        .with_usage("/convert [amount] [from_coin] [to_currency]")
        .with_handler(move |msg| convert(c.clone(), msg)));

    let c = ctx.clone();
    commands.register(Command::new("alert")
        .with_description("Save a target price for a coin")
        .with_usage("/alert [coin] [target_price]")
        .with_handler(move |msg| alert(c.clone(), msg)));

    let c = ctx.clone();
    commands.register(Command::new("alerts")
        .with_description("List your saved alerts")
        .with_handler(move |msg| list_alerts(c.clone(), msg)));

    let c = ctx;
    commands.register(Command::new("delalert")
        .with_description("Delete one of your alerts")
        .with_usage("/delalert [alert_id]")
        .with_aliases(vec!["deletealert".to_string()])
        .with_handler(move |msg| delete_alert(c.clone(), msg)));

    commands.register_defaults(formatter::crypto_welcome);
}

async fn price(ctx: CryptoContext, msg: Message) -> Result<String, CommandError> {
    let coin = msg.content.args().join(" ").to_lowercase();
    if coin.is_empty() {
        return Err(CommandError::InvalidArgs(USAGE_PRICE.to_string()));
    }
    if !is_identifier(&coin) {
        return Err(CommandError::NotFound(formatter::INVALID_COIN.to_string()));
    }

    match ctx.quotes.get_price(&coin).await {
        Ok(price) => Ok(formatter::price(&coin, price)),
        Err(QuoteError::NotFound(_)) => {
            // Maybe a ticker symbol rather than an id
            let id = match ctx.quotes.resolve_symbol(&coin).await {
                Ok(Some(id)) => id,
                Ok(None) => return Err(CommandError::NotFound(formatter::INVALID_COIN.to_string())),
                Err(e) => {
                    tracing::warn!("Symbol lookup for {} failed: {}", coin, e);
                    return Err(CommandError::NotFound(formatter::INVALID_COIN.to_string()));
                }
            };
            tracing::debug!("Resolved symbol {} to {}", coin, id);
            match ctx.quotes.get_price(&id).await {
                Ok(price) => Ok(formatter::price(&id, price)),
                Err(QuoteError::NotFound(_)) => Err(CommandError::NotFound(formatter::INVALID_COIN.to_string())),
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

async fn top(ctx: CryptoContext, msg: Message) -> Result<String, CommandError> {
    let Some(raw) = msg.content.args().first() else {
        return Err(CommandError::InvalidArgs(USAGE_TOP.to_string()));
    };

    let requested: u32 = match raw.parse() {
        Ok(n) if n > 0 => n,
        _ => {
            return Err(CommandError::InvalidArgs(
                "❌ Please enter a positive whole number, e.g. /top 10".to_string(),
            ))
        }
    };

    let n = requested.min(ctx.max_top);
    if n < requested {
        tracing::debug!("Clamping /top {} to {}", requested, n);
    }

    let entries = ctx.quotes.get_top(n).await?;
    Ok(formatter::top(n, &entries))
}

async fn convert(ctx: CryptoContext, msg: Message) -> Result<String, CommandError> {
    let args = msg.content.args();
    if args.len() != 3 {
        return Err(CommandError::InvalidArgs(USAGE_CONVERT.to_string()));
    }

    let amount: f64 = match args[0].parse() {
        Ok(v) if f64::is_finite(v) => v,
        _ => {
            return Err(CommandError::InvalidArgs(
                "❌ Please enter a valid number for the amount.".to_string(),
            ))
        }
    };
    let from = args[1].to_lowercase();
    let to = args[2].to_lowercase();

    if !is_identifier(&from) {
        return Err(CommandError::NotFound(formatter::INVALID_SOURCE.to_string()));
    }
    if !is_identifier(&to) {
        return Err(CommandError::NotFound(formatter::INVALID_PAIR.to_string()));
    }

    match ctx.quotes.convert(amount, &from, &to).await {
        Ok(converted) => Ok(formatter::conversion(amount, &from, converted, &to)),
        Err(QuoteError::NotFound(what)) if what == from => {
            Err(CommandError::NotFound(formatter::INVALID_SOURCE.to_string()))
        }
        Err(QuoteError::NotFound(_)) => Err(CommandError::NotFound(formatter::INVALID_PAIR.to_string())),
        Err(e) => Err(e.into()),
    }
}

async fn alert(ctx: CryptoContext, msg: Message) -> Result<String, CommandError> {
    let user_id = sender_id(&msg)?;
    let args = msg.content.args();
    if args.len() != 2 {
        return Err(CommandError::InvalidArgs(USAGE_ALERT.to_string()));
    }

    let coin = args[0].to_lowercase();
    if !is_identifier(&coin) {
        return Err(CommandError::InvalidArgs(formatter::INVALID_COIN.to_string()));
    }
    let target_price: f64 = match args[1].parse() {
        Ok(v) if f64::is_finite(v) => v,
        _ => {
            return Err(CommandError::InvalidArgs(
                "❌ Please enter a valid number for the target price.".to_string(),
            ))
        }
    };

    let id = ctx.alerts.create(user_id, NewAlert::new(coin.clone(), target_price))?;
    tracing::info!("Saved alert {} for user {}: {} @ {}", id, user_id, coin, target_price);
    Ok(formatter::alert_set(id, &coin, target_price))
}

async fn list_alerts(ctx: CryptoContext, msg: Message) -> Result<String, CommandError> {
    let user_id = sender_id(&msg)?;
    let alerts = ctx.alerts.list(user_id)?;
    Ok(formatter::alert_list(&alerts))
}

async fn delete_alert(ctx: CryptoContext, msg: Message) -> Result<String, CommandError> {
    let user_id = sender_id(&msg)?;
    let Some(raw) = msg.content.args().first() else {
        return Err(CommandError::InvalidArgs(USAGE_DELALERT.to_string()));
    };
    let alert_id: i64 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArgs("Invalid alert ID.".to_string()))?;

    let removed = ctx.alerts.delete(alert_id, user_id)?;
    Ok(formatter::alert_deleted(alert_id, removed))
}
