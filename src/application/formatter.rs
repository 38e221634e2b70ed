//! Reply formatting - turns command outcomes into chat text.
//!
//! Everything here is pure and infallible.

use crate::application::errors::CommandError;
use crate::domain::entities::{PriceAlert, Task};
use crate::domain::traits::MarketEntry;

pub const INVALID_COIN: &str = "Invalid coin. Try the whole name, i.e. bitcoin or ethereum";
pub const INVALID_SOURCE: &str = "Invalid source currency.\nExamples: bitcoin, ethereum, binancecoin, etc.";
pub const INVALID_PAIR: &str = "Invalid currency pair.\nExample: bitcoin usd";
pub const TRY_AGAIN: &str = "⚠️ Something went wrong on my side. Please try again later.";

/// Float in shortest round-trip form, always with a decimal point (`2.0`).
pub fn format_amount(value: f64) -> String {
    format!("{:?}", value)
}

pub fn crypto_welcome(help: &str) -> String {
    format!("📝 Welcome to CryptoMate Bot!\n\n{}", help)
}

pub fn tasky_welcome(help: &str) -> String {
    format!("📝 Welcome to To-Do Bot!\n\n{}", help)
}

pub fn price(coin: &str, price: f64) -> String {
    format!("{}: ${}", coin, price)
}

pub fn top(requested: u32, entries: &[MarketEntry]) -> String {
    let list: Vec<String> = entries
        .iter()
        .map(|e| format!("{}. {} ({})", e.rank, e.name, e.symbol.to_uppercase()))
        .collect();
    format!("Top {} coins:\n{}", requested, list.join("\n"))
}

pub fn conversion(amount: f64, from: &str, converted: f64, to: &str) -> String {
    format!(
        "{} {} -> {} {}",
        format_amount(amount),
        from.to_uppercase(),
        format_amount(converted),
        to.to_uppercase()
    )
}

pub fn alert_set(alert_id: i64, coin: &str, target_price: f64) -> String {
    format!(
        "🔔 Alert #{} saved: {} target ${:.2}.",
        alert_id,
        coin.to_uppercase(),
        target_price
    )
}

pub fn alert_list(alerts: &[PriceAlert]) -> String {
    if alerts.is_empty() {
        return "No alerts found. Use /alert to set one.".to_string();
    }
    let list: Vec<String> = alerts
        .iter()
        .map(|a| format!("{}. {} @ ${:.2}", a.id, a.coin.to_uppercase(), a.target_price))
        .collect();
    format!("Your alerts:\n{}", list.join("\n"))
}

pub fn alert_deleted(alert_id: i64, removed: bool) -> String {
    if removed {
        format!("Alert {} deleted.", alert_id)
    } else {
        format!("Alert {} not found.", alert_id)
    }
}

pub fn task_added(task: &str) -> String {
    format!("Task added: {}", task)
}

pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found. Use /add to add a task.".to_string();
    }
    let list: Vec<String> = tasks.iter().map(|t| format!("{}. {}", t.id, t.task)).collect();
    format!("Your To-Do List:\n{}", list.join("\n"))
}

pub fn task_deleted(task_id: i64, removed: bool) -> String {
    if removed {
        format!("Task {} deleted.", task_id)
    } else {
        format!("Task {} not found.", task_id)
    }
}

/// Reply for a failed command. Validation and not-found errors carry their own
/// user text; anything else gets a generic apology.
pub fn error(err: &CommandError) -> String {
    if err.is_user_facing() {
        err.to_string()
    } else {
        TRY_AGAIN.to_string()
    }
}
