//! CoinGecko quote client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::application::errors::QuoteError;
use crate::domain::traits::{MarketEntry, QuoteSource};
use crate::infrastructure::config::QuotesConfig;

/// CoinGecko public API base URL
pub const API_BASE: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct MarketRow {
    market_cap_rank: Option<u32>,
    name: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct CoinListRow {
    id: String,
    symbol: String,
}

/// Read-only client for the CoinGecko v3 API
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(config: &QuotesConfig) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("mate-bots/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            vs_currency: config.vs_currency.clone(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, QuoteError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(QuoteError::UpstreamUnavailable(format!(
                "CoinGecko returned {} for {}",
                response.status(),
                path
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QuoteError::UpstreamUnavailable(format!("Invalid JSON from {}: {}", path, e)))
    }

    async fn simple_price(&self, coin: &str, currency: &str) -> Result<f64, QuoteError> {
        let body = self
            .get_json(
                "/simple/price",
                &[("ids", coin.to_string()), ("vs_currencies", currency.to_string())],
            )
            .await?;
        parse_simple_price(&body, coin, currency)
    }
}

/// Extract `body[coin][currency]`.
///
/// A missing coin yields `NotFound(coin)`; a known coin without that currency
/// yields `NotFound("coin/currency")`.
pub fn parse_simple_price(body: &Value, coin: &str, currency: &str) -> Result<f64, QuoteError> {
    let Some(entry) = body.get(coin) else {
        return Err(QuoteError::NotFound(coin.to_string()));
    };

    match entry.get(currency) {
        Some(value) => value.as_f64().ok_or_else(|| {
            QuoteError::UpstreamUnavailable(format!("Non-numeric price for {}/{}: {}", coin, currency, value))
        }),
        None => Err(QuoteError::NotFound(format!("{}/{}", coin, currency))),
    }
}

/// Parse a `/coins/markets` listing. Rows without a rank take their position.
pub fn parse_markets(body: Value) -> Result<Vec<MarketEntry>, QuoteError> {
    let rows: Vec<MarketRow> = serde_json::from_value(body)
        .map_err(|e| QuoteError::UpstreamUnavailable(format!("Unexpected markets payload: {}", e)))?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| MarketEntry {
            rank: row.market_cap_rank.unwrap_or(i as u32 + 1),
            name: row.name,
            symbol: row.symbol,
        })
        .collect())
}

/// Find the id of the first coin listed under `symbol`.
pub fn find_coin_id(body: Value, symbol: &str) -> Result<Option<String>, QuoteError> {
    let rows: Vec<CoinListRow> = serde_json::from_value(body)
        .map_err(|e| QuoteError::UpstreamUnavailable(format!("Unexpected coin list payload: {}", e)))?;

    Ok(rows
        .into_iter()
        .find(|row| row.symbol.eq_ignore_ascii_case(symbol))
        .map(|row| row.id))
}

#[async_trait]
impl QuoteSource for CoinGeckoClient {
    async fn get_price(&self, coin: &str) -> Result<f64, QuoteError> {
        self.simple_price(coin, &self.vs_currency).await
    }

    async fn get_top(&self, n: u32) -> Result<Vec<MarketEntry>, QuoteError> {
        let body = self
            .get_json(
                "/coins/markets",
                &[
                    ("vs_currency", self.vs_currency.clone()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", n.to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;
        parse_markets(body)
    }

    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, QuoteError> {
        let rate = self.simple_price(from, to).await?;
        Ok(amount * rate)
    }

    async fn resolve_symbol(&self, symbol: &str) -> Result<Option<String>, QuoteError> {
        let body = self.get_json("/coins/list", &[]).await?;
        find_coin_id(body, symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simple_price_reads_nested_value() {
        let body = json!({ "bitcoin": { "usd": 50000 } });
        assert_eq!(parse_simple_price(&body, "bitcoin", "usd").unwrap(), 50000.0);
    }

    #[test]
    fn simple_price_distinguishes_unknown_coin_and_pair() {
        let empty = json!({});
        match parse_simple_price(&empty, "doesnotexist", "usd") {
            Err(QuoteError::NotFound(what)) => assert_eq!(what, "doesnotexist"),
            other => panic!("unexpected: {:?}", other),
        }

        let no_currency = json!({ "bitcoin": {} });
        match parse_simple_price(&no_currency, "bitcoin", "xyz") {
            Err(QuoteError::NotFound(what)) => assert_eq!(what, "bitcoin/xyz"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn markets_keep_upstream_order_and_rank() {
        let body = json!([
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "market_cap_rank": 1, "current_price": 50000 },
            { "id": "ethereum", "symbol": "eth", "name": "Ethereum", "market_cap_rank": 2 },
            { "id": "fresh", "symbol": "new", "name": "Fresh", "market_cap_rank": null }
        ]);

        let entries = parse_markets(body).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], MarketEntry { rank: 1, name: "Bitcoin".to_string(), symbol: "btc".to_string() });
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn markets_reject_error_objects() {
        let body = json!({ "status": { "error_code": 429, "error_message": "rate limited" } });
        assert!(matches!(parse_markets(body), Err(QuoteError::UpstreamUnavailable(_))));
    }

    #[test]
    fn coin_list_maps_symbol_to_id() {
        let body = json!([
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" },
            { "id": "ethereum", "symbol": "eth", "name": "Ethereum" }
        ]);

        assert_eq!(find_coin_id(body.clone(), "BTC").unwrap(), Some("bitcoin".to_string()));
        assert_eq!(find_coin_id(body, "doge").unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // Requires network access to api.coingecko.com
    async fn live_bitcoin_price() {
        let client = CoinGeckoClient::new(&QuotesConfig::default()).expect("client builds");
        let price = client.get_price("bitcoin").await.expect("price fetched");
        assert!(price > 0.0);
    }
}
