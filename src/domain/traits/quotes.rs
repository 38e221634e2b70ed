use async_trait::async_trait;
use crate::application::errors::QuoteError;

/// One row of the market-cap ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketEntry {
    pub rank: u32,
    pub name: String,
    pub symbol: String,
}

/// Read-only source of crypto quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// USD price of a coin identifier.
    async fn get_price(&self, coin: &str) -> Result<f64, QuoteError>;

    /// Top `n` assets by market capitalisation, best first.
    async fn get_top(&self, n: u32) -> Result<Vec<MarketEntry>, QuoteError>;

    /// `amount` of `from` expressed in `to`.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, QuoteError>;

    /// Map a ticker symbol such as `btc` to a coin identifier.
    async fn resolve_symbol(&self, symbol: &str) -> Result<Option<String>, QuoteError>;
}
