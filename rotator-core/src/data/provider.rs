//! Market-data source traits and errors.

use thiserror::Error;

use crate::domain::{Bar, MarketTicker, Product};

/// Errors that can occur while talking to an upstream market-data API.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("unexpected response format: {0}")]
    Decode(String),
}

/// Capitalization-ranked universe of assets quoted in one fiat currency.
pub trait UniverseSource: Send + Sync {
    /// The top page of the universe, largest market cap first.
    fn top_markets(&self) -> Result<Vec<MarketTicker>, MarketDataError>;
}

/// Exchange product listings and per-product candle history.
pub trait ExchangeSource: Send + Sync {
    /// Every product the exchange lists, all quote currencies included.
    fn products(&self) -> Result<Vec<Product>, MarketDataError>;

    /// Up to `limit` most recent bars at `granularity_secs`, oldest
    /// first. `Ok(None)` means the exchange has no history for the
    /// product; transport and decode problems are errors.
    fn candles(
        &self,
        product_id: &str,
        granularity_secs: u32,
        limit: usize,
    ) -> Result<Option<Vec<Bar>>, MarketDataError>;
}
