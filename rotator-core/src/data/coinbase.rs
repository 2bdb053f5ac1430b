//! Coinbase Exchange client: product listings and candle history.
//!
//! Candles arrive newest first as `[time, low, high, open, close,
//! volume]` rows. They are reversed here so every consumer sees a
//! chronological series, then truncated to the most recent `limit` bars.

use super::http;
use super::provider::{ExchangeSource, MarketDataError};
use crate::domain::{Bar, Product};

pub const DEFAULT_COINBASE_BASE: &str = "https://api.exchange.coinbase.com";

/// One candle row in the exchange's field order.
type RawCandle = (i64, f64, f64, f64, f64, f64);

pub struct CoinbaseClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl CoinbaseClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http::build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ExchangeSource for CoinbaseClient {
    fn products(&self) -> Result<Vec<Product>, MarketDataError> {
        let url = format!("{}/products", self.base_url);
        http::get_json(&self.client, &url, &[])
    }

    fn candles(
        &self,
        product_id: &str,
        granularity_secs: u32,
        limit: usize,
    ) -> Result<Option<Vec<Bar>>, MarketDataError> {
        let url = format!("{}/products/{product_id}/candles", self.base_url);
        let granularity = granularity_secs.to_string();
        let rows: Vec<RawCandle> =
            http::get_json(&self.client, &url, &[("granularity", granularity.as_str())])?;
        if rows.is_empty() {
            return Ok(None);
        }

        let mut bars = Vec::with_capacity(rows.len());
        for &(time, low, high, open, close, volume) in &rows {
            let time = chrono::DateTime::from_timestamp(time, 0)
                .ok_or_else(|| MarketDataError::Decode(format!("bad candle timestamp: {time}")))?;
            bars.push(Bar {
                time,
                open,
                high,
                low,
                close,
                volume,
            });
        }
        bars.reverse();
        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
        }
        Ok(Some(bars))
    }
}
