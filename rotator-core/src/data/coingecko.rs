//! CoinGecko universe client.
//!
//! One call per run: the top page of `/coins/markets` ordered by market
//! capitalization, which carries 24h volume and percent change alongside
//! each asset. Symbols are uppercased on the way in.

use super::http;
use super::provider::{MarketDataError, UniverseSource};
use crate::domain::MarketTicker;

pub const DEFAULT_COINGECKO_BASE: &str = "https://api.coingecko.com/api/v3";

/// Assets requested per page. One page is the whole universe.
const UNIVERSE_PAGE_SIZE: u32 = 100;

pub struct CoinGeckoClient {
    client: reqwest::blocking::Client,
    base_url: String,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, vs_currency: &str) -> Self {
        Self {
            client: http::build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            vs_currency: vs_currency.to_lowercase(),
        }
    }
}

impl UniverseSource for CoinGeckoClient {
    fn top_markets(&self) -> Result<Vec<MarketTicker>, MarketDataError> {
        let url = format!("{}/coins/markets", self.base_url);
        let per_page = UNIVERSE_PAGE_SIZE.to_string();
        let query = [
            ("vs_currency", self.vs_currency.as_str()),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("price_change_percentage", "24h"),
            ("sparkline", "false"),
        ];

        let mut markets: Vec<MarketTicker> = http::get_json(&self.client, &url, &query)?;
        for ticker in &mut markets {
            ticker.normalize();
        }
        Ok(markets)
    }
}
