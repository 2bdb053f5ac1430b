//! Universe tickers and exchange products.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One asset row from the capitalization-ranked universe.
///
/// Both percent-change fields are optional upstream; [`pct_change_24h`]
/// resolves them in preference order. Unknown fields are ignored so the
/// provider can add columns without breaking us.
///
/// [`pct_change_24h`]: MarketTicker::pct_change_24h
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketTicker {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h_in_currency: Option<f64>,
}

impl MarketTicker {
    /// Uppercase the symbol and backfill a missing name from it.
    pub fn normalize(&mut self) {
        self.symbol = self.symbol.to_uppercase();
        if self.name.trim().is_empty() {
            self.name = self.symbol.clone();
        }
    }

    /// 24h quote volume; missing means zero.
    pub fn volume(&self) -> f64 {
        self.total_volume.unwrap_or(0.0)
    }

    /// 24h percent change: plain field first, then the in-currency
    /// variant, then zero.
    pub fn pct_change_24h(&self) -> f64 {
        self.price_change_percentage_24h
            .or(self.price_change_percentage_24h_in_currency)
            .unwrap_or(0.0)
    }
}

/// One tradable product as the exchange lists it, e.g. `ETH-USD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
}

/// Base symbol (uppercase) to product id, for one quote currency.
pub type PairMap = BTreeMap<String, String>;

/// Keep only products quoted in `quote` and index them by base symbol.
/// A base listed twice keeps the later entry.
pub fn quote_pair_map(products: &[Product], quote: &str) -> PairMap {
    let suffix = format!("-{}", quote.to_uppercase());
    let mut map = PairMap::new();
    for product in products {
        if !product.id.ends_with(&suffix) {
            continue;
        }
        if let Some(base) = product.id.split('-').next() {
            map.insert(base.to_uppercase(), product.id.clone());
        }
    }
    map
}
