//! Upstream market-data clients and the traits they implement.

pub mod coinbase;
pub mod coingecko;
mod http;
pub mod provider;

pub use coinbase::{CoinbaseClient, DEFAULT_COINBASE_BASE};
pub use coingecko::{CoinGeckoClient, DEFAULT_COINGECKO_BASE};
pub use provider::{ExchangeSource, MarketDataError, UniverseSource};
