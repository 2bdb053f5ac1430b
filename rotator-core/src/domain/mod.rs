//! Domain types shared across the crate.

pub mod bar;
pub mod candidate;
pub mod market;
pub mod timeframe;

pub use bar::Bar;
pub use candidate::{Advice, Candidate, Direction, Recommendation, Skip, SkipReason};
pub use market::{quote_pair_map, MarketTicker, PairMap, Product};
pub use timeframe::Timeframe;
