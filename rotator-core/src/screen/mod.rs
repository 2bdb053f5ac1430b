//! The screening pipeline: eligibility filter, composite ranking, and
//! advisory price levels.

pub mod advice;
pub mod filter;
pub mod rank;

pub use advice::{trade_plan, MOMENTUM_RSI};
pub use filter::{evaluate_ticker, screen_universe, ScreenOutcome, STABLECOINS};
pub use rank::{composite_score, rank_top};

use serde::{Deserialize, Serialize};

/// Fully-resolved screening thresholds for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Moving-average period for the trend gate.
    pub ma_period: usize,
    /// RSI must exceed this to pass.
    pub rsi_threshold: f64,
    /// ATR as a percent of close must exceed this to pass.
    pub atr_pct_min: f64,
    /// Minimum 24h quote volume in USD.
    pub min_volume_usd: f64,
    /// Minimum 24h percent change.
    pub min_pct_24h: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ma_period: 20,
            rsi_threshold: 55.0,
            atr_pct_min: 1.5,
            min_volume_usd: 50_000_000.0,
            min_pct_24h: 3.0,
        }
    }
}

impl Thresholds {
    /// Bars a series must have before it is usable. The oscillators need
    /// their own warmup even when the MA period is short.
    pub fn min_history(&self) -> usize {
        self.ma_period.max(50)
    }
}
