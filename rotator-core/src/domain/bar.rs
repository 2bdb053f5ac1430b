//! OHLCV candle bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single candle. Series are always ordered oldest first; clients that
/// receive newest-first data reverse it before it gets here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Open time of the candle, UTC.
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Base-asset volume over the candle.
    pub volume: f64,
}
