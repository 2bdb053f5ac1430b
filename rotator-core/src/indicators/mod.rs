//! Technical indicators over candle series.
//!
//! All indicators return one output slot per input bar and use NaN for
//! slots that cannot be computed yet (warmup) or are undefined. Consumers
//! convert NaN to `Option::None` at the frame boundary; NaN never crosses
//! a public API as a "real" value.

pub mod atr;
pub mod frame;
pub mod rsi;
pub mod sma;

pub use atr::{atr, atr_pct, ewm_smooth, true_range};
pub use frame::{IndicatorFrame, OSCILLATOR_PERIOD};
pub use rsi::rsi;
pub use sma::sma;

/// Build hourly bars from a close series for tests. Open carries the
/// previous close; highs and lows get a one-unit wick.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;

    let start = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                time: start + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual} (epsilon {epsilon})"
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
