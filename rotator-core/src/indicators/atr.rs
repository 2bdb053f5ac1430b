//! Average True Range, absolute and as a percent of close.

use crate::domain::Bar;

/// True range per bar. The first bar has no previous close, so its true
/// range is just `high - low`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut result = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            let prev_close = bars[i - 1].close;
            (bar.high - bar.low)
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        };
        result.push(tr);
    }
    result
}

/// Exponential smoothing with `alpha = 1/period`, seeded at the first
/// value. Defined from slot 0, unlike the window indicators.
pub fn ewm_smooth(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "smoothing period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n == 0 {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let mut prev = values[0];
    result[0] = prev;
    for i in 1..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }
    result
}

/// ATR: smoothed true range.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    ewm_smooth(&true_range(bars), period)
}

/// ATR as a percent of the same bar's close. A zero close would make the
/// ratio meaningless, so that slot reports NaN.
pub fn atr_pct(bars: &[Bar], period: usize) -> Vec<f64> {
    atr(bars, period)
        .into_iter()
        .zip(bars)
        .map(|(a, bar)| {
            if bar.close == 0.0 {
                f64::NAN
            } else {
                a / bar.close * 100.0
            }
        })
        .collect()
}
