//! Relative Strength Index.
//!
//! Gains and losses are smoothed with the recursion
//! `s[i] = alpha * x[i] + (1 - alpha) * s[i-1]` where `alpha = 1/period`,
//! seeded directly at the first price change (no warmup average). When
//! the smoothed loss is exactly zero the ratio is undefined and the slot
//! stays NaN, so a series that has only ever risen reports no RSI rather
//! than 100.

/// RSI of a close series. Slot 0 is always NaN; slot `i` uses changes up
/// to and including `closes[i]`.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if n < 2 {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let first = closes[1] - closes[0];
    let mut up = if first > 0.0 { first } else { 0.0 };
    let mut down = if first < 0.0 { -first } else { 0.0 };
    result[1] = rsi_from(up, down);

    for i in 2..n {
        let change = closes[i] - closes[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        up = alpha * gain + (1.0 - alpha) * up;
        down = alpha * loss + (1.0 - alpha) * down;
        result[i] = rsi_from(up, down);
    }
    result
}

fn rsi_from(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        f64::NAN
    } else {
        100.0 - 100.0 / (1.0 + up / down)
    }
}
