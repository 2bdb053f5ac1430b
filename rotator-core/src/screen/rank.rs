//! Composite momentum score and top-N selection.

use std::cmp::Ordering;

use crate::domain::Candidate;

use super::Thresholds;

/// Weighted momentum score. The 24h move dominates; RSI and ATR%
/// contribute only their margin above the configured gates, floored at
/// zero so nothing below a gate can subtract.
pub fn composite_score(pct_24h: f64, rsi: f64, atr_pct: f64, thresholds: &Thresholds) -> f64 {
    0.7 * pct_24h
        + 0.2 * (rsi - thresholds.rsi_threshold).max(0.0)
        + 0.1 * (atr_pct - thresholds.atr_pct_min).max(0.0)
}

/// Sort by score, best first, and keep the first `top_n`.
///
/// The sort is stable, so equal scores keep their universe order from
/// the upstream market-cap ranking.
pub fn rank_top(mut candidates: Vec<Candidate>, top_n: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(top_n);
    candidates
}
