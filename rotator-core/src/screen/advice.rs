//! Advisory price levels for ranked candidates.
//!
//! Levels are derived from a fresh full-depth series so the entry
//! reflects the latest close, while MA, RSI, and ATR% come from the
//! candidate as screened. Too little history means no advisory at all;
//! the candidate still ranks.

use crate::domain::{Advice, Bar, Candidate, Recommendation};

/// RSI gate for the momentum-buy call. Fixed on purpose; the screening
/// threshold can be tuned per timeframe, this one cannot.
pub const MOMENTUM_RSI: f64 = 55.0;

/// A series must be strictly longer than this to get levels.
pub const MIN_ADVICE_BARS: usize = 50;

/// Swing-high lookback for the second take-profit.
const SWING_WINDOW: usize = 20;

const STOP_MULT: f64 = 1.5;
const TP1_MULT: f64 = 1.0;
const TP2_MULT: f64 = 2.0;

/// Compute levels for `candidate` from `bars`. Returns `None` when the
/// series is too short or the candidate is missing indicator values.
pub fn trade_plan(candidate: &Candidate, bars: &[Bar]) -> Option<Advice> {
    if bars.len() <= MIN_ADVICE_BARS {
        return None;
    }
    let last_close = bars.last()?.close;
    let atr_pct = candidate.atr_pct?;
    let ma = candidate.ma?;
    let rsi = candidate.rsi.unwrap_or(0.0);

    // ATR% is a percent of close; recover price units at today's close.
    let atr = atr_pct / 100.0 * last_close;
    let start = bars.len().saturating_sub(SWING_WINDOW);
    let swing_high = bars[start..]
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let entry = last_close;
    let call = if last_close > ma && rsi > MOMENTUM_RSI {
        Recommendation::MomentumBuy
    } else {
        Recommendation::Wait
    };

    Some(Advice {
        entry: round6(entry),
        stop_loss: round6(entry - STOP_MULT * atr),
        take_profit_1: round6(entry + TP1_MULT * atr),
        take_profit_2: round6((entry + TP2_MULT * atr).max(swing_high)),
        call,
    })
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
