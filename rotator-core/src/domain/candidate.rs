//! Screening outputs: candidates that passed, skips that did not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Last-move direction of a series, from its final two closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Advisory call attached to a ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Wait,
    MomentumBuy,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Wait => f.write_str("wait"),
            Recommendation::MomentumBuy => f.write_str("momentum buy"),
        }
    }
}

/// Entry, stop, and target levels for one candidate. All prices are
/// rounded to six decimals so tiny-priced assets stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub call: Recommendation,
}

/// An asset that cleared every gate of the filter.
///
/// Indicator fields are `Option` because the frame reports missing values
/// that way, but a candidate produced by the filter always carries all
/// three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub name: String,
    /// Exchange product the series came from, e.g. `ETH-USD`.
    pub pair_id: String,
    /// 24h percent change, rounded to two decimals.
    pub pct_24h: f64,
    pub volume_usd: f64,
    pub close: f64,
    pub ma: Option<f64>,
    pub rsi: Option<f64>,
    pub atr_pct: Option<f64>,
    pub direction: Direction,
    pub score: f64,
    pub advice: Option<Advice>,
}

/// One rejected asset with the rule that rejected it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skip {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Why an asset was rejected. Rules apply in this order and the first
/// failure wins, so each skip carries exactly one reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    Stablecoin,
    VolumeOrChange,
    NotOnExchange,
    NoHistory,
    IndicatorsFail {
        above_ma: bool,
        rsi_ok: bool,
        atr_ok: bool,
    },
}

impl SkipReason {
    /// Stable short tag used in summaries and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            SkipReason::Stablecoin => "stablecoin",
            SkipReason::VolumeOrChange => "volume/pct filter",
            SkipReason::NotOnExchange => "not on exchange",
            SkipReason::NoHistory => "no OHLCV",
            SkipReason::IndicatorsFail { .. } => "indicators fail",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::IndicatorsFail {
                above_ma,
                rsi_ok,
                atr_ok,
            } => write!(
                f,
                "indicators fail (close>MA {}, RSI {}, ATR% {})",
                mark(*above_ma),
                mark(*rsi_ok),
                mark(*atr_ok)
            ),
            other => f.write_str(other.tag()),
        }
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "fail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_tags_are_stable() {
        assert_eq!(SkipReason::Stablecoin.tag(), "stablecoin");
        assert_eq!(SkipReason::VolumeOrChange.tag(), "volume/pct filter");
        assert_eq!(SkipReason::NotOnExchange.tag(), "not on exchange");
        assert_eq!(SkipReason::NoHistory.tag(), "no OHLCV");
        let reason = SkipReason::IndicatorsFail {
            above_ma: true,
            rsi_ok: false,
            atr_ok: true,
        };
        assert_eq!(reason.tag(), "indicators fail");
    }

    #[test]
    fn indicators_fail_display_names_each_check() {
        let reason = SkipReason::IndicatorsFail {
            above_ma: false,
            rsi_ok: true,
            atr_ok: false,
        };
        assert_eq!(
            reason.to_string(),
            "indicators fail (close>MA fail, RSI ok, ATR% fail)"
        );
    }

    #[test]
    fn recommendation_display() {
        assert_eq!(Recommendation::Wait.to_string(), "wait");
        assert_eq!(Recommendation::MomentumBuy.to_string(), "momentum buy");
    }

    #[test]
    fn skip_reason_serde_roundtrip() {
        let reason = SkipReason::IndicatorsFail {
            above_ma: true,
            rsi_ok: true,
            atr_ok: false,
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert!(json.contains("\"kind\":\"indicators_fail\""));
        let back: SkipReason = serde_json::from_str(&json).unwrap();
        assert_eq!(reason, back);
    }
}
