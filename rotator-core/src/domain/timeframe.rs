//! Candle timeframe supported by the screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle interval used for every series fetch in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
}

impl Timeframe {
    /// Parse a config label. Anything unrecognized falls back to 1h.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "15m" => Timeframe::M15,
            "4h" => Timeframe::H4,
            _ => Timeframe::H1,
        }
    }

    /// Candle width in seconds, as the exchange API expects it.
    pub fn granularity_secs(&self) -> u32 {
        match self {
            Timeframe::M15 => 900,
            Timeframe::H1 => 3600,
            Timeframe::H4 => 14400,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_granularities() {
        assert_eq!(Timeframe::from_label("15m").granularity_secs(), 900);
        assert_eq!(Timeframe::from_label("1h").granularity_secs(), 3600);
        assert_eq!(Timeframe::from_label("4h").granularity_secs(), 14400);
    }

    #[test]
    fn unknown_label_falls_back_to_1h() {
        assert_eq!(Timeframe::from_label("2d"), Timeframe::H1);
        assert_eq!(Timeframe::from_label(""), Timeframe::H1);
    }

    #[test]
    fn parse_trims_and_lowercases() {
        assert_eq!(Timeframe::from_label(" 4H "), Timeframe::H4);
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(Timeframe::H4.to_string(), "4h");
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Timeframe::M15).unwrap(), "\"15m\"");
        let tf: Timeframe = serde_json::from_str("\"4h\"").unwrap();
        assert_eq!(tf, Timeframe::H4);
    }
}
