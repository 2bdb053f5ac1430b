//! Environment-driven settings with per-timeframe overrides.
//!
//! Every knob has a default, so an empty environment yields a working
//! (if silent) configuration. Threshold keys accept a `_15M`, `_1H`, or
//! `_4H` suffix to replace the base value for that timeframe only, e.g.
//! `RSI_THRESHOLD_4H=60`.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;
use thiserror::Error;

use rotator_core::data::{DEFAULT_COINBASE_BASE, DEFAULT_COINGECKO_BASE};
use rotator_core::domain::Timeframe;
use rotator_core::screen::Thresholds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },

    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingToken,

    #[error("TELEGRAM_CHAT_IDS is empty")]
    NoRecipients,
}

/// Everything a run needs, resolved from the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base thresholds before any per-timeframe override.
    pub thresholds: Thresholds,
    pub timeframe: Timeframe,
    pub top_n: usize,
    pub advice_enabled: bool,
    /// Bars requested per series fetch.
    pub candle_limit: usize,
    pub quote_currency: String,
    pub short_format: bool,
    pub long_format: bool,
    pub detail_emoji: bool,
    pub report_timezone: Tz,
    pub state_file: PathBuf,
    pub coingecko_base: String,
    pub coinbase_base: String,
    pub telegram_bot_token: String,
    pub telegram_chat_ids: Vec<String>,
    pub overrides: TimeframeOverrides,
}

/// Optional per-timeframe replacements for thresholds and run knobs.
#[derive(Debug, Clone, Default)]
pub struct TimeframeOverrides {
    pub m15: OverrideSet,
    pub h1: OverrideSet,
    pub h4: OverrideSet,
}

impl TimeframeOverrides {
    fn for_timeframe(&self, timeframe: Timeframe) -> &OverrideSet {
        match timeframe {
            Timeframe::M15 => &self.m15,
            Timeframe::H1 => &self.h1,
            Timeframe::H4 => &self.h4,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverrideSet {
    pub ma_period: Option<usize>,
    pub rsi_threshold: Option<f64>,
    pub atr_pct_min: Option<f64>,
    pub min_volume_usd: Option<f64>,
    pub min_pct_24h: Option<f64>,
    pub top_n: Option<usize>,
    pub advice_enabled: Option<bool>,
}

/// Thresholds and knobs after applying the active timeframe's overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Effective {
    pub thresholds: Thresholds,
    pub top_n: usize,
    pub advice_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            timeframe: Timeframe::H1,
            top_n: 5,
            advice_enabled: true,
            candle_limit: 300,
            quote_currency: "USD".to_string(),
            short_format: true,
            long_format: false,
            detail_emoji: false,
            report_timezone: chrono_tz::Europe::Riga,
            state_file: PathBuf::from("last_top.json"),
            coingecko_base: DEFAULT_COINGECKO_BASE.to_string(),
            coinbase_base: DEFAULT_COINBASE_BASE.to_string(),
            telegram_bot_token: String::new(),
            telegram_chat_ids: Vec::new(),
            overrides: TimeframeOverrides::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Tests inject maps here
    /// instead of mutating the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut s = Settings::default();

        s.thresholds.min_volume_usd =
            parse_f64(&get, "MIN_24H_VOLUME_USD", s.thresholds.min_volume_usd)?;
        s.thresholds.min_pct_24h = parse_f64(&get, "MIN_24H_PCT", s.thresholds.min_pct_24h)?;
        s.thresholds.ma_period = parse_usize(&get, "MA_PERIOD", s.thresholds.ma_period)?;
        s.thresholds.rsi_threshold = parse_f64(&get, "RSI_THRESHOLD", s.thresholds.rsi_threshold)?;
        s.thresholds.atr_pct_min = parse_f64(&get, "ATR_PCT_MIN", s.thresholds.atr_pct_min)?;

        if let Some(label) = get("TIMEFRAME") {
            s.timeframe = Timeframe::from_label(&label);
        }
        s.top_n = parse_usize(&get, "TOP_N", s.top_n)?;
        s.advice_enabled = parse_bool(&get, "ADVICE_ENABLED", s.advice_enabled);
        s.candle_limit = parse_usize(&get, "CANDLE_LIMIT", s.candle_limit)?;

        if let Some(quote) = get("QUOTE_CURRENCY") {
            s.quote_currency = quote.trim().to_uppercase();
        }
        s.short_format = parse_bool(&get, "SHORT_FORMAT", s.short_format);
        s.long_format = parse_bool(&get, "LONG_FORMAT", s.long_format);
        s.detail_emoji = parse_bool(&get, "DETAIL_EMOJI", s.detail_emoji);

        if let Some(name) = get("REPORT_TIMEZONE") {
            s.report_timezone = name.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "REPORT_TIMEZONE".to_string(),
                value: name.clone(),
            })?;
        }
        if let Some(path) = get("STATE_FILE") {
            s.state_file = PathBuf::from(path);
        }
        if let Some(base) = get("COINGECKO_BASE") {
            s.coingecko_base = base;
        }
        if let Some(base) = get("COINBASE_BASE") {
            s.coinbase_base = base;
        }

        s.telegram_bot_token = get("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        s.telegram_chat_ids = get("TELEGRAM_CHAT_IDS")
            .map(|raw| split_ids(&raw))
            .unwrap_or_default();

        s.overrides = TimeframeOverrides {
            m15: load_override_set(&get, "15M")?,
            h1: load_override_set(&get, "1H")?,
            h4: load_override_set(&get, "4H")?,
        };

        Ok(s)
    }

    /// Delivery needs credentials; everything else runs without them.
    pub fn require_delivery(&self) -> Result<(), ConfigError> {
        if self.telegram_bot_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.telegram_chat_ids.is_empty() {
            return Err(ConfigError::NoRecipients);
        }
        Ok(())
    }

    /// Apply the given timeframe's overrides to the base values.
    pub fn resolve(&self, timeframe: Timeframe) -> Effective {
        let set = self.overrides.for_timeframe(timeframe);
        let mut thresholds = self.thresholds.clone();
        if let Some(v) = set.ma_period {
            thresholds.ma_period = v;
        }
        if let Some(v) = set.rsi_threshold {
            thresholds.rsi_threshold = v;
        }
        if let Some(v) = set.atr_pct_min {
            thresholds.atr_pct_min = v;
        }
        if let Some(v) = set.min_volume_usd {
            thresholds.min_volume_usd = v;
        }
        if let Some(v) = set.min_pct_24h {
            thresholds.min_pct_24h = v;
        }

        Effective {
            thresholds,
            top_n: set.top_n.unwrap_or(self.top_n),
            advice_enabled: set.advice_enabled.unwrap_or(self.advice_enabled),
        }
    }
}

fn load_override_set(
    get: &impl Fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<OverrideSet, ConfigError> {
    Ok(OverrideSet {
        ma_period: parse_opt_usize(get, &format!("MA_PERIOD_{suffix}"))?,
        rsi_threshold: parse_opt_f64(get, &format!("RSI_THRESHOLD_{suffix}"))?,
        atr_pct_min: parse_opt_f64(get, &format!("ATR_PCT_MIN_{suffix}"))?,
        min_volume_usd: parse_opt_f64(get, &format!("MIN_24H_VOLUME_USD_{suffix}"))?,
        min_pct_24h: parse_opt_f64(get, &format!("MIN_24H_PCT_{suffix}"))?,
        top_n: parse_opt_usize(get, &format!("TOP_N_{suffix}"))?,
        advice_enabled: get(&format!("ADVICE_ENABLED_{suffix}")).map(|v| is_true(&v)),
    })
}

fn parse_opt_f64(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<f64>, ConfigError> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw.clone(),
            }),
        None => Ok(None),
    }
}

fn parse_opt_usize(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<usize>, ConfigError> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw.clone(),
            }),
        None => Ok(None),
    }
}

fn parse_f64(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    Ok(parse_opt_f64(get, key)?.unwrap_or(default))
}

fn parse_usize(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    Ok(parse_opt_usize(get, key)?.unwrap_or(default))
}

/// Booleans are forgiving: exactly "true" (any case) is true, anything
/// else is false.
fn parse_bool(get: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    get(key).map(|v| is_true(&v)).unwrap_or(default)
}

fn is_true(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
