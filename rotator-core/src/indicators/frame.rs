//! Per-series indicator bundle consumed by the filter.

use crate::domain::{Bar, Direction};

use super::atr::atr_pct;
use super::rsi::rsi;
use super::sma::sma;

/// Smoothing period shared by the RSI and ATR columns. The moving-average
/// period is configurable; these two are not.
pub const OSCILLATOR_PERIOD: usize = 14;

/// One fetched series with its indicator columns, aligned index for index
/// with the bars.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub bars: Vec<Bar>,
    pub ma: Vec<f64>,
    pub rsi: Vec<f64>,
    pub atr_pct: Vec<f64>,
}

impl IndicatorFrame {
    pub fn compute(bars: Vec<Bar>, ma_period: usize) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ma = sma(&closes, ma_period);
        let rsi = rsi(&closes, OSCILLATOR_PERIOD);
        let atr_pct = atr_pct(&bars, OSCILLATOR_PERIOD);
        Self {
            bars,
            ma,
            rsi,
            atr_pct,
        }
    }

    /// Close of the final bar; NaN for an empty frame.
    pub fn last_close(&self) -> f64 {
        self.bars.last().map(|b| b.close).unwrap_or(f64::NAN)
    }

    pub fn last_ma(&self) -> Option<f64> {
        last_defined(&self.ma)
    }

    pub fn last_rsi(&self) -> Option<f64> {
        last_defined(&self.rsi)
    }

    pub fn last_atr_pct(&self) -> Option<f64> {
        last_defined(&self.atr_pct)
    }

    /// Direction of the final move, from the last two closes.
    pub fn direction(&self) -> Direction {
        let n = self.bars.len();
        if n < 2 {
            return Direction::Flat;
        }
        let prev = self.bars[n - 2].close;
        let last = self.bars[n - 1].close;
        if last > prev {
            Direction::Up
        } else if last < prev {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

fn last_defined(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| !v.is_nan())
}
