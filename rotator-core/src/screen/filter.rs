//! Eligibility filter: the ordered gate every universe entry must clear.
//!
//! Rules run in a fixed order and the first failure decides the skip
//! reason. Candle history is only fetched once the cheap rules have
//! passed, which keeps API pressure proportional to the interesting part
//! of the universe.

use crate::data::provider::ExchangeSource;
use crate::domain::{Candidate, MarketTicker, PairMap, Skip, SkipReason, Timeframe};
use crate::indicators::IndicatorFrame;

use super::rank::composite_score;
use super::Thresholds;

/// Pegged assets; 24h movement on these is noise, never momentum.
pub const STABLECOINS: [&str; 7] = ["USDT", "USDC", "DAI", "TUSD", "USDP", "FDUSD", "PYUSD"];

/// Everything one pass over the universe produced.
#[derive(Debug, Clone)]
pub struct ScreenOutcome {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<Skip>,
}

/// Evaluate every ticker in order. Per-ticker failures are recorded, not
/// propagated; a run never dies because one asset misbehaved.
pub fn screen_universe(
    markets: &[MarketTicker],
    pairs: &PairMap,
    source: &dyn ExchangeSource,
    timeframe: Timeframe,
    thresholds: &Thresholds,
    candle_limit: usize,
) -> ScreenOutcome {
    let mut candidates = Vec::new();
    let mut skipped = Vec::new();

    for ticker in markets {
        match evaluate_ticker(ticker, pairs, source, timeframe, thresholds, candle_limit) {
            Ok(candidate) => candidates.push(candidate),
            Err(reason) => skipped.push(Skip {
                symbol: ticker.symbol.clone(),
                reason,
            }),
        }
    }

    ScreenOutcome {
        candidates,
        skipped,
    }
}

/// Run one ticker through the gate.
pub fn evaluate_ticker(
    ticker: &MarketTicker,
    pairs: &PairMap,
    source: &dyn ExchangeSource,
    timeframe: Timeframe,
    thresholds: &Thresholds,
    candle_limit: usize,
) -> Result<Candidate, SkipReason> {
    if STABLECOINS.contains(&ticker.symbol.as_str()) {
        return Err(SkipReason::Stablecoin);
    }

    let volume = ticker.volume();
    let pct = ticker.pct_change_24h();
    if volume < thresholds.min_volume_usd || pct < thresholds.min_pct_24h {
        return Err(SkipReason::VolumeOrChange);
    }

    let pair_id = match pairs.get(&ticker.symbol) {
        Some(id) => id.clone(),
        None => return Err(SkipReason::NotOnExchange),
    };

    let bars = match source.candles(&pair_id, timeframe.granularity_secs(), candle_limit) {
        Ok(Some(bars)) => bars,
        Ok(None) | Err(_) => return Err(SkipReason::NoHistory),
    };
    if bars.len() < thresholds.min_history() {
        return Err(SkipReason::NoHistory);
    }

    let frame = IndicatorFrame::compute(bars, thresholds.ma_period);
    let close = frame.last_close();
    let ma = frame.last_ma();
    let rsi = frame.last_rsi();
    let atr_pct = frame.last_atr_pct();

    let above_ma = matches!(ma, Some(m) if close > m);
    let rsi_ok = matches!(rsi, Some(r) if r > thresholds.rsi_threshold);
    let atr_ok = matches!(atr_pct, Some(a) if a > thresholds.atr_pct_min);
    if !(above_ma && rsi_ok && atr_ok) {
        return Err(SkipReason::IndicatorsFail {
            above_ma,
            rsi_ok,
            atr_ok,
        });
    }

    // All three checks passing implies all three values are present.
    let (Some(ma), Some(rsi), Some(atr_pct)) = (ma, rsi, atr_pct) else {
        return Err(SkipReason::IndicatorsFail {
            above_ma,
            rsi_ok,
            atr_ok,
        });
    };

    let pct = round2(pct);
    Ok(Candidate {
        symbol: ticker.symbol.clone(),
        name: ticker.name.clone(),
        pair_id,
        pct_24h: pct,
        volume_usd: volume,
        close,
        ma: Some(ma),
        rsi: Some(rsi),
        atr_pct: Some(atr_pct),
        direction: frame.direction(),
        score: composite_score(pct, rsi, atr_pct, thresholds),
        advice: None,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::MarketDataError;
    use crate::domain::Bar;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubExchange {
        candles: HashMap<String, Vec<Bar>>,
        broken: Vec<String>,
        fetches: AtomicUsize,
    }

    impl StubExchange {
        fn new() -> Self {
            Self {
                candles: HashMap::new(),
                broken: Vec::new(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn with_series(mut self, pair_id: &str, bars: Vec<Bar>) -> Self {
            self.candles.insert(pair_id.to_string(), bars);
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ExchangeSource for StubExchange {
        fn products(&self) -> Result<Vec<crate::domain::Product>, MarketDataError> {
            Ok(self
                .candles
                .keys()
                .map(|id| crate::domain::Product { id: id.clone() })
                .collect())
        }

        fn candles(
            &self,
            product_id: &str,
            _granularity_secs: u32,
            limit: usize,
        ) -> Result<Option<Vec<Bar>>, MarketDataError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.broken.iter().any(|p| p == product_id) {
                return Err(MarketDataError::RateLimited);
            }
            Ok(self.candles.get(product_id).map(|bars| {
                let mut bars = bars.clone();
                if bars.len() > limit {
                    bars.drain(..bars.len() - limit);
                }
                bars
            }))
        }
    }

    fn ticker(symbol: &str, volume: f64, pct: f64) -> MarketTicker {
        MarketTicker {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            total_volume: Some(volume),
            price_change_percentage_24h: Some(pct),
            price_change_percentage_24h_in_currency: None,
        }
    }

    /// Zigzag series with upward drift: +2 on odd steps, -1 on even.
    /// Ends on an up move, sits above its MA, and keeps RSI near 68.
    fn climbing_bars(n: usize, start: f64) -> Vec<Bar> {
        let begin = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut bars: Vec<Bar> = Vec::with_capacity(n);
        let mut price = start;
        for i in 0..n {
            if i > 0 {
                price += if i % 2 == 1 { 2.0 } else { -1.0 };
            }
            let open = if i == 0 { price } else { bars[i - 1].close };
            let high = open.max(price) * 1.02;
            let low = open.min(price) * 0.98;
            bars.push(Bar {
                time: begin + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close: price,
                volume: 1000.0,
            });
        }
        bars
    }

    fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
        let begin = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        (0..n)
            .map(|i| Bar {
                time: begin + chrono::Duration::hours(i as i64),
                open: price,
                high: price * 1.02,
                low: price * 0.98,
                close: price,
                volume: 1000.0,
            })
            .collect()
    }

    fn usd_pairs(symbols: &[&str]) -> PairMap {
        symbols
            .iter()
            .map(|s| (s.to_string(), format!("{s}-USD")))
            .collect()
    }

    #[test]
    fn strong_ticker_passes_every_gate() {
        let exchange = StubExchange::new().with_series("ETH-USD", climbing_bars(300, 100.0));
        let pairs = usd_pairs(&["ETH"]);
        let t = ticker("ETH", 1.2e9, 5.2);

        let candidate = evaluate_ticker(
            &t,
            &pairs,
            &exchange,
            Timeframe::H1,
            &Thresholds::default(),
            300,
        )
        .unwrap();

        assert_eq!(candidate.symbol, "ETH");
        assert_eq!(candidate.pair_id, "ETH-USD");
        assert_eq!(candidate.pct_24h, 5.2);
        assert!(candidate.close > candidate.ma.unwrap());
        assert!(candidate.rsi.unwrap() > 55.0);
        assert!(candidate.atr_pct.unwrap() > 1.5);
        assert!(candidate.score > 0.0);
        assert!(candidate.advice.is_none());
    }

    #[test]
    fn stablecoin_wins_over_later_failures() {
        // Low volume too, but the stablecoin rule fires first and no
        // candles are ever fetched.
        let exchange = StubExchange::new();
        let pairs = usd_pairs(&["USDT"]);
        let t = ticker("USDT", 1_000.0, 0.01);

        let reason = evaluate_ticker(
            &t,
            &pairs,
            &exchange,
            Timeframe::H1,
            &Thresholds::default(),
            300,
        )
        .unwrap_err();

        assert_eq!(reason, SkipReason::Stablecoin);
        assert_eq!(exchange.fetch_count(), 0);
    }

    #[test]
    fn thin_or_quiet_markets_are_skipped_before_fetching() {
        let exchange = StubExchange::new();
        let pairs = usd_pairs(&["AAA", "BBB"]);
        let thresholds = Thresholds::default();

        let low_volume = ticker("AAA", 10e6, 5.0);
        let reason = evaluate_ticker(
            &low_volume,
            &pairs,
            &exchange,
            Timeframe::H1,
            &thresholds,
            300,
        )
        .unwrap_err();
        assert_eq!(reason, SkipReason::VolumeOrChange);

        let quiet = ticker("BBB", 1e9, 1.0);
        let reason =
            evaluate_ticker(&quiet, &pairs, &exchange, Timeframe::H1, &thresholds, 300).unwrap_err();
        assert_eq!(reason, SkipReason::VolumeOrChange);
        assert_eq!(exchange.fetch_count(), 0);
    }

    #[test]
    fn unlisted_base_is_skipped() {
        let exchange = StubExchange::new();
        let pairs = usd_pairs(&["ETH"]);
        let t = ticker("XMR", 1e9, 8.0);

        let reason = evaluate_ticker(
            &t,
            &pairs,
            &exchange,
            Timeframe::H1,
            &Thresholds::default(),
            300,
        )
        .unwrap_err();
        assert_eq!(reason, SkipReason::NotOnExchange);
    }

    #[test]
    fn missing_short_or_broken_history_all_count_as_no_history() {
        let mut exchange = StubExchange::new().with_series("SHT-USD", climbing_bars(40, 100.0));
        exchange.broken.push("BRK-USD".to_string());
        let pairs = usd_pairs(&["GON", "SHT", "BRK"]);
        let thresholds = Thresholds::default();

        for symbol in ["GON", "SHT", "BRK"] {
            let t = ticker(symbol, 1e9, 5.0);
            let reason =
                evaluate_ticker(&t, &pairs, &exchange, Timeframe::H1, &thresholds, 300).unwrap_err();
            assert_eq!(reason, SkipReason::NoHistory, "symbol {symbol}");
        }
    }

    #[test]
    fn flat_series_fails_trend_and_rsi_but_not_atr() {
        let exchange = StubExchange::new().with_series("FLT-USD", flat_bars(300, 50.0));
        let pairs = usd_pairs(&["FLT"]);
        let t = ticker("FLT", 1e9, 5.0);

        let reason = evaluate_ticker(
            &t,
            &pairs,
            &exchange,
            Timeframe::H1,
            &Thresholds::default(),
            300,
        )
        .unwrap_err();

        // Close equals MA, RSI is undefined with no down moves to divide
        // by, ATR% is a steady 4-ish percent from the wicks.
        assert_eq!(
            reason,
            SkipReason::IndicatorsFail {
                above_ma: false,
                rsi_ok: false,
                atr_ok: true,
            }
        );
    }

    #[test]
    fn screen_universe_collects_both_sides() {
        let exchange = StubExchange::new().with_series("ETH-USD", climbing_bars(300, 100.0));
        let pairs = usd_pairs(&["ETH", "XMR"]);
        let markets = vec![
            ticker("ETH", 1.2e9, 5.2),
            ticker("USDT", 90e9, 0.0),
            ticker("XMR", 60e6, 2.0),
        ];

        let outcome = screen_universe(
            &markets,
            &pairs,
            &exchange,
            Timeframe::H1,
            &Thresholds::default(),
            300,
        );

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].symbol, "ETH");
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped[0].reason, SkipReason::Stablecoin);
        assert_eq!(outcome.skipped[1].reason, SkipReason::VolumeOrChange);
    }

    #[test]
    fn pct_is_rounded_to_two_decimals() {
        let exchange = StubExchange::new().with_series("ETH-USD", climbing_bars(300, 100.0));
        let pairs = usd_pairs(&["ETH"]);
        let t = ticker("ETH", 1.2e9, 5.23456);

        let candidate = evaluate_ticker(
            &t,
            &pairs,
            &exchange,
            Timeframe::H1,
            &Thresholds::default(),
            300,
        )
        .unwrap();
        assert_eq!(candidate.pct_24h, 5.23);
    }
}
