//! Property tests for screening invariants.
//!
//! Uses proptest to verify:
//! 1. Ranking — bounded size, descending order, determinism, stable ties
//! 2. Labeling — every symbol labeled exactly once, correctly
//! 3. State — save/load roundtrip with positional ranks
//! 4. Indicators — SMA windows, RSI bounds, score monotonicity

use proptest::prelude::*;
use rotator_core::domain::{Candidate, Direction};
use rotator_core::indicators::{rsi, sma};
use rotator_core::screen::{composite_score, rank_top, Thresholds};
use rotator_core::state::{diff_labels, load_prev_top, save_top, Label};
use tempfile::TempDir;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_symbols(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z]{2,5}", 0..max).prop_map(|set| set.into_iter().collect())
}

fn arb_scores(max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0..100.0f64, 0..max)
}

fn arb_closes(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0f64, len)
}

fn make_candidate(symbol: &str, score: f64) -> Candidate {
    Candidate {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        pair_id: format!("{symbol}-USD"),
        pct_24h: 0.0,
        volume_usd: 1e9,
        close: 100.0,
        ma: Some(95.0),
        rsi: Some(60.0),
        atr_pct: Some(2.0),
        direction: Direction::Up,
        score,
        advice: None,
    }
}

// ── 1. Ranking ───────────────────────────────────────────────────────

proptest! {
    /// The top list never exceeds `top_n` and is sorted best first.
    #[test]
    fn rank_is_bounded_and_descending(scores in arb_scores(40), top_n in 0usize..10) {
        let candidates: Vec<Candidate> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| make_candidate(&format!("S{i}"), s))
            .collect();

        let ranked = rank_top(candidates, top_n);
        prop_assert!(ranked.len() <= top_n);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// Ranking the same input twice gives the same output.
    #[test]
    fn rank_is_deterministic(scores in arb_scores(40), top_n in 0usize..10) {
        let candidates: Vec<Candidate> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| make_candidate(&format!("S{i}"), s))
            .collect();

        let first: Vec<String> = rank_top(candidates.clone(), top_n)
            .into_iter()
            .map(|c| c.symbol)
            .collect();
        let second: Vec<String> = rank_top(candidates, top_n)
            .into_iter()
            .map(|c| c.symbol)
            .collect();
        prop_assert_eq!(first, second);
    }

    /// With all scores equal, the top list is a prefix of the input:
    /// ties keep universe order.
    #[test]
    fn rank_ties_preserve_input_order(n in 0usize..20, top_n in 0usize..10) {
        let candidates: Vec<Candidate> =
            (0..n).map(|i| make_candidate(&format!("S{i}"), 5.0)).collect();
        let expected: Vec<String> = (0..n.min(top_n)).map(|i| format!("S{i}")).collect();

        let ranked: Vec<String> = rank_top(candidates, top_n)
            .into_iter()
            .map(|c| c.symbol)
            .collect();
        prop_assert_eq!(ranked, expected);
    }
}

// ── 2. Labeling ──────────────────────────────────────────────────────

proptest! {
    /// Every symbol from either list gets exactly one label, and the
    /// label matches its membership.
    #[test]
    fn labels_partition_the_union(current in arb_symbols(8), previous in arb_symbols(8)) {
        let labels = diff_labels(&current, &previous);

        for symbol in &current {
            let expected = if previous.contains(symbol) { Label::Keep } else { Label::New };
            prop_assert_eq!(labels.get(symbol).copied(), Some(expected));
        }
        for symbol in &previous {
            if !current.contains(symbol) {
                prop_assert_eq!(labels.get(symbol).copied(), Some(Label::Drop));
            }
        }

        let union: std::collections::BTreeSet<&String> =
            current.iter().chain(previous.iter()).collect();
        prop_assert_eq!(labels.len(), union.len());
    }
}

// ── 3. State ─────────────────────────────────────────────────────────

proptest! {
    /// What is saved is what loads back, with 1-based positional ranks.
    #[test]
    fn state_roundtrips(symbols in arb_symbols(10)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        save_top(&path, &symbols).unwrap();
        let prev = load_prev_top(&path);

        prop_assert_eq!(&prev.symbols, &symbols);
        for (i, symbol) in symbols.iter().enumerate() {
            prop_assert_eq!(prev.ranks.get(symbol).copied(), Some(i as u32 + 1));
        }
    }

    /// Saving the loaded sequence back reports no change.
    #[test]
    fn resaving_is_idempotent(symbols in arb_symbols(10)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        save_top(&path, &symbols).unwrap();
        prop_assert!(!save_top(&path, &symbols).unwrap());
    }
}

// ── 4. Indicators and scoring ────────────────────────────────────────

proptest! {
    /// SMA slots are NaN exactly through the warmup, then equal the
    /// window mean.
    #[test]
    fn sma_matches_window_means(closes in arb_closes(1..60), period in 1usize..20) {
        let out = sma(&closes, period);
        prop_assert_eq!(out.len(), closes.len());

        for i in 0..closes.len() {
            if i + 1 < period {
                prop_assert!(out[i].is_nan());
            } else {
                let window = &closes[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                prop_assert!((out[i] - mean).abs() < 1e-6 * mean.abs().max(1.0));
            }
        }
    }

    /// Defined RSI values always sit inside [0, 100].
    #[test]
    fn rsi_stays_in_bounds(closes in arb_closes(2..80), period in 1usize..20) {
        for value in rsi(&closes, period) {
            if !value.is_nan() {
                prop_assert!((0.0..=100.0).contains(&value), "out of bounds: {}", value);
            }
        }
    }

    /// A bigger 24h move never scores lower, all else equal.
    #[test]
    fn score_is_monotonic_in_pct(
        pct in -50.0..50.0f64,
        bump in 0.01..20.0f64,
        rsi_v in 0.0..100.0f64,
        atr_v in 0.0..10.0f64,
    ) {
        let thresholds = Thresholds::default();
        let low = composite_score(pct, rsi_v, atr_v, &thresholds);
        let high = composite_score(pct + bump, rsi_v, atr_v, &thresholds);
        prop_assert!(high > low);
    }
}
