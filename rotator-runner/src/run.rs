//! Single-run orchestration: screen, rank, advise, reconcile, deliver.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use rotator_core::data::provider::{ExchangeSource, MarketDataError, UniverseSource};
use rotator_core::domain::{quote_pair_map, Candidate, Skip, Timeframe};
use rotator_core::screen::{rank_top, screen_universe, trade_plan, Thresholds};
use rotator_core::state::{diff_labels, load_prev_top, save_top, Label};

use crate::config::Settings;
use crate::notify::{NotifySummary, TelegramNotifier};
use crate::report::{build_message, ReportStyle};

/// Errors that abort a run. Per-asset trouble never lands here; only
/// the universe fetch, the product listing, and the state write can
/// kill a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("universe fetch failed: {0}")]
    Universe(MarketDataError),

    #[error("product listing fetch failed: {0}")]
    Exchange(MarketDataError),

    #[error("state write failed: {0}")]
    State(#[from] std::io::Error),
}

/// Behavior switches for one invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute everything but skip the state write and delivery.
    pub dry_run: bool,
}

/// Everything a single run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timeframe: Timeframe,
    pub thresholds: Thresholds,
    pub top_n: usize,
    /// Candidates that passed the filter, before truncation.
    pub candidates_total: usize,
    pub ranked: Vec<Candidate>,
    pub skipped: Vec<Skip>,
    pub labels: BTreeMap<String, Label>,
    pub prev_ranks: BTreeMap<String, u32>,
    pub changed: bool,
    pub message: String,
    /// `None` on a dry run.
    pub delivery: Option<NotifySummary>,
}

/// Execute one full screening run.
pub fn run_once(
    settings: &Settings,
    universe: &dyn UniverseSource,
    exchange: &dyn ExchangeSource,
    options: &RunOptions,
) -> Result<RunReport, RunError> {
    let effective = settings.resolve(settings.timeframe);

    // 1. Universe and tradable pairs.
    let markets = universe.top_markets().map_err(RunError::Universe)?;
    let products = exchange.products().map_err(RunError::Exchange)?;
    let pairs = quote_pair_map(&products, &settings.quote_currency);

    // 2. Filter and rank.
    let outcome = screen_universe(
        &markets,
        &pairs,
        exchange,
        settings.timeframe,
        &effective.thresholds,
        settings.candle_limit,
    );
    let candidates_total = outcome.candidates.len();
    let mut ranked = rank_top(outcome.candidates, effective.top_n);

    // 3. Advisory levels for the members that made it.
    if effective.advice_enabled {
        attach_advice(&mut ranked, exchange, settings);
    }

    // 4. Reconcile against the previous run and persist.
    let prev = load_prev_top(&settings.state_file);
    let current: Vec<String> = ranked.iter().map(|c| c.symbol.clone()).collect();
    let labels = diff_labels(&current, &prev.symbols);
    let changed = if options.dry_run {
        prev.symbols != current
    } else {
        save_top(&settings.state_file, &current)?
    };

    // 5. Render and deliver.
    let now = Utc::now().with_timezone(&settings.report_timezone);
    let style = ReportStyle {
        short_format: settings.short_format,
        long_format: settings.long_format,
        detail_emoji: settings.detail_emoji,
        include_advice: effective.advice_enabled,
    };
    let message = build_message(
        now,
        settings.timeframe,
        &ranked,
        &labels,
        &prev.ranks,
        style,
    );

    let delivery = if options.dry_run {
        None
    } else {
        let notifier = TelegramNotifier::new(&settings.telegram_bot_token);
        Some(notifier.send_to_all(&settings.telegram_chat_ids, &message))
    };

    Ok(RunReport {
        timeframe: settings.timeframe,
        thresholds: effective.thresholds,
        top_n: effective.top_n,
        candidates_total,
        ranked,
        skipped: outcome.skipped,
        labels,
        prev_ranks: prev.ranks,
        changed,
        message,
        delivery,
    })
}

/// Re-fetch each ranked member at full depth and attach levels. Fetch
/// problems leave the advisory off; the run continues.
fn attach_advice(ranked: &mut [Candidate], exchange: &dyn ExchangeSource, settings: &Settings) {
    for candidate in ranked.iter_mut() {
        let fetched = exchange.candles(
            &candidate.pair_id,
            settings.timeframe.granularity_secs(),
            settings.candle_limit,
        );
        if let Ok(Some(bars)) = fetched {
            let plan = trade_plan(candidate, &bars);
            candidate.advice = plan;
        }
    }
}
