//! Report rendering: the message that reaches recipients.
//!
//! The short format is one line per member; the long format adds a
//! per-asset detail line and a rank-change section. Both share the
//! header, the advisory block, and the fixed footer.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;

use rotator_core::domain::{Candidate, Direction, Timeframe};
use rotator_core::state::Label;

/// Presentation switches, resolved from settings.
#[derive(Debug, Clone, Copy)]
pub struct ReportStyle {
    pub short_format: bool,
    pub long_format: bool,
    pub detail_emoji: bool,
    pub include_advice: bool,
}

/// Render the full message for one run.
pub fn build_message(
    now: DateTime<Tz>,
    timeframe: Timeframe,
    top: &[Candidate],
    labels: &BTreeMap<String, Label>,
    prev_ranks: &BTreeMap<String, u32>,
    style: ReportStyle,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Momentum Rotator — {:02}:{:02} {} (TF: {})\n",
        now.hour(),
        now.minute(),
        tz_city(now.timezone()),
        timeframe
    ));
    out.push_str(&format!("Top {}:\n", top.len()));

    if top.is_empty() {
        out.push_str("• No candidates passed the screen this run.\n");
    }

    for (i, candidate) in top.iter().enumerate() {
        push_member_line(&mut out, i + 1, candidate, labels, style);
        if !style.short_format {
            out.push_str(&format!(
                "   {} at {}\n",
                candidate.name, candidate.close
            ));
        }
    }

    if style.include_advice {
        push_advice_block(&mut out, timeframe, top);
    }

    if style.long_format && (!top.is_empty() || !labels.is_empty()) {
        push_rank_changes(&mut out, top, labels, prev_ranks);
    }

    out.push_str("\nNotes:\n");
    out.push_str("• Ranked by 24h momentum with volume, trend, and volatility gates.\n");
    out.push_str("• Informational only, not financial advice.\n");
    out
}

fn push_member_line(
    out: &mut String,
    rank: usize,
    candidate: &Candidate,
    labels: &BTreeMap<String, Label>,
    style: ReportStyle,
) {
    let arrow = if style.detail_emoji {
        match candidate.direction {
            Direction::Up => "↑ ",
            Direction::Down => "↓ ",
            Direction::Flat => "= ",
        }
    } else {
        ""
    };
    let tag = match labels.get(&candidate.symbol) {
        Some(Label::New) => " [NEW]",
        Some(Label::Keep) => " [KEEP]",
        _ => "",
    };
    let rsi = candidate
        .rsi
        .map(|v| format!("{}", v as i64))
        .unwrap_or_else(|| "?".to_string());
    let atr = candidate
        .atr_pct
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "?".to_string());

    out.push_str(&format!(
        "{rank}) {arrow}{}  {:+.1}% (24h vol {})  close>MA{tag}  RSI {rsi}  ATR% {atr}\n",
        candidate.symbol,
        candidate.pct_24h,
        fmt_usd(candidate.volume_usd),
    ));
}

fn push_advice_block(out: &mut String, timeframe: Timeframe, top: &[Candidate]) {
    let advised: Vec<&Candidate> = top.iter().filter(|c| c.advice.is_some()).collect();
    if advised.is_empty() {
        return;
    }

    out.push_str(&format!("\nTrade levels ({timeframe}):\n"));
    for candidate in advised {
        if let Some(advice) = &candidate.advice {
            out.push_str(&format!(
                "• {}: entry {}, SL {}, TP1 {}, TP2 {} — {}\n",
                candidate.symbol,
                advice.entry,
                advice.stop_loss,
                advice.take_profit_1,
                advice.take_profit_2,
                advice.call,
            ));
        }
    }
}

fn push_rank_changes(
    out: &mut String,
    top: &[Candidate],
    labels: &BTreeMap<String, Label>,
    prev_ranks: &BTreeMap<String, u32>,
) {
    out.push_str("\nRank changes:\n");

    for (i, candidate) in top.iter().enumerate() {
        let current = (i + 1) as i64;
        let line = match prev_ranks.get(&candidate.symbol) {
            Some(&prev) => {
                let prev = prev as i64;
                if prev > current {
                    format!("• {}: moved up ({prev} → {current})", candidate.symbol)
                } else if prev < current {
                    format!("• {}: moved down ({prev} → {current})", candidate.symbol)
                } else {
                    format!("• {}: unchanged ({current})", candidate.symbol)
                }
            }
            None => format!("• {}: newly entered", candidate.symbol),
        };
        out.push_str(&line);
        out.push('\n');
    }

    for (symbol, label) in labels {
        if *label == Label::Drop {
            let was = prev_ranks
                .get(symbol)
                .map(|r| format!(" (was {r})"))
                .unwrap_or_default();
            out.push_str(&format!("• {symbol}: dropped{was}\n"));
        }
    }
}

/// City part of a timezone name: `Europe/Riga` renders as `Riga`.
fn tz_city(tz: Tz) -> &'static str {
    let name = tz.name();
    name.rsplit('/').next().unwrap_or(name)
}

/// Abbreviate a USD amount: $1.2B, $350.0M, $12.3K, below that whole
/// dollars.
pub fn fmt_usd(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("${:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("${:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("${:.1}K", v / 1e3)
    } else {
        format!("${v:.0}")
    }
}
