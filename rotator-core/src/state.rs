//! Persisted top-list state.
//!
//! One small JSON file carries the previous run's ranking so the next
//! run can label turnover. Two schema generations are accepted on read:
//! the current `{"top": [{"symbol", "rank"}]}` and the legacy
//! `{"top_symbols": [...]}`. Writes always use the current schema.
//! A missing or corrupt file reads as an empty ranking; state is a
//! convenience, never a reason to fail a run.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Membership label relative to the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    New,
    Keep,
    Drop,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::New => f.write_str("NEW"),
            Label::Keep => f.write_str("KEEP"),
            Label::Drop => f.write_str("DROP"),
        }
    }
}

/// The previous run's ranking, resolved from whichever schema was on
/// disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrevTop {
    /// Symbols in rank order.
    pub symbols: Vec<String>,
    /// Symbol to 1-based rank.
    pub ranks: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
struct StateFile {
    top: Vec<StateEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateEntry {
    symbol: String,
    #[serde(default)]
    rank: Option<u32>,
}

/// Whichever schema generation is on disk.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnyState {
    Current { top: Vec<StateEntry> },
    Legacy { top_symbols: Vec<String> },
}

/// Read the previous ranking. Any read or parse failure means "no
/// previous state".
pub fn load_prev_top(path: &Path) -> PrevTop {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return PrevTop::default();
    };
    let Ok(state) = serde_json::from_str::<AnyState>(&raw) else {
        return PrevTop::default();
    };

    match state {
        AnyState::Current { top } => {
            let mut symbols = Vec::with_capacity(top.len());
            let mut ranks = BTreeMap::new();
            for (i, entry) in top.into_iter().enumerate() {
                let rank = entry.rank.unwrap_or(i as u32 + 1);
                ranks.insert(entry.symbol.clone(), rank);
                symbols.push(entry.symbol);
            }
            PrevTop { symbols, ranks }
        }
        AnyState::Legacy { top_symbols } => {
            let ranks = top_symbols
                .iter()
                .enumerate()
                .map(|(i, s)| (s.clone(), i as u32 + 1))
                .collect();
            PrevTop {
                symbols: top_symbols,
                ranks,
            }
        }
    }
}

/// Label every symbol in either list: NEW and KEEP for current members,
/// DROP for previous members that fell out.
pub fn diff_labels(current: &[String], previous: &[String]) -> BTreeMap<String, Label> {
    let mut labels = BTreeMap::new();
    for symbol in current {
        let label = if previous.contains(symbol) {
            Label::Keep
        } else {
            Label::New
        };
        labels.insert(symbol.clone(), label);
    }
    for symbol in previous {
        labels.entry(symbol.clone()).or_insert(Label::Drop);
    }
    labels
}

/// Overwrite `path` with `symbols` in rank order. Returns whether the
/// ordered sequence differs from what was on disk; the write happens
/// either way.
pub fn save_top(path: &Path, symbols: &[String]) -> io::Result<bool> {
    let prev = load_prev_top(path);
    let changed = prev.symbols.as_slice() != symbols;

    let top = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| StateEntry {
            symbol: s.clone(),
            rank: Some(i as u32 + 1),
        })
        .collect();
    let json = serde_json::to_string_pretty(&StateFile { top })
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    std::fs::write(path, json)?;
    Ok(changed)
}
