//! Rotator Runner — everything between the core engine and the CLI.
//!
//! This crate builds on `rotator-core` to provide:
//! - Environment-driven settings with per-timeframe overrides
//! - The single-run pipeline: screen, rank, advise, reconcile, deliver
//! - Report rendering and Telegram delivery

pub mod config;
pub mod notify;
pub mod report;
pub mod run;

pub use config::{ConfigError, Effective, Settings};
pub use notify::{NotifySummary, TelegramNotifier};
pub use report::{build_message, fmt_usd, ReportStyle};
pub use run::{run_once, RunError, RunOptions, RunReport};
