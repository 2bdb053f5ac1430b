//! Rotator CLI — screening runs and state inspection.
//!
//! Commands:
//! - `run` — execute one screening pass: fetch, filter, rank, diff, deliver
//! - `state show` — print the persisted top list from the last run

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use rotator_core::data::{CoinGeckoClient, CoinbaseClient};
use rotator_core::domain::{Skip, Timeframe};
use rotator_core::state::load_prev_top;
use rotator_runner::{run_once, RunOptions, RunReport, Settings};

#[derive(Parser)]
#[command(
    name = "rotator",
    about = "Momentum Rotator — crypto market screener and notifier"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one screening pass and deliver the report.
    Run {
        /// Compute and print everything without writing state or sending.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Timeframe label (15m, 1h, 4h). Overrides the TIMEFRAME variable.
        #[arg(long)]
        timeframe: Option<String>,

        /// State file path. Overrides the STATE_FILE variable.
        #[arg(long)]
        state_file: Option<PathBuf>,

        /// Write the full run report as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// State file commands.
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Print the persisted top list from the last run.
    Show {
        /// State file path. Overrides the STATE_FILE variable.
        #[arg(long)]
        state_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            dry_run,
            timeframe,
            state_file,
            json,
        } => run_cmd(dry_run, timeframe, state_file, json),
        Commands::State { action } => match action {
            StateAction::Show { state_file } => state_show(state_file),
        },
    }
}

fn run_cmd(
    dry_run: bool,
    timeframe: Option<String>,
    state_file: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    let mut settings = Settings::from_env().context("reading configuration from environment")?;
    if let Some(label) = timeframe.as_deref() {
        settings.timeframe = Timeframe::from_label(label);
    }
    if let Some(path) = state_file {
        settings.state_file = path;
    }
    if !dry_run {
        settings.require_delivery().context(
            "delivery credentials (set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_IDS, or use --dry-run)",
        )?;
    }

    let universe = CoinGeckoClient::new(&settings.coingecko_base, &settings.quote_currency);
    let exchange = CoinbaseClient::new(&settings.coinbase_base);

    let options = RunOptions { dry_run };
    let report = run_once(&settings, &universe, &exchange, &options)?;

    print_summary(&report);

    if let Some(path) = json {
        let body = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, body)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report saved to: {}", path.display());
    }

    if let Some(summary) = report.delivery {
        if summary.failed > 0 {
            eprintln!("{} recipient(s) did not receive the report", summary.failed);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn state_show(state_file: Option<PathBuf>) -> Result<()> {
    let path = match state_file {
        Some(path) => path,
        None => {
            Settings::from_env()
                .context("reading configuration from environment")?
                .state_file
        }
    };

    if !path.exists() {
        println!("No state file at: {}", path.display());
        return Ok(());
    }

    let prev = load_prev_top(&path);
    if prev.symbols.is_empty() {
        println!("State is empty: {}", path.display());
        return Ok(());
    }

    println!("State: {}", path.display());
    for symbol in &prev.symbols {
        let rank = prev.ranks.get(symbol).copied().unwrap_or(0);
        println!("{rank:>3}) {symbol}");
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("=== Screen Result ===");
    println!("Timeframe:      {}", report.timeframe.label());
    println!(
        "Screened:       {}",
        report.candidates_total + report.skipped.len()
    );
    println!("Passed filter:  {}", report.candidates_total);
    println!("Top kept:       {}", report.ranked.len());
    println!(
        "State changed:  {}",
        if report.changed { "yes" } else { "no" }
    );

    if !report.skipped.is_empty() {
        println!();
        println!("--- Skips ---");
        for (tag, count) in skip_breakdown(&report.skipped) {
            println!("{count:>4}  {tag}");
        }
    }

    println!();
    println!("--- Message ---");
    println!("{}", report.message);

    match report.delivery {
        Some(summary) => println!("Delivered: {} sent, {} failed", summary.sent, summary.failed),
        None => println!("Dry run — nothing sent."),
    }
    println!();
}

fn skip_breakdown(skipped: &[Skip]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for skip in skipped {
        *counts.entry(skip.reason.tag()).or_insert(0) += 1;
    }
    counts
}
