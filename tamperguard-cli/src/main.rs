//! tamperguard command line
//!
//! Locks and checks the watchers stored in a scene document, for use in
//! build pipelines and pre-commit hooks.
//!
//! Usage:
//!   tamperguard --document level.json lock --target 12
//!   tamperguard --document level.json check
//!
//! `check` exits with status 1 when any watcher detected drift.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tamperguard_cli::{Operation, RunSummary, SceneDocument, run};
use tamperguard_core::{FieldStatus, WatcherConfig};
use tamperguard_types::Handle;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tamperguard")]
#[command(about = "Detect edits to locked component fields")]
struct Args {
    /// Scene document to operate on
    #[arg(short, long)]
    document: PathBuf,

    /// Watcher configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Freeze current field values as the baseline
    Lock {
        /// Lock only this component, adding a watcher for it if needed
        #[arg(short, long)]
        target: Option<Handle>,
    },
    /// Recompute fingerprints and unlock watchers whose target drifted
    Check,
    /// Show saved watcher state and any drift, without saving
    Status,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(args.config.as_deref())?;
    let mut doc = SceneDocument::load(&args.document)?;
    let op = match args.command {
        Command::Lock { target } => Operation::Lock(target),
        Command::Check => Operation::Check,
        Command::Status => Operation::Status,
    };

    let summary = run(&mut doc, &config, op)?;
    print_summary(&summary);

    if summary.dirty {
        doc.save(&args.document)?;
        info!("Saved {}", args.document.display());
    } else {
        debug!("Document unchanged");
    }

    if op == Operation::Check && summary.any_drift() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>) -> Result<WatcherConfig> {
    let Some(path) = path else {
        return Ok(WatcherConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn print_summary(summary: &RunSummary) {
    if summary.outcomes.is_empty() {
        println!("No watchers in document");
        return;
    }
    for outcome in &summary.outcomes {
        let state = if outcome.locked { "LOCKED" } else { "unlocked" };
        let drift = if outcome.drifted { "  DRIFT" } else { "" };
        println!("{} ({}): {state}{drift}", outcome.target, outcome.type_name);
        if let Some(stamp) = outcome.lock_timestamp {
            println!("  locked at {stamp}");
        }
        if outcome.show_debug_panel {
            for field in &outcome.fields {
                let marker = match field.status {
                    FieldStatus::Ok => " ",
                    FieldStatus::Changed => "~",
                    FieldStatus::Missing => "-",
                    FieldStatus::Added => "+",
                };
                let fmt = |v: Option<i32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
                println!(
                    "  {marker} {:<24} {:>12} {:>12}",
                    field.name,
                    fmt(field.baseline),
                    fmt(field.current)
                );
            }
        }
        for diagnostic in &outcome.diagnostics {
            println!("  ! {diagnostic}");
        }
    }
}
