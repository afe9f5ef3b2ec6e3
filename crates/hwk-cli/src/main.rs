//! hwk entry point.
//!
//! Thin shell over the library crates: argument parsing, tracing setup,
//! snapshot-file loading, and `key=value` result printing. All
//! reconciliation semantics live in hwk-runtime and below.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hwk_schemas::{Ledger, MachineSnapshot};

/// Env var consulted when --ledger is not given.
const LEDGER_ENV: &str = "HWK_LEDGER";

#[derive(Parser)]
#[command(name = "hwk")]
#[command(about = "Hardware inventory ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a batch of normalized snapshot files into the ledger.
    Ingest {
        /// Ledger file path (falls back to HWK_LEDGER)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Normalized machine-snapshot JSON files, one per machine
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
    },

    /// Print ledger machines and pool counts without modifying anything.
    Status {
        /// Ledger file path (falls back to HWK_LEDGER)
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Ingest { ledger, snapshots } => {
            let path = resolve_ledger_path(ledger)?;
            let state = hwk_ledger::load(&path)?;

            let mut batch = Vec::with_capacity(snapshots.len());
            for file in &snapshots {
                batch.push(load_snapshot_file(file)?);
                tracing::debug!("loaded snapshot file {:?}", file);
            }

            let outcome = hwk_runtime::process_batch(state, batch)?;
            hwk_ledger::save(&path, &outcome.ledger)?;

            let report = outcome.report;
            println!("run_id={}", report.run_id);
            println!("started_at_utc={}", report.started_at_utc.to_rfc3339());
            println!("machines_processed={}", report.machines_processed.len());
            for id in &report.new_machines {
                println!("new_machine={id}");
            }
            for id in &report.missing_machines {
                // The original dump format carries the assigned user; handy
                // when chasing down a box that stopped reporting.
                let user = outcome
                    .ledger
                    .machines
                    .get(id)
                    .and_then(|snap| snap.0.get("User"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("-");
                println!("missing_machine={id} user={user}");
            }
            println!("ledger_saved=true path={}", path.display());
        }

        Commands::Status { ledger } => {
            let path = resolve_ledger_path(ledger)?;
            let state = hwk_ledger::load(&path)?;
            print_status(&state);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_ledger_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    std::env::var(LEDGER_ENV)
        .map(PathBuf::from)
        .with_context(|| format!("no --ledger given and {LEDGER_ENV} is not set"))
}

fn load_snapshot_file(path: &PathBuf) -> Result<MachineSnapshot> {
    // Read raw bytes to handle a UTF-8 BOM cleanly; the dumps come from
    // Windows boxes.
    let bytes = fs::read(path).with_context(|| format!("read snapshot file {:?}", path))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    let raw = std::str::from_utf8(bytes)
        .with_context(|| format!("snapshot file {:?} is not UTF-8 text", path))?;

    serde_json::from_str(raw.trim())
        .with_context(|| format!("snapshot file {:?} is not a JSON object", path))
}

fn print_status(ledger: &Ledger) {
    println!("machines={}", ledger.machines.len());
    for id in ledger.machines.keys() {
        println!("machine={id}");
    }
    for (category, records) in &ledger.pool.used {
        println!("used[{category}]={}", records.len());
    }
    for (category, records) in &ledger.pool.unused {
        println!("unused[{category}]={}", records.len());
    }
}
