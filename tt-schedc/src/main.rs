/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{error, info, warn};

use tt_schedc::config::CompilerConfig;
use tt_schedc::document::load_tree;
use tt_schedc::flatten::flatten;
use tt_schedc::timing::{TimingAnalyzer, TimingError};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Compile a YAML schedule tree into a flat schedule table.
///
/// Example:
///   tt-schedc --tree control_loop.yaml --config tt-schedc.yaml > table.yaml
#[derive(Debug, Parser)]
#[command(
    name = "tt-schedc",
    about = "Time-triggered schedule tree compiler",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML tree document.
    #[arg(short = 't', long = "tree")]
    tree: PathBuf,

    /// Path to the YAML compiler configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print the parsed tree instead of the schedule table.
    #[arg(long = "dump", default_value_t = false)]
    dump: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Logs go to stderr so stdout carries only the table.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        tree   = %cli.tree.display(),
        config = ?cli.config,
        dump   = cli.dump,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    print!("{}", compile(cli)?);
    Ok(())
}

/// Everything `run` writes to stdout: the tree dump or the YAML table.
fn compile(cli: &Cli) -> Result<String> {
    // ── Load configuration ────────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => CompilerConfig::load_from_file(path)?,
        None => {
            warn!("No configuration file provided, using defaults");
            CompilerConfig::default()
        }
    };

    // ── Load tree ─────────────────────────────────────────────────────────────
    let root = load_tree(&cli.tree)?;

    if cli.dump {
        return Ok(root.dump());
    }

    // ── Flatten ───────────────────────────────────────────────────────────────
    let table = flatten(&config.root, &root)
        .with_context(|| format!("Failed to flatten {}", cli.tree.display()))?;

    if config.check_unique_names {
        table.check_unique_names()?;
    } else {
        for (name, count) in table.duplicate_names() {
            warn!(entry = name, count, "Duplicate schedule entry name");
        }
    }

    // ── Timing analysis ───────────────────────────────────────────────────────
    match TimingAnalyzer::with_limit(config.hyperperiod_limit).analyze(&table) {
        Ok(timing) => info!(
            hyperperiod = timing.hyperperiod,
            periods = ?timing.unique_periods,
            "Schedule timing"
        ),
        Err(TimingError::NoEntries) => warn!("Schedule table is empty"),
        Err(e) => return Err(e.into()),
    }

    // ── Emit ──────────────────────────────────────────────────────────────────
    serde_yaml::to_string(&table).context("Failed to serialise schedule table")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
