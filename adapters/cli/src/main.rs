#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a level, runs it and reports the result.

mod level_file;
mod tower_list;

use std::path::PathBuf;

use alien_defence_simulation::SimulationLoop;
use anyhow::{bail, Context as _};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

/// Places towers for an alien wave and simulates it to a win or a loss.
#[derive(Debug, Parser)]
#[command(name = "alien-defence", version)]
struct Args {
    /// Level file; `.toml` files use the TOML format, anything else the line format.
    level: PathBuf,
    /// Destination of the tower list. Defaults to the level path with an `.out` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print the full report as JSON instead of the bare outcome.
    #[arg(long)]
    json: bool,
    /// Give up with an error when no outcome is reached within this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Formatting of diagnostic logs written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Entry point for the Alien Defence command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let level = level_file::load(&args.level)?;
    let mut simulation = SimulationLoop::new(&level)
        .with_context(|| format!("level {} cannot be played", args.level.display()))?;

    let report = match args.max_ticks {
        Some(max_ticks) => {
            if !simulation.run_for(max_ticks).is_terminal() {
                warn!(max_ticks, "tick budget exhausted before an outcome");
            }
            simulation.report()
        }
        None => simulation.run(),
    };

    let output = args
        .output
        .unwrap_or_else(|| args.level.with_extension("out"));
    tower_list::write(&output, &report.towers)?;
    info!(
        outcome = %report.outcome,
        tick = ?report.tick,
        towers = report.towers.len(),
        output = %output.display(),
        "run finished"
    );

    if !report.outcome.is_terminal() {
        bail!(
            "no outcome after {} ticks",
            args.max_ticks.unwrap_or_default()
        );
    }

    if args.json {
        let json = serde_json::to_string(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        println!("{}", report.outcome);
    }
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}
