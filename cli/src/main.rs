//! Headless host driver
//!
//! Builds an engine from a preset or a JSON config file, runs it for a
//! number of ticks and prints the metrics summary (or the full snapshot)
//! as JSON.

use clap::Parser;
use elevator_dispatch_core::{Orchestrator, Preset, SimConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Elevator dispatch simulation command line options.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Traffic preset: default, up-peak, down-peak or interfloor.
    #[arg(long, default_value = "default")]
    preset: Preset,

    /// JSON config file; overrides the preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(long, default_value = "3000")]
    ticks: u64,

    /// Override the config's random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full snapshot instead of the metrics summary.
    #[arg(long)]
    snapshot: bool,
}

fn load_config(args: &Args) -> Result<SimConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
            SimConfig::from_json(&json).map_err(|e| e.to_string())?
        }
        None => args.preset.config(),
    };
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<String, String> {
    let config = load_config(args)?;
    let mut orchestrator = Orchestrator::new(config).map_err(|e| e.to_string())?;

    orchestrator.start();
    let mut arrivals = 0;
    let mut dropoffs = 0;
    for _ in 0..args.ticks {
        let result = orchestrator.tick();
        arrivals += result.num_arrivals;
        dropoffs += result.num_dropoffs;
    }
    orchestrator.pause();

    info!(
        sim_time = orchestrator.sim_time(),
        arrivals,
        dropoffs,
        "run complete"
    );

    let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for event in orchestrator.event_log().events() {
        *by_kind.entry(event.kind.as_str()).or_default() += 1;
    }
    for (kind, count) in &by_kind {
        debug!(kind = *kind, count = *count, "retained events");
    }

    let output = if args.snapshot {
        serde_json::to_string_pretty(&orchestrator.snapshot())
    } else {
        serde_json::to_string_pretty(&orchestrator.metrics_summary())
    };
    output.map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
