//! Command-line driver for the tourney engine.
//!
//! Reads a scenario file, plays it against an in-memory engine through the
//! tournament's actor and prints the resulting groups, fixtures, standings
//! and bracket as JSON.

mod config;
mod scenario;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Error};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;

use config::CliConfig;
use scenario::Scenario;

const HELP: &str = "\
Run a tournament scenario and print the outcome as JSON

USAGE:
  tourney_cli [OPTIONS] <SCENARIO>

ARGS:
  <SCENARIO>              Scenario JSON file  [default: env TOURNEY_SCENARIO]

OPTIONS:
  --seed       N          Draw seed for reproducible groups and brackets  [default: env TOURNEY_DRAW_SEED]
  --output     FILE       Write the report to FILE instead of stdout

FLAGS:
  --pretty                Pretty-print the report
  -h, --help              Print help information

ENVIRONMENT:
  TOURNEY_INBOX_CAPACITY  Actor inbox size
  TOURNEY_MAX_GROUPS      Upper bound on the number of groups (1-8)
  RUST_LOG                Log filter (e.g. info, tourney=debug)
";

struct Args {
    scenario: Option<PathBuf>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        pretty: pargs.contains("--pretty"),
        seed: pargs.opt_value_from_str("--seed")?,
        output: pargs.opt_value_from_str("--output")?,
        scenario: pargs.opt_free_from_str()?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(130))?;

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env(args.scenario, args.seed, args.output, args.pretty)?;
    info!("Loading scenario {}", config.scenario.display());

    let raw = fs::read_to_string(&config.scenario)
        .with_context(|| format!("Failed to read {}", config.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config.scenario.display()))?;

    info!(
        "Running {} steps for tournament {} ({})",
        scenario.steps.len(),
        scenario.tournament.id,
        scenario.tournament.name
    );

    let report = scenario::run(scenario, config.engine.clone()).await?;

    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &config.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
