//! Patrol Swarm CLI Binary
//!
//! Command-line interface for running and checking patrol swarm scenarios.

use anyhow::Context;
use clap::Parser;
use patrol_swarm::logging::init_logging;
use patrol_swarm::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = CliContext::new(cli.config.clone()).context("Failed to load configuration")?;

    let mut logging = context.config().logging.clone();
    cli.apply_logging_overrides(&mut logging);
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
