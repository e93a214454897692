//! CLI Tooling
//!
//! Command-line interface for running scenarios, checking scenario files and
//! decoding position payloads.

use super::format::{format_run_report_json, format_run_report_text, format_scenario_summary_text};
use crate::bus::codec::{decode_position, encode_position};
use crate::config::{ConfigLoader, SwarmConfig};
use crate::error::SwarmError;
use crate::logging::LoggingConfig;
use crate::sim::{Scenario, Simulation};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Patrol swarm - coordinator election and role auctions for patrol agents
#[derive(Parser)]
#[command(name = "patrol-swarm")]
#[command(about = "Simulate a patrol swarm electing coordinators and auctioning roles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags into the loaded logging configuration
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario and print the final roles and events
    Run {
        /// Scenario file (TOML)
        #[arg(long)]
        scenario: PathBuf,
        /// Maximum number of ticks to simulate
        #[arg(long, default_value = "600")]
        ticks: u64,
        /// Seconds of simulation time per tick
        #[arg(long, default_value = "0.1")]
        dt: f64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check a scenario file without running it
    Validate {
        /// Scenario file (TOML)
        #[arg(long)]
        scenario: PathBuf,
    },
    /// Decode a position payload such as "1.5;0;-2"
    Decode {
        payload: String,
    },
}

/// CLI context: effective configuration plus command execution
pub struct CliContext {
    config: SwarmConfig,
}

impl CliContext {
    /// Create a new CLI context from the standard config sources
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, SwarmError> {
        let config = ConfigLoader::load_optional(config_path.as_deref())?;
        Ok(Self { config })
    }

    pub fn with_config(config: SwarmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, SwarmError> {
        match command {
            Commands::Run {
                scenario,
                ticks,
                dt,
                format,
            } => self.run(scenario, *ticks, *dt, format),
            Commands::Validate { scenario } => {
                let scenario = Scenario::load(scenario)?;
                Ok(format_scenario_summary_text(&scenario))
            }
            Commands::Decode { payload } => {
                let position = decode_position(payload)?;
                Ok(format!(
                    "Position: {}\nCanonical: {}",
                    position,
                    encode_position(&position)
                ))
            }
        }
    }

    fn run(
        &self,
        scenario_path: &Path,
        ticks: u64,
        dt: f64,
        format: &str,
    ) -> Result<String, SwarmError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SwarmError::ConfigError(format!(
                "--dt must be a positive number, got {}",
                dt
            )));
        }
        if format != "text" && format != "json" {
            return Err(SwarmError::ConfigError(format!(
                "Unknown output format {:?}: use text or json",
                format
            )));
        }

        let scenario = Scenario::load(scenario_path)?;
        let mut simulation = Simulation::from_scenario(&scenario, self.config.clone())?;
        let report = simulation.run(ticks, dt);
        info!(
            scenario = %report.scenario,
            ticks = report.ticks,
            events = report.events.len(),
            "Run finished"
        );

        Ok(if format == "json" {
            format_run_report_json(&report)
        } else {
            format_run_report_text(&report)
        })
    }
}
