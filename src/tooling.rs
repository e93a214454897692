//! Tooling & Integration Layer
//!
//! Command-line entry points over the simulation harness and the payload
//! codec.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
pub use format::{format_run_report_json, format_run_report_text, format_scenario_summary_text};
