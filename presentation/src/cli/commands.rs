//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for conference results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with phases, agents, and verdict
    Full,
    /// Only the final verdict
    Synthesis,
    /// JSON output
    Json,
}

/// CLI arguments for conclave
#[derive(Parser, Debug)]
#[command(name = "conclave")]
#[command(author, version, about = "Client for a multi-stage AI deliberation backend")]
#[command(long_about = r#"
Conclave submits a dilemma to a deliberation backend and follows the run
live: routing, literature retrieval, the generation lanes, cross-
examination, synthesis, and fragility testing.

The backend does the actual work; conclave tracks its event stream,
shows per-agent progress, and keeps an ordered activity history of the
whole run.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./conclave.toml     Project-level config
3. ~/.config/conclave/config.toml   Global config

Example:
  conclave "Should we split the monolith?"
  conclave --role skeptic=claude-sonnet-4.5 --probes 10 "Adopt Rust for the data plane?"
  conclave --no-fragility --output synthesis "Rename the project?"
"#)]
pub struct Cli {
    /// The dilemma to deliberate (not required with --health/--show-config)
    pub dilemma: Option<String>,

    /// Override a participant's model as role=model (can be repeated)
    #[arg(short, long, value_name = "ROLE=MODEL")]
    pub role: Vec<String>,

    /// Force a deliberation mode instead of letting the router pick
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Disable the literature scout
    #[arg(long)]
    pub no_retrieval: bool,

    /// Disable fragility (robustness) testing
    #[arg(long)]
    pub no_fragility: bool,

    /// Number of fragility probes
    #[arg(long, value_name = "N")]
    pub probes: Option<u32>,

    /// Supplementary document to pass as context (can be repeated)
    #[arg(long, value_name = "PATH")]
    pub doc: Vec<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Probe backend reachability and exit
    #[arg(long)]
    pub health: bool,
}
