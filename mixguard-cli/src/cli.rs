//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// mixguard -- checks that a mixed-content protection override stays scoped
/// to the origin it was granted for.
///
/// Use `mixguard <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "mixguard", version, about, long_about = None)]
pub struct Cli {
    /// Path to the mixguard.toml configuration file.
    #[arg(short, long, global = true, default_value = "mixguard.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario suite against the simulated browser.
    Run(RunArgs),

    /// List the scenarios of a suite without running them.
    Scenarios(ScenariosArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Run the scenario suite.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario suite TOML file (default: `run.suite_path`, or the built-in suite).
    #[arg(short, long)]
    pub suite: Option<PathBuf>,

    /// Run only the given scenario ids (repeatable).
    #[arg(long = "only", value_name = "ID")]
    pub only: Vec<String>,

    /// Simulate a host that keeps the override across server redirects.
    #[arg(long)]
    pub fixed_redirects: bool,
}

// ---- scenarios ----

/// List scenarios in a suite.
#[derive(Args, Debug)]
pub struct ScenariosArgs {
    /// Scenario suite TOML file (default: `run.suite_path`, or the built-in suite).
    #[arg(short, long)]
    pub suite: Option<PathBuf>,
}

// ---- config ----

/// Manage mixguard configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, poller, run, host).
        #[arg(long)]
        section: Option<String>,
    },
}
