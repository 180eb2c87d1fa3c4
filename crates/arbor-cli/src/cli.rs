//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{ConfigArgs, ListArgs, ModelArgs, PriceArgs, ReportArgs, TreeArgs};

/// Arbor - Binomial lattice option pricing CLI
#[derive(Parser)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log at debug level (overrides ARBOR_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, env = "ARBOR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Keep computing through numeric degeneracy and report it instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Price an option and show root Greeks
    Price(PriceArgs),

    /// Print the full pricing report with Greek trees
    Report(ReportArgs),

    /// Print one of the lattice trees
    Tree(TreeArgs),

    /// Build, inspect and save a lattice model
    Model(ModelArgs),

    /// Show, create or validate configuration files
    Config(ConfigArgs),

    /// List saved models and contracts in a directory
    List(ListArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
