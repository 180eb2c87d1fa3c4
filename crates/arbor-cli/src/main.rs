//! Arbor CLI - Command-line interface for binomial option pricing.
//!
//! # Usage
//!
//! ```bash
//! # Price an at-the-money European call on a 3-step tree
//! arbor price --spot 100 --strike 100 --expiration 1 --steps 3
//!
//! # Full report for a floating-strike Asian put with per-step volatilities
//! arbor report --spot 50 --strike-ratio 1.05 --side put --style asian \
//!     --payoff floating --steps 3 --vol 0.2,0.25,0.3
//!
//! # Delta tree for a saved contract and model
//! arbor tree --contract msft.json --model flat.json --kind delta
//!
//! # Inspect a model
//! arbor model --steps 4 --rate 0.03 --vol 0.25 --expiration 0.5
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arbor_config::ArborConfig;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = ArborConfig::load_or_default(cli.config.as_deref())?;
    if cli.lenient {
        config.engine = config.engine.lenient();
    }
    tracing::debug!(?config, "configuration loaded");

    let ctx = Context {
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Price(args) => commands::price::execute(args, &ctx)?,
        Commands::Report(args) => commands::report::execute(args, &ctx)?,
        Commands::Tree(args) => commands::tree::execute(args, &ctx)?,
        Commands::Model(args) => commands::model::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
        Commands::List(args) => commands::list::execute(args, &ctx)?,
    }

    Ok(())
}

/// Routes `tracing` events and bridged `log` records to stderr.
///
/// `--verbose` forces debug; otherwise `ARBOR_LOG` is honoured and the
/// default is `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("ARBOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
