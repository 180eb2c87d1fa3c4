//! Config command implementation.
//!
//! Shows the active configuration and creates or checks TOML files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use arbor_config::{ArborConfig, ConfigError};

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{print_output, print_success, print_warning, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the active configuration
    Show,

    /// Write a configuration file with default values
    Init(InitArgs),

    /// Check a configuration file
    Validate(ValidateArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination file
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file to check
    pub path: PathBuf,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init(init) => write_defaults(&init, ctx),
        ConfigCommand::Validate(validate) => check(&validate, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Table => print!("{}", config.to_toml_string()?),
        format => {
            let rows = vec![
                KeyValue::new("engine.max_steps", config.engine.max_steps.to_string()),
                KeyValue::new("engine.strict_numerics", config.engine.strict_numerics.to_string()),
                KeyValue::new(
                    "engine.probability_tolerance",
                    config.engine.probability_tolerance.to_string(),
                ),
                KeyValue::new("model.steps", config.model.steps.to_string()),
                KeyValue::new("model.rate", config.model.rate.to_string()),
                KeyValue::new("model.volatility", config.model.volatility.to_string()),
                KeyValue::new("report.precision", config.report.precision.to_string()),
            ];
            print_output(&rows, format)?;
        }
    }
    Ok(())
}

fn write_defaults(args: &InitArgs, ctx: &Context) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::AlreadyExists(args.path.clone()).into());
    }

    std::fs::write(&args.path, ArborConfig::default().to_toml_string()?)?;
    if !ctx.quiet {
        print_success(&format!("Configuration written to {}", args.path.display()));
    }
    Ok(())
}

fn check(args: &ValidateArgs, ctx: &Context) -> Result<()> {
    match ArborConfig::load(&args.path) {
        Ok(_) => {
            if !ctx.quiet {
                print_success(&format!("{} is valid", args.path.display()));
            }
            Ok(())
        }
        Err(ConfigError::MultipleValidationErrors(errors)) => {
            for error in &errors {
                print_warning(&error.to_string());
            }
            anyhow::bail!("{} has {} invalid setting(s)", args.path.display(), errors.len())
        }
        Err(e) => Err(e.into()),
    }
}
