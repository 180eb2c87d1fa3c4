//! Report command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use arbor_pricing::PricingReport;

use crate::cli::OutputFormat;
use crate::commands::{build_priced_contract, ContractArgs, Context, LatticeArgs};
use crate::output::print_success;

/// Arguments for the report command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the report command.
///
/// JSON output is the full valuation: every tree plus any numeric issues.
pub fn execute(args: ReportArgs, ctx: &Context) -> Result<()> {
    let _span = tracing::info_span!("report").entered();

    let contract = build_priced_contract(&args.contract, &args.lattice, &ctx.config)?;
    let valuation = ctx.engine().valuate(&contract)?;

    let text = match ctx.format {
        OutputFormat::Json => serde_json::to_string_pretty(&valuation)? + "\n",
        _ => PricingReport::new(&contract, &valuation, ctx.precision())?.to_string(),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            if !ctx.quiet {
                print_success(&format!("Report written to {}", path.display()));
            }
        }
        None => print!("{text}"),
    }

    Ok(())
}
