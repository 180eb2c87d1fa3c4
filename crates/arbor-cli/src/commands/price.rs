//! Price command implementation.
//!
//! Values a contract and shows the root Greeks.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use arbor_core::{ExerciseStyle, NumericIssue, OptionSide};
use arbor_ext_json::{save_contract_file, save_model_file};

use crate::cli::OutputFormat;
use crate::commands::{build_priced_contract, ContractArgs, Context, LatticeArgs};
use crate::output::{print_header, print_output, print_success, print_warning, KeyValue};

/// Arguments for the price command.
#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Save the contract (without its model) to a JSON file
    #[arg(long, value_name = "FILE")]
    pub save_contract: Option<PathBuf>,

    /// Save the model as an unbound template to a JSON file
    #[arg(long, value_name = "FILE")]
    pub save_model: Option<PathBuf>,
}

/// Machine-readable pricing result.
#[derive(Debug, Serialize)]
struct PriceSummary<'a> {
    style: ExerciseStyle,
    side: OptionSide,
    spot: f64,
    strike: f64,
    expiration: f64,
    steps: usize,
    dt: f64,
    price: f64,
    delta: f64,
    theta: f64,
    issues: &'a [NumericIssue],
}

/// Execute the price command.
pub fn execute(args: PriceArgs, ctx: &Context) -> Result<()> {
    let _span = tracing::info_span!("price").entered();

    let contract = build_priced_contract(&args.contract, &args.lattice, &ctx.config)?;
    let model = contract.bound_model()?;
    let valuation = ctx.engine().valuate(&contract)?;
    let theta = valuation.theta()?;
    tracing::debug!(price = valuation.price(), "valuation complete");

    let summary = PriceSummary {
        style: valuation.style(),
        side: contract.side(),
        spot: contract.spot(),
        strike: contract.strike(),
        expiration: contract.expiration(),
        steps: model.steps(),
        dt: valuation.dt(),
        price: valuation.price(),
        delta: valuation.delta().root(),
        theta: theta.root(),
        issues: valuation.issues(),
    };

    if let Some(path) = &args.save_contract {
        save_contract_file(path, &contract)?;
    }
    if let Some(path) = &args.save_model {
        save_model_file(path, &model.to_template())?;
    }

    let p = ctx.precision();
    let mut results = vec![
        KeyValue::new("Option Type", summary.style.as_str()),
        KeyValue::new("Side", summary.side.as_str()),
        KeyValue::from_f64("Spot", summary.spot, p),
        KeyValue::from_f64("Strike", summary.strike, p),
        KeyValue::from_f64("Expiration", summary.expiration, p),
        KeyValue::new("Steps", summary.steps.to_string()),
        KeyValue::from_steps("Rates", model.rates(), p),
        KeyValue::from_steps("Volatilities", model.vols(), p),
        KeyValue::from_f64("Time Step", summary.dt, 6),
    ];
    if let Some(payoff) = contract.kind().payoff_style() {
        results.insert(1, KeyValue::new("Payoff Type", payoff.as_str()));
    }
    results.push(KeyValue::new("", "")); // Separator
    results.push(KeyValue::from_f64("Price", summary.price, p));
    results.push(KeyValue::from_f64("Delta", summary.delta, p));
    results.push(KeyValue::from_f64("Theta", summary.theta, p));

    match ctx.format {
        OutputFormat::Table => {
            if !ctx.quiet {
                print_header("Option Pricing Results");
            }
            print_output(&results, ctx.format)?;
            if !ctx.quiet {
                for issue in summary.issues {
                    print_warning(&issue.to_string());
                }
                if let Some(path) = &args.save_contract {
                    print_success(&format!("Contract saved to {}", path.display()));
                }
                if let Some(path) = &args.save_model {
                    print_success(&format!("Model saved to {}", path.display()));
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Csv => {
            let rows: Vec<KeyValue> = results.into_iter().filter(|r| !r.key.is_empty()).collect();
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Minimal => {
            println!("{}", summary.price);
        }
    }

    Ok(())
}
