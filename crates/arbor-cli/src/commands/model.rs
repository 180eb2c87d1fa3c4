//! Model command implementation.
//!
//! Builds a lattice model, shows its per-step parameters and optionally
//! saves it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use arbor_ext_json::{save_model_file, JsonCodec};
use arbor_lattice::LatticeModel;

use crate::cli::OutputFormat;
use crate::commands::{Context, LatticeArgs};
use crate::output::{print_header, print_output, print_success, print_warning};

/// Arguments for the model command.
#[derive(Args, Debug)]
pub struct ModelArgs {
    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Bind the model to this expiration (years) to show branch parameters
    #[arg(short = 't', long)]
    pub expiration: Option<f64>,

    /// Save the model to a JSON file
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

/// One step of the model.
#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    step: usize,
    #[tabled(rename = "Rate")]
    rate: f64,
    #[tabled(rename = "Volatility")]
    volatility: f64,
    #[tabled(rename = "Up", display_with = "display_opt")]
    up_factor: Option<f64>,
    #[tabled(rename = "Down", display_with = "display_opt")]
    down_factor: Option<f64>,
    #[tabled(rename = "P(up)", display_with = "display_opt")]
    up_prob: Option<f64>,
}

fn display_opt(value: &Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.6}"))
}

fn step_rows(model: &LatticeModel) -> Vec<StepRow> {
    model
        .rates()
        .iter()
        .zip(model.vols())
        .enumerate()
        .map(|(step, (&rate, &volatility))| {
            let branch = model.branch(step, 0);
            StepRow {
                step,
                rate,
                volatility,
                up_factor: branch.map(|b| b.up_factor),
                down_factor: branch.map(|b| b.down_factor),
                up_prob: branch.map(|b| b.up_prob),
            }
        })
        .collect()
}

/// Execute the model command.
pub fn execute(args: ModelArgs, ctx: &Context) -> Result<()> {
    let _span = tracing::info_span!("model").entered();

    let mut model = args.lattice.build(&ctx.config, None)?;
    if let Some(expiration) = args.expiration {
        model = model.bind(expiration)?;
    }

    if let Some(path) = &args.save {
        save_model_file(path, &model)?;
    }

    match ctx.format {
        OutputFormat::Json => println!("{}", JsonCodec::pretty().encode_model(&model)?),
        format => {
            if format == OutputFormat::Table && !ctx.quiet {
                let title = match model.dt() {
                    Some(dt) => format!("{}-step model (dt = {dt:.6})", model.steps()),
                    None => format!("{}-step model template", model.steps()),
                };
                print_header(&title);
            }
            print_output(&step_rows(&model), format)?;
        }
    }

    if !ctx.quiet {
        for issue in model.arbitrage_issues(ctx.config.engine.probability_tolerance) {
            print_warning(&format!("arbitrage: {issue}"));
        }
        if let Some(path) = &args.save {
            if ctx.format == OutputFormat::Table {
                print_success(&format!("Model saved to {}", path.display()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_rows_have_no_branches() {
        let model = LatticeModel::template(2, vec![0.01, 0.02], vec![0.2, 0.3]).unwrap();
        let rows = step_rows(&model);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].rate, 0.02);
        assert!(rows.iter().all(|r| r.up_prob.is_none()));
        assert_eq!(display_opt(&None), "-");
    }

    #[test]
    fn test_bound_rows() {
        let model = LatticeModel::flat(1, 1.0, 0.05, 0.2).unwrap();
        let rows = step_rows(&model);

        assert!((rows[0].up_prob.unwrap() - 0.577_493).abs() < 1e-6);
        assert!((rows[0].up_factor.unwrap() * rows[0].down_factor.unwrap() - 1.0).abs() < 1e-12);
    }
}
