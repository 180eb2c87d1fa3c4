//! Tree command implementation.
//!
//! Prints one of the lattice trees, transposed so it reads left to right.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use arbor_ext_json::TreeExport;
use arbor_lattice::NodeTree;
use arbor_pricing::render_tree;

use crate::cli::OutputFormat;
use crate::commands::{build_priced_contract, ContractArgs, Context, LatticeArgs};
use crate::output::print_output;

/// Which tree to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TreeKind {
    /// Underlying price at every node
    #[default]
    Prices,
    /// Up/down multipliers leading into each node
    Factors,
    /// Option value at every node
    Values,
    /// Delta at every interior node
    Delta,
    /// Theta at every parent node
    Theta,
}

/// Arguments for the tree command.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Tree to print
    #[arg(long, value_enum, default_value = "prices")]
    pub kind: TreeKind,
}

/// One node, for CSV and table output.
#[derive(Debug, Serialize, Tabled)]
struct NodeRow {
    #[tabled(rename = "Level")]
    level: usize,
    #[tabled(rename = "Node")]
    node: usize,
    #[tabled(rename = "Value")]
    value: f64,
}

/// Execute the tree command.
pub fn execute(args: TreeArgs, ctx: &Context) -> Result<()> {
    let _span = tracing::info_span!("tree", kind = ?args.kind).entered();

    let contract = build_priced_contract(&args.contract, &args.lattice, &ctx.config)?;
    let model = contract.bound_model()?;

    let levels = match args.kind {
        TreeKind::Prices => NodeTree::expand(contract.spot(), model)?.into_levels(),
        TreeKind::Factors => model.factor_levels(),
        kind => {
            let valuation = ctx.engine().valuate(&contract)?;
            match kind {
                TreeKind::Values => valuation.value_tree().levels().to_vec(),
                TreeKind::Delta => valuation.delta().levels().to_vec(),
                _ => valuation.theta()?.into_levels(),
            }
        }
    };

    match ctx.format {
        OutputFormat::Json => {
            let json = if matches!(args.kind, TreeKind::Prices | TreeKind::Factors) {
                serde_json::to_string_pretty(&TreeExport::new(&contract)?)?
            } else {
                serde_json::to_string_pretty(&levels)?
            };
            println!("{json}");
        }
        OutputFormat::Csv => {
            let rows: Vec<NodeRow> = levels
                .iter()
                .enumerate()
                .flat_map(|(level, values)| {
                    values.iter().enumerate().map(move |(node, &value)| NodeRow {
                        level,
                        node,
                        value,
                    })
                })
                .collect();
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Table | OutputFormat::Minimal => {
            print!("{}", render_tree(&levels, ctx.precision()));
        }
    }

    Ok(())
}
