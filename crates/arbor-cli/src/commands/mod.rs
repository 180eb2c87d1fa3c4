//! CLI command implementations.

pub mod config;
pub mod list;
pub mod model;
pub mod price;
pub mod report;
pub mod tree;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use list::ListArgs;
pub use model::ModelArgs;
pub use price::PriceArgs;
pub use report::ReportArgs;
pub use tree::TreeArgs;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Deserialize;

use arbor_config::ArborConfig;
use arbor_core::{ExerciseStyle, OptionSide, PayoffStyle};
use arbor_ext_json::{load_contract_file, load_model_file};
use arbor_lattice::{parse_step_values, LatticeModel};
use arbor_pricing::{ContractKind, MarketDataSource, OptionContract, PricingEngine, StaticMarketData};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// State shared by every command.
pub struct Context {
    pub config: ArborConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Engine configured from the loaded settings.
    pub fn engine(&self) -> PricingEngine {
        PricingEngine::new(self.config.engine.clone())
    }

    /// Decimal places for prices and tree nodes.
    pub fn precision(&self) -> usize {
        self.config.report.precision
    }
}

/// Label used for the price history when no underlying is named.
const DEFAULT_TICKER: &str = "UNDERLYING";

/// Contract definition, inline or from a saved JSON file.
#[derive(Args, Debug, Default)]
pub struct ContractArgs {
    /// Load the contract from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["spot", "strike", "strike_ratio", "side", "style", "payoff", "underlying", "currency", "expiration"])]
    pub contract: Option<PathBuf>,

    /// Current price of the underlying
    #[arg(long)]
    pub spot: Option<f64>,

    /// Strike price
    #[arg(short = 'k', long, conflicts_with = "strike_ratio")]
    pub strike: Option<f64>,

    /// Strike as a multiple of spot (e.g. 1.05)
    #[arg(long)]
    pub strike_ratio: Option<f64>,

    /// Time to expiration in years [default: 1]
    #[arg(short = 't', long)]
    pub expiration: Option<f64>,

    /// Call or put [default: call]
    #[arg(long)]
    pub side: Option<OptionSide>,

    /// Exercise style: european, american or asian [default: european]
    #[arg(long)]
    pub style: Option<ExerciseStyle>,

    /// Averaging payoff: fixed or floating (asian only)
    #[arg(long)]
    pub payoff: Option<PayoffStyle>,

    /// Underlying asset label
    #[arg(short, long)]
    pub underlying: Option<String>,

    /// Currency of spot and strike [default: USD]
    #[arg(long)]
    pub currency: Option<String>,

    /// Daily closing prices (CSV with a `close` column); supplies spot and volatility
    #[arg(long, value_name = "CSV")]
    pub closes: Option<PathBuf>,

    /// FX rate, units of --to-currency per unit of the contract currency
    #[arg(long, requires = "to_currency")]
    pub fx: Option<f64>,

    /// Convert spot into this currency using --fx
    #[arg(long, requires = "fx")]
    pub to_currency: Option<String>,
}

/// Lattice model definition, inline or from a saved JSON file.
#[derive(Args, Debug, Default)]
pub struct LatticeArgs {
    /// Load the model from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["steps", "rate", "vol"])]
    pub model: Option<PathBuf>,

    /// Number of tree steps
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Risk-free rate: one value or one per step, comma-separated
    #[arg(short, long, allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Volatility: one value or one per step, comma-separated
    #[arg(long)]
    pub vol: Option<String>,
}

impl LatticeArgs {
    /// Builds the model, filling gaps from configuration and `fallback_vol`.
    ///
    /// The result is whatever was loaded or an unbound template.
    pub fn build(&self, config: &ArborConfig, fallback_vol: Option<f64>) -> Result<LatticeModel> {
        if let Some(path) = &self.model {
            tracing::debug!(path = %path.display(), "loading model");
            return Ok(load_model_file(path)?);
        }

        let defaults = &config.model;
        let steps = self.steps.unwrap_or(defaults.steps);
        let rates = match &self.rate {
            Some(text) => parse_step_values(text, steps)?,
            None => vec![defaults.rate; steps],
        };
        let vols = match (&self.vol, fallback_vol) {
            (Some(text), _) => parse_step_values(text, steps)?,
            (None, Some(vol)) => vec![vol; steps],
            (None, None) => vec![defaults.volatility; steps],
        };

        Ok(LatticeModel::template(steps, rates, vols)?)
    }
}

/// Builds a contract with its model attached.
pub fn build_priced_contract(
    contract_args: &ContractArgs,
    lattice_args: &LatticeArgs,
    config: &ArborConfig,
) -> Result<OptionContract> {
    let ticker = contract_args
        .underlying
        .clone()
        .unwrap_or_else(|| DEFAULT_TICKER.to_string());

    let mut market = StaticMarketData::new(config.model.rate);
    if let Some(path) = &contract_args.closes {
        let closes = read_closes(path)?;
        tracing::debug!(count = closes.len(), "loaded price history");
        market = market.with_closes(&ticker, &closes)?;
    }
    let history = contract_args.closes.is_some();

    let mut contract = match &contract_args.contract {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading contract");
            load_contract_file(path)?
        }
        None => inline_contract(contract_args, &ticker, &market, history)?,
    };

    if let (Some(rate), Some(to)) = (contract_args.fx, &contract_args.to_currency) {
        market = market.with_fx_rate(contract.currency(), to.as_str(), rate);
        let fx = market.fx_rate(contract.currency(), to)?;
        contract = contract.convert_spot(fx, to.as_str())?;
    }

    let fallback_vol = if history {
        Some(market.annualized_volatility(&ticker)?)
    } else {
        None
    };
    let model = lattice_args.build(config, fallback_vol)?;
    Ok(contract.with_model(&model)?)
}

fn inline_contract(
    args: &ContractArgs,
    ticker: &str,
    market: &StaticMarketData,
    history: bool,
) -> Result<OptionContract> {
    let spot = match args.spot {
        Some(spot) => spot,
        None if history => market.spot(ticker)?,
        None => return Err(CliError::MissingArgument("--spot (or --closes)".into()).into()),
    };
    let expiration = args.expiration.unwrap_or(1.0);
    let side = args.side.unwrap_or(OptionSide::Call);
    let kind = ContractKind::from_parts(args.style.unwrap_or_default(), args.payoff)?;

    let contract = match (args.strike, args.strike_ratio) {
        (Some(strike), _) => OptionContract::new(spot, strike, expiration, side, kind)?,
        (None, Some(ratio)) => OptionContract::at_strike_ratio(spot, ratio, expiration, side, kind)?,
        (None, None) => {
            return Err(CliError::MissingArgument("--strike or --strike-ratio".into()).into())
        }
    };

    Ok(contract
        .with_underlying(args.underlying.clone().unwrap_or_default())
        .with_currency(args.currency.clone().unwrap_or_else(|| "USD".to_string())))
}

/// One row of a closing-price history.
#[derive(Debug, Deserialize)]
struct CloseRecord {
    #[serde(alias = "Close")]
    close: f64,
}

/// Reads closing prices from a CSV file with a header row.
pub fn read_closes(path: &Path) -> CliResult<Vec<f64>> {
    let invalid = |reason: String| CliError::InvalidHistory {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|e| invalid(e.to_string()))?;
    reader
        .deserialize::<CloseRecord>()
        .map(|row| row.map(|r| r.close).map_err(|e| invalid(e.to_string())))
        .collect()
}
