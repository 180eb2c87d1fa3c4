//! Persisted record shapes.

use serde::{Deserialize, Serialize};

use arbor_core::{ArborError, ArborResult, ExerciseStyle, OptionSide, PayoffStyle};
use arbor_lattice::NodeTree;
use arbor_pricing::{ContractKind, OptionContract};

/// Persisted form of an [`OptionContract`].
///
/// ```json
/// {
///   "underlying": "AAPL", "currency": "USD",
///   "spot": 100.0, "strike": 100.0, "expiration": 1.0,
///   "type": "Asian", "side": "Call", "payoff_type": "Fixed"
/// }
/// ```
///
/// `payoff_type` is written for Asian contracts only and read for Asian
/// contracts only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Underlying label.
    #[serde(default)]
    pub underlying: String,
    /// Currency label.
    #[serde(default)]
    pub currency: String,
    /// Current underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiration in years.
    pub expiration: f64,
    /// Exercise style.
    #[serde(rename = "type")]
    pub style: ExerciseStyle,
    /// Call or put.
    pub side: OptionSide,
    /// Payoff style name, Asian contracts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payoff_type: Option<String>,
}

impl From<&OptionContract> for ContractRecord {
    fn from(contract: &OptionContract) -> Self {
        let kind = contract.kind();
        Self {
            underlying: contract.underlying().to_string(),
            currency: contract.currency().to_string(),
            spot: contract.spot(),
            strike: contract.strike(),
            expiration: contract.expiration(),
            style: kind.style(),
            side: contract.side(),
            payoff_type: kind.payoff_style().map(|p| p.as_str().to_string()),
        }
    }
}

impl TryFrom<ContractRecord> for OptionContract {
    type Error = ArborError;

    fn try_from(record: ContractRecord) -> ArborResult<Self> {
        let kind = match record.style {
            ExerciseStyle::European => ContractKind::European,
            ExerciseStyle::American => ContractKind::American,
            ExerciseStyle::Averaging => {
                let name = record.payoff_type.as_deref().ok_or_else(|| {
                    ArborError::serialization("Asian contract is missing payoff_type")
                })?;
                ContractKind::Averaging {
                    payoff: payoff_from_name(name)?,
                }
            }
        };

        Ok(
            OptionContract::new(record.spot, record.strike, record.expiration, record.side, kind)?
                .with_underlying(record.underlying)
                .with_currency(record.currency),
        )
    }
}

/// Matches the exact name written by [`PayoffStyle::as_str`], like the
/// `type` and `side` fields.
fn payoff_from_name(name: &str) -> ArborResult<PayoffStyle> {
    [PayoffStyle::Fixed, PayoffStyle::Floating]
        .into_iter()
        .find(|payoff| payoff.as_str() == name)
        .ok_or_else(|| ArborError::serialization(format!("unknown payoff_type '{name}'")))
}

/// Factor and price trees for plotting, with the strike for reference.
///
/// `factors[i]` holds the `[u, d, u, d, ...]` multipliers leading into
/// level `i + 1` of `prices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeExport {
    /// Strike price.
    pub strike: f64,
    /// Per-step up/down multipliers, laid out like the child level.
    pub factors: Vec<Vec<f64>>,
    /// Underlying price at every node.
    pub prices: NodeTree,
}

impl TreeExport {
    /// Builds the export for a contract with a bound model.
    pub fn new(contract: &OptionContract) -> ArborResult<Self> {
        let model = contract.bound_model()?;
        Ok(Self {
            strike: contract.strike(),
            factors: model.factor_levels(),
            prices: NodeTree::expand(contract.spot(), model)?,
        })
    }
}
