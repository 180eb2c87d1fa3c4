//! Option contracts.
//!
//! An [`OptionContract`] carries the economics of a single option plus the
//! lattice model it will be valued on. The exercise style is a closed
//! [`ContractKind`] variant; only averaging contracts carry a payoff style.

use serde::{Deserialize, Serialize};

use arbor_core::{ArborError, ArborResult, ExerciseStyle, OptionSide, PayoffStyle};
use arbor_lattice::LatticeModel;

/// Exercise style of a contract, with the averaging payoff where relevant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Exercisable at expiration only.
    #[default]
    European,
    /// Exercisable at any node.
    American,
    /// Pays on the average price along the path.
    Averaging {
        /// Fixed or floating strike.
        payoff: PayoffStyle,
    },
}

impl ContractKind {
    /// Builds a kind from an exercise style and optional payoff style.
    ///
    /// The payoff style is required for averaging contracts and ignored
    /// otherwise.
    pub fn from_parts(style: ExerciseStyle, payoff: Option<PayoffStyle>) -> ArborResult<Self> {
        match style {
            ExerciseStyle::European => Ok(Self::European),
            ExerciseStyle::American => Ok(Self::American),
            ExerciseStyle::Averaging => payoff
                .map(|payoff| Self::Averaging { payoff })
                .ok_or_else(|| {
                    ArborError::configuration("averaging contracts require a payoff style")
                }),
        }
    }

    /// The exercise style tag.
    pub fn style(&self) -> ExerciseStyle {
        match self {
            Self::European => ExerciseStyle::European,
            Self::American => ExerciseStyle::American,
            Self::Averaging { .. } => ExerciseStyle::Averaging,
        }
    }

    /// The payoff style, for averaging contracts only.
    pub fn payoff_style(&self) -> Option<PayoffStyle> {
        match self {
            Self::Averaging { payoff } => Some(*payoff),
            _ => None,
        }
    }
}

/// A single option contract.
///
/// # Example
///
/// ```rust
/// use arbor_core::OptionSide;
/// use arbor_lattice::LatticeModel;
/// use arbor_pricing::{ContractKind, OptionContract};
///
/// let template = LatticeModel::flat_template(3, 0.05, 0.2).unwrap();
/// let contract = OptionContract::new(100.0, 95.0, 0.5, OptionSide::Put, ContractKind::American)
///     .unwrap()
///     .with_underlying("AAPL")
///     .with_currency("USD")
///     .with_model(&template)
///     .unwrap();
///
/// assert_eq!(contract.model().and_then(|m| m.dt()), Some(0.5 / 3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionContract {
    underlying: String,
    currency: String,
    spot: f64,
    strike: f64,
    expiration: f64,
    side: OptionSide,
    kind: ContractKind,
    model: Option<LatticeModel>,
}

impl OptionContract {
    /// Creates a contract without a model.
    ///
    /// # Arguments
    ///
    /// * `spot` - Current underlying price (> 0)
    /// * `strike` - Strike price (>= 0)
    /// * `expiration` - Time to expiration in years (> 0)
    /// * `side` - Call or put
    /// * `kind` - Exercise style
    pub fn new(
        spot: f64,
        strike: f64,
        expiration: f64,
        side: OptionSide,
        kind: ContractKind,
    ) -> ArborResult<Self> {
        validate_economics(spot, strike, expiration)?;
        Ok(Self {
            underlying: String::new(),
            currency: String::new(),
            spot,
            strike,
            expiration,
            side,
            kind,
            model: None,
        })
    }

    /// Creates a contract whose strike is `ratio` times the spot.
    pub fn at_strike_ratio(
        spot: f64,
        ratio: f64,
        expiration: f64,
        side: OptionSide,
        kind: ContractKind,
    ) -> ArborResult<Self> {
        Self::new(spot, spot * ratio, expiration, side, kind)
    }

    /// Sets the underlying label.
    #[must_use]
    pub fn with_underlying(mut self, underlying: impl Into<String>) -> Self {
        self.underlying = underlying.into();
        self
    }

    /// Sets the currency label.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Attaches `model`, bound to this contract's expiration.
    pub fn with_model(mut self, model: &LatticeModel) -> ArborResult<Self> {
        self.attach_model(model)?;
        Ok(self)
    }

    /// Binds `model` to this contract's expiration and stores the result.
    ///
    /// Any existing time step on `model` is replaced, so the stored model
    /// always satisfies `dt * steps == expiration`.
    pub fn attach_model(&mut self, model: &LatticeModel) -> ArborResult<()> {
        let bound = model.bind(self.expiration)?;
        log::debug!(
            "attached {}-step model to contract (expiration={})",
            bound.steps(),
            self.expiration
        );
        self.model = Some(bound);
        Ok(())
    }

    /// Converts the spot into another currency.
    ///
    /// Strike is left alone; set it after converting when it is quoted in
    /// the target currency.
    pub fn convert_spot(mut self, fx_rate: f64, currency: impl Into<String>) -> ArborResult<Self> {
        if !(fx_rate.is_finite() && fx_rate > 0.0) {
            return Err(ArborError::configuration(format!(
                "fx rate must be positive, got {fx_rate}"
            )));
        }
        self.spot *= fx_rate;
        self.currency = currency.into();
        Ok(self)
    }

    /// Underlying label.
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Currency label.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Current underlying price.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike price.
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiration in years.
    pub fn expiration(&self) -> f64 {
        self.expiration
    }

    /// Call or put.
    pub fn side(&self) -> OptionSide {
        self.side
    }

    /// Exercise style with payoff.
    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    /// Attached model, if any.
    pub fn model(&self) -> Option<&LatticeModel> {
        self.model.as_ref()
    }

    /// Attached model, failing if none is attached or it is unbound.
    pub fn bound_model(&self) -> ArborResult<&LatticeModel> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ArborError::configuration("contract has no lattice model attached"))?;
        model.time_step()?;
        Ok(model)
    }
}

fn validate_economics(spot: f64, strike: f64, expiration: f64) -> ArborResult<()> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(ArborError::configuration(format!(
            "spot must be positive, got {spot}"
        )));
    }
    if !(strike.is_finite() && strike >= 0.0) {
        return Err(ArborError::configuration(format!(
            "strike must be non-negative, got {strike}"
        )));
    }
    if !(expiration.is_finite() && expiration > 0.0) {
        return Err(ArborError::configuration(format!(
            "expiration must be positive, got {expiration}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn european_call() -> OptionContract {
        OptionContract::new(100.0, 100.0, 1.0, OptionSide::Call, ContractKind::European).unwrap()
    }

    #[test]
    fn test_kind_from_parts() {
        assert_eq!(
            ContractKind::from_parts(ExerciseStyle::American, Some(PayoffStyle::Floating)).unwrap(),
            ContractKind::American
        );
        assert_eq!(
            ContractKind::from_parts(ExerciseStyle::Averaging, Some(PayoffStyle::Floating))
                .unwrap()
                .payoff_style(),
            Some(PayoffStyle::Floating)
        );
        assert!(ContractKind::from_parts(ExerciseStyle::Averaging, None).is_err());
    }

    #[test]
    fn test_invalid_economics() {
        let kind = ContractKind::European;
        assert!(OptionContract::new(0.0, 100.0, 1.0, OptionSide::Call, kind).is_err());
        assert!(OptionContract::new(100.0, -1.0, 1.0, OptionSide::Call, kind).is_err());
        assert!(OptionContract::new(100.0, 100.0, 0.0, OptionSide::Call, kind).is_err());
        assert!(OptionContract::new(f64::NAN, 100.0, 1.0, OptionSide::Call, kind).is_err());
    }

    #[test]
    fn test_attach_binds_to_expiration() {
        let template = LatticeModel::flat_template(4, 0.03, 0.25).unwrap();
        let contract = OptionContract::new(50.0, 55.0, 2.0, OptionSide::Put, ContractKind::American)
            .unwrap()
            .with_model(&template)
            .unwrap();

        let model = contract.bound_model().unwrap();
        assert_relative_eq!(model.time_step().unwrap(), 0.5);
        assert_eq!(model.branches().len(), 4);
    }

    #[test]
    fn test_attach_rebinds_bound_model() {
        let bound = LatticeModel::flat(2, 10.0, 0.05, 0.2).unwrap();
        let contract = european_call().with_model(&bound).unwrap();
        assert_relative_eq!(contract.bound_model().unwrap().time_step().unwrap(), 0.5);
    }

    #[test]
    fn test_missing_model() {
        let err = european_call().bound_model().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_strike_ratio_and_fx() {
        let contract =
            OptionContract::at_strike_ratio(200.0, 1.1, 1.0, OptionSide::Call, ContractKind::European)
                .unwrap();
        assert_relative_eq!(contract.strike(), 220.0);

        let converted = contract.convert_spot(0.9, "EUR").unwrap();
        assert_relative_eq!(converted.spot(), 180.0);
        assert_eq!(converted.currency(), "EUR");

        assert!(european_call().convert_spot(0.0, "EUR").is_err());
    }
}
