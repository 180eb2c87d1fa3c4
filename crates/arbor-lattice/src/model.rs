//! Cox-Ross-Rubinstein lattice model.
//!
//! A [`LatticeModel`] holds per-step rates and volatilities and, once bound
//! to an expiration, the per-node transition parameters used to grow a price
//! tree and discount values back through it.

use serde::{Deserialize, Serialize};

use arbor_core::{ArborError, ArborResult, IssueKind, NumericIssue};

/// Largest step count a lattice may be built with.
///
/// The tree is a full binary tree, so level `n` holds `2^n` nodes.
pub const MAX_STEPS: usize = 24;

/// Time step written for a model that is not bound to a contract.
pub const UNBOUND_DT: f64 = -1.0;

/// Transition parameters out of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Risk-neutral probability of an up move.
    pub up_prob: f64,
    /// Risk-neutral probability of a down move.
    pub down_prob: f64,
    /// Price multiplier on an up move.
    pub up_factor: f64,
    /// Price multiplier on a down move.
    pub down_factor: f64,
}

impl Branch {
    /// Derives CRR parameters from a step's rate and volatility.
    ///
    /// # Formula
    ///
    /// ```text
    /// u = e^(σ√dt),  d = 1/u
    /// p = (e^(r·dt) - d) / (u - d)
    /// ```
    #[must_use]
    pub fn crr(rate: f64, vol: f64, dt: f64) -> Self {
        let up_factor = (vol * dt.sqrt()).exp();
        let down_factor = 1.0 / up_factor;
        let up_prob = ((rate * dt).exp() - down_factor) / (up_factor - down_factor);

        Self {
            up_prob,
            down_prob: 1.0 - up_prob,
            up_factor,
            down_factor,
        }
    }

    /// Returns true if the up probability is a finite number in `[0, 1]`,
    /// allowing `tolerance` of slack at either end.
    #[must_use]
    pub fn is_arbitrage_free(&self, tolerance: f64) -> bool {
        self.up_prob.is_finite() && self.up_prob >= -tolerance && self.up_prob <= 1.0 + tolerance
    }
}

/// Per-step market model for a binomial lattice.
///
/// # Lifecycle
///
/// A model is either a **template** (unbound: rates and volatilities only,
/// reusable across contracts) or **bound** (has a time step and computed
/// branches). Binding happens once at construction; [`LatticeModel::bind`]
/// returns a new bound copy sized to a contract's expiration.
///
/// # Structure
///
/// `branches[i]` holds `2^i` entries, one per node at level `i`. All entries
/// at a level are identical since rate and volatility vary only by step; the
/// per-node layout keeps indexing aligned with the price tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelSnapshot", into = "ModelSnapshot")]
pub struct LatticeModel {
    steps: usize,
    dt: Option<f64>,
    rates: Vec<f64>,
    vols: Vec<f64>,
    branches: Vec<Vec<Branch>>,
}

impl LatticeModel {
    /// Builds a bound model with an explicit time step.
    ///
    /// # Arguments
    ///
    /// * `steps` - Number of time steps (>= 1)
    /// * `rates` - Annualized risk-free rate per step
    /// * `vols` - Annualized volatility per step
    /// * `dt` - Time step in years (> 0)
    pub fn build(steps: usize, rates: Vec<f64>, vols: Vec<f64>, dt: f64) -> ArborResult<Self> {
        validate_inputs(steps, &rates, &vols)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ArborError::configuration(format!(
                "time step must be positive and finite, got {dt}"
            )));
        }

        let branches = compute_branches(&rates, &vols, dt);
        log::debug!("built lattice: steps={steps}, dt={dt}");

        Ok(Self {
            steps,
            dt: Some(dt),
            rates,
            vols,
            branches,
        })
    }

    /// Creates a bound model sized to `expiration` with per-step inputs.
    pub fn new(steps: usize, expiration: f64, rates: Vec<f64>, vols: Vec<f64>) -> ArborResult<Self> {
        validate_inputs(steps, &rates, &vols)?;
        let dt = time_step_for(steps, expiration)?;
        Self::build(steps, rates, vols, dt)
    }

    /// Creates a bound model with one rate and volatility for every step.
    pub fn flat(steps: usize, expiration: f64, rate: f64, vol: f64) -> ArborResult<Self> {
        Self::new(steps, expiration, vec![rate; steps], vec![vol; steps])
    }

    /// Creates an unbound template with per-step inputs.
    pub fn template(steps: usize, rates: Vec<f64>, vols: Vec<f64>) -> ArborResult<Self> {
        validate_inputs(steps, &rates, &vols)?;
        Ok(Self {
            steps,
            dt: None,
            rates,
            vols,
            branches: Vec::new(),
        })
    }

    /// Creates an unbound template with one rate and volatility for every step.
    pub fn flat_template(steps: usize, rate: f64, vol: f64) -> ArborResult<Self> {
        Self::template(steps, vec![rate; steps], vec![vol; steps])
    }

    /// Returns a bound copy of this model sized to `expiration`.
    ///
    /// Works on templates and bound models alike; the existing time step,
    /// if any, is discarded.
    pub fn bind(&self, expiration: f64) -> ArborResult<Self> {
        Self::new(self.steps, expiration, self.rates.clone(), self.vols.clone())
    }

    /// Returns an unbound copy carrying the same rates and volatilities.
    #[must_use]
    pub fn to_template(&self) -> Self {
        Self {
            steps: self.steps,
            dt: None,
            rates: self.rates.clone(),
            vols: self.vols.clone(),
            branches: Vec::new(),
        }
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Time step in years, or `None` for a template.
    pub fn dt(&self) -> Option<f64> {
        self.dt
    }

    /// Returns true if the model has a time step and computed branches.
    pub fn is_bound(&self) -> bool {
        self.dt.is_some()
    }

    /// Time step in years, failing for templates.
    pub fn time_step(&self) -> ArborResult<f64> {
        self.dt.ok_or_else(|| {
            ArborError::configuration("lattice model is not bound to an expiration")
        })
    }

    /// Total horizon covered by a bound model.
    pub fn expiration(&self) -> Option<f64> {
        self.dt.map(|dt| dt * self.steps as f64)
    }

    /// Per-step annualized rates.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Per-step annualized volatilities.
    pub fn vols(&self) -> &[f64] {
        &self.vols
    }

    /// Rate in force over `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= steps`.
    pub fn rate(&self, step: usize) -> f64 {
        self.rates[step]
    }

    /// All branches, indexed `[step][node]`. Empty for templates.
    pub fn branches(&self) -> &[Vec<Branch>] {
        &self.branches
    }

    /// Branch out of node `node` at `step`, if it exists.
    pub fn branch(&self, step: usize, node: usize) -> Option<&Branch> {
        self.branches.get(step).and_then(|level| level.get(node))
    }

    /// Number of nodes at tree level `level` (`2^level`).
    pub fn node_count(level: usize) -> usize {
        1usize << level
    }

    /// One-step discount factor `e^(-r·dt)` for `step`.
    ///
    /// Returns `None` for templates or out-of-range steps.
    pub fn discount_factor(&self, step: usize) -> Option<f64> {
        let dt = self.dt?;
        self.rates.get(step).map(|rate| (-rate * dt).exp())
    }

    /// Checks every step's up probability against `[0, 1]`.
    ///
    /// Nodes within a step share parameters, so at most one issue is
    /// reported per step, located at node 0.
    pub fn arbitrage_issues(&self, tolerance: f64) -> Vec<NumericIssue> {
        self.branches
            .iter()
            .enumerate()
            .filter_map(|(step, level)| {
                let branch = level.first()?;
                (!branch.is_arbitrage_free(tolerance)).then(|| {
                    NumericIssue::new(
                        step,
                        0,
                        IssueKind::ProbabilityOutOfRange {
                            up_prob: branch.up_prob,
                        },
                    )
                })
            })
            .collect()
    }

    /// Up/down factor pairs laid out like the child level of each step.
    ///
    /// Level `i` holds `2^(i+1)` entries: `[u, d, u, d, ...]`.
    pub fn factor_levels(&self) -> Vec<Vec<f64>> {
        self.branches
            .iter()
            .map(|level| {
                level
                    .iter()
                    .flat_map(|b| [b.up_factor, b.down_factor])
                    .collect()
            })
            .collect()
    }

    /// Exports the persisted form of this model.
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            steps: self.steps,
            dt: self.dt.unwrap_or(UNBOUND_DT),
            rates: self.rates.clone(),
            volatilities: self.vols.clone(),
        }
    }

    /// Rebuilds a model from its persisted form.
    ///
    /// A time step equal to [`UNBOUND_DT`] yields a template; any other value
    /// must be a positive time step and triggers a branch rebuild.
    pub fn from_snapshot(snapshot: ModelSnapshot) -> ArborResult<Self> {
        let ModelSnapshot {
            steps,
            dt,
            rates,
            volatilities,
        } = snapshot;

        if dt == UNBOUND_DT {
            Self::template(steps, rates, volatilities)
        } else {
            Self::build(steps, rates, volatilities, dt)
        }
    }
}

/// Persisted form of a [`LatticeModel`].
///
/// Branches are never persisted; they are recomputed on import.
///
/// ```json
/// { "steps": 3, "dt": 0.25, "rates": [0.05, 0.05, 0.05], "volatilities": [0.2, 0.2, 0.2] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Number of time steps.
    pub steps: usize,
    /// Time step in years, or `-1` for an unbound template.
    pub dt: f64,
    /// Per-step rates.
    pub rates: Vec<f64>,
    /// Per-step volatilities.
    pub volatilities: Vec<f64>,
}

impl TryFrom<ModelSnapshot> for LatticeModel {
    type Error = ArborError;

    fn try_from(snapshot: ModelSnapshot) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

impl From<LatticeModel> for ModelSnapshot {
    fn from(model: LatticeModel) -> Self {
        model.snapshot()
    }
}

fn validate_inputs(steps: usize, rates: &[f64], vols: &[f64]) -> ArborResult<()> {
    if steps < 1 {
        return Err(ArborError::configuration("step count must be at least 1"));
    }
    if steps > MAX_STEPS {
        return Err(ArborError::configuration(format!(
            "step count {steps} exceeds the maximum of {MAX_STEPS}"
        )));
    }
    if rates.len() != steps {
        return Err(ArborError::configuration(format!(
            "expected {steps} rates, got {}",
            rates.len()
        )));
    }
    if vols.len() != steps {
        return Err(ArborError::configuration(format!(
            "expected {steps} volatilities, got {}",
            vols.len()
        )));
    }
    if let Some(rate) = rates.iter().find(|r| !r.is_finite()) {
        return Err(ArborError::configuration(format!("rate {rate} is not finite")));
    }
    if let Some(vol) = vols.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(ArborError::configuration(format!(
            "volatility {vol} must be finite and non-negative"
        )));
    }
    Ok(())
}

fn time_step_for(steps: usize, expiration: f64) -> ArborResult<f64> {
    if !(expiration.is_finite() && expiration > 0.0) {
        return Err(ArborError::configuration(format!(
            "expiration must be positive, got {expiration}"
        )));
    }
    Ok(expiration / steps as f64)
}

fn compute_branches(rates: &[f64], vols: &[f64], dt: f64) -> Vec<Vec<Branch>> {
    rates
        .iter()
        .zip(vols)
        .enumerate()
        .map(|(step, (&rate, &vol))| vec![Branch::crr(rate, vol, dt); LatticeModel::node_count(step)])
        .collect()
}
