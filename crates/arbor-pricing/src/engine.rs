//! Backward-induction pricing engine.
//!
//! [`PricingEngine::valuate`] builds the price tree, seeds terminal payoffs,
//! and rolls values back to the root once. The resulting [`Valuation`]
//! answers price, delta and theta from the same trees. The engine's
//! `price`/`delta`/`theta` shortcuts each perform an independent valuation.

use serde::Serialize;

use arbor_config::EngineConfig;
use arbor_core::{ArborError, ArborResult, ExerciseStyle, IssueKind, NumericIssue};
use arbor_lattice::{LatticeModel, NodeTree};

use crate::contract::OptionContract;
use crate::greeks::{delta_tree, theta_tree};
use crate::payoff::PayoffEvaluator;

/// Binomial pricing engine.
///
/// Stateless apart from its configuration; every call rebuilds its trees.
///
/// # Example
///
/// ```rust
/// use arbor_core::OptionSide;
/// use arbor_lattice::LatticeModel;
/// use arbor_pricing::{ContractKind, OptionContract, PricingEngine};
///
/// let model = LatticeModel::flat_template(1, 0.05, 0.2).unwrap();
/// let contract = OptionContract::new(100.0, 100.0, 1.0, OptionSide::Call, ContractKind::European)
///     .unwrap()
///     .with_model(&model)
///     .unwrap();
///
/// let price = PricingEngine::default().price(&contract).unwrap();
/// assert!((price - 12.162).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: EngineConfig,
}

impl PricingEngine {
    /// Creates an engine with the given settings.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Values a contract once, keeping every intermediate tree.
    pub fn valuate(&self, contract: &OptionContract) -> ArborResult<Valuation> {
        let model = contract.bound_model()?;
        let steps = model.steps();
        if steps > self.config.max_steps {
            return Err(ArborError::configuration(format!(
                "{steps} steps exceeds the engine limit of {}",
                self.config.max_steps
            )));
        }
        let dt = model.time_step()?;

        let mut issues = Vec::new();
        self.screen(model.arbitrage_issues(self.config.probability_tolerance), &mut issues)?;

        let prices = NodeTree::expand(contract.spot(), model)?;
        if let Some(issue) = first_non_finite(&prices) {
            self.screen(vec![issue], &mut issues)?;
        }
        let evaluator = PayoffEvaluator::for_contract(contract);
        let style = contract.kind().style();

        let mut values = NodeTree::filled(steps, 0.0);
        values
            .level_mut(steps)
            .copy_from_slice(&evaluator.terminal_values(&prices));
        let mut continuation = NodeTree::filled(steps - 1, 0.0);

        roll_back(model, style, &evaluator, &prices, &mut values, &mut continuation)?;

        if let Some(issue) = first_non_finite(&values) {
            self.screen(vec![issue], &mut issues)?;
        }

        let (delta, spread_issues) = delta_tree(&prices, &values)?;
        self.screen(spread_issues, &mut issues)?;

        log::debug!(
            "valued {} contract: steps={steps}, nodes={}, price={}",
            style,
            prices.node_total(),
            values.root()
        );

        Ok(Valuation {
            style,
            dt,
            prices,
            values,
            continuation,
            delta,
            issues,
        })
    }

    /// Price of the contract.
    pub fn price(&self, contract: &OptionContract) -> ArborResult<f64> {
        Ok(self.valuate(contract)?.price())
    }

    /// Delta tree of the contract, levels `0..steps`.
    pub fn delta(&self, contract: &OptionContract) -> ArborResult<NodeTree> {
        Ok(self.valuate(contract)?.delta().clone())
    }

    /// Theta tree of the contract, levels `0..steps`.
    pub fn theta(&self, contract: &OptionContract) -> ArborResult<NodeTree> {
        self.valuate(contract)?.theta()
    }

    /// Vega tree of the contract.
    ///
    /// Not implemented; always fails with [`ArborError::NotImplemented`].
    pub fn vega(&self, _contract: &OptionContract) -> ArborResult<NodeTree> {
        Err(ArborError::not_implemented("vega"))
    }

    /// Fails on the first issue in strict mode; otherwise logs and keeps
    /// every issue.
    fn screen(&self, found: Vec<NumericIssue>, issues: &mut Vec<NumericIssue>) -> ArborResult<()> {
        if self.config.strict_numerics {
            if let Some(issue) = found.into_iter().next() {
                return Err(ArborError::degenerate(issue));
            }
            return Ok(());
        }

        for issue in found {
            log::warn!("numeric degeneracy tolerated: {issue}");
            issues.push(issue);
        }
        Ok(())
    }
}

/// Backward induction from level `steps - 1` to the root.
///
/// Continuation is the discounted expectation over the two children; the
/// node value is the continuation, or for American contracts the larger of
/// the continuation and immediate exercise.
fn roll_back(
    model: &LatticeModel,
    style: ExerciseStyle,
    evaluator: &PayoffEvaluator,
    prices: &NodeTree,
    values: &mut NodeTree,
    continuation: &mut NodeTree,
) -> ArborResult<()> {
    for i in (0..model.steps()).rev() {
        let discount = model.discount_factor(i).ok_or_else(|| {
            ArborError::configuration(format!("no discount factor for step {i}"))
        })?;
        let branches = &model.branches()[i];

        for (k, branch) in branches.iter().enumerate() {
            let up = values.get(i + 1, NodeTree::up_child(k));
            let down = values.get(i + 1, NodeTree::down_child(k));
            let held = discount * (branch.up_prob * up + branch.down_prob * down);

            let value = if style.allows_early_exercise() {
                held.max(evaluator.exercise_value(prices.get(i, k)))
            } else {
                held
            };

            continuation.set(i, k, held);
            values.set(i, k, value);
        }
    }
    Ok(())
}

fn first_non_finite(tree: &NodeTree) -> Option<NumericIssue> {
    tree.levels().iter().enumerate().find_map(|(i, level)| {
        level
            .iter()
            .position(|v| !v.is_finite())
            .map(|k| NumericIssue::new(i, k, IssueKind::NonFinite))
    })
}

/// Result of valuing a contract once.
///
/// Holds the price tree, the value tree (`steps + 1` levels), the
/// continuation tree and the delta tree (`steps` levels each), and any
/// numeric issues tolerated along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    style: ExerciseStyle,
    dt: f64,
    prices: NodeTree,
    values: NodeTree,
    continuation: NodeTree,
    delta: NodeTree,
    issues: Vec<NumericIssue>,
}

impl Valuation {
    /// Contract value at the root.
    pub fn price(&self) -> f64 {
        self.values.root()
    }

    /// Exercise style the contract was valued under.
    pub fn style(&self) -> ExerciseStyle {
        self.style
    }

    /// Time step used.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Underlying price at every node.
    pub fn price_tree(&self) -> &NodeTree {
        &self.prices
    }

    /// Contract value at every node.
    pub fn value_tree(&self) -> &NodeTree {
        &self.values
    }

    /// Discounted holding value at every parent node.
    pub fn continuation_tree(&self) -> &NodeTree {
        &self.continuation
    }

    /// Delta at every parent node.
    pub fn delta(&self) -> &NodeTree {
        &self.delta
    }

    /// Theta at every parent node.
    pub fn theta(&self) -> ArborResult<NodeTree> {
        theta_tree(&self.values, &self.continuation, self.dt)
    }

    /// Numeric issues tolerated in lenient mode. Always empty in strict mode.
    pub fn issues(&self) -> &[NumericIssue] {
        &self.issues
    }

    /// Returns true if no numeric issue was found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
