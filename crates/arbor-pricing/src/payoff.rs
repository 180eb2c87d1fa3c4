//! Payoff evaluation.
//!
//! Two conventions exist:
//!
//! - **Terminal**: pays on a single price, `max(φ(S - K), 0)`.
//! - **Path average**: pays on the mean of the root-to-leaf price path,
//!   against the strike (fixed) or against the terminal price (floating).

use arbor_core::{OptionSide, PayoffStyle};
use arbor_lattice::NodeTree;

use crate::contract::{ContractKind, OptionContract};

/// Payoff rule for a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayoffEvaluator {
    /// Vanilla payoff on a single price.
    Terminal {
        /// Call or put.
        side: OptionSide,
        /// Strike price.
        strike: f64,
    },
    /// Payoff on the average price along a path.
    PathAverage {
        /// Call or put.
        side: OptionSide,
        /// Strike price, used by fixed-strike payoffs only.
        strike: f64,
        /// Fixed or floating strike.
        style: PayoffStyle,
    },
}

impl PayoffEvaluator {
    /// Selects the payoff rule for a contract's exercise style.
    pub fn for_contract(contract: &OptionContract) -> Self {
        let side = contract.side();
        let strike = contract.strike();
        match contract.kind() {
            ContractKind::European | ContractKind::American => Self::Terminal { side, strike },
            ContractKind::Averaging { payoff } => Self::PathAverage {
                side,
                strike,
                style: payoff,
            },
        }
    }

    /// Vanilla payoff of exercising at `price`.
    ///
    /// Used for early exercise regardless of the path convention.
    pub fn exercise_value(&self, price: f64) -> f64 {
        match *self {
            Self::Terminal { side, strike } | Self::PathAverage { side, strike, .. } => {
                side.intrinsic(price, strike)
            }
        }
    }

    /// Payoff of a path with the given mean that ends at `terminal`.
    ///
    /// For terminal payoffs the mean is ignored.
    pub fn path_value(&self, mean: f64, terminal: f64) -> f64 {
        match *self {
            Self::Terminal { side, strike } => side.intrinsic(terminal, strike),
            Self::PathAverage {
                side,
                strike,
                style: PayoffStyle::Fixed,
            } => side.intrinsic(mean, strike),
            Self::PathAverage {
                side,
                style: PayoffStyle::Floating,
                ..
            } => side.intrinsic(terminal, mean),
        }
    }

    /// Payoffs at every terminal node of `prices`, in node order.
    pub fn terminal_values(&self, prices: &NodeTree) -> Vec<f64> {
        match self {
            Self::Terminal { .. } => prices
                .terminal()
                .iter()
                .map(|&price| self.exercise_value(price))
                .collect(),
            Self::PathAverage { .. } => self.path_average_values(prices),
        }
    }

    /// Walks every root-to-leaf path depth first, carrying a running sum of
    /// prices instead of the path itself.
    fn path_average_values(&self, prices: &NodeTree) -> Vec<f64> {
        let depth = prices.depth();
        let path_len = (depth + 1) as f64;
        let mut values = vec![0.0; prices.terminal().len()];

        // (level, node, sum of prices from the root through this node)
        let mut stack = Vec::with_capacity(depth + 2);
        stack.push((0usize, 0usize, prices.root()));

        while let Some((level, node, sum)) = stack.pop() {
            if level == depth {
                values[node] = self.path_value(sum / path_len, prices.get(level, node));
                continue;
            }

            let next = level + 1;
            let down = NodeTree::down_child(node);
            let up = NodeTree::up_child(node);
            stack.push((next, down, sum + prices.get(next, down)));
            stack.push((next, up, sum + prices.get(next, up)));
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_step_prices() -> NodeTree {
        NodeTree::from_levels(vec![
            vec![100.0],
            vec![120.0, 80.0],
            vec![150.0, 90.0, 100.0, 60.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_terminal_payoffs() {
        let call = PayoffEvaluator::Terminal {
            side: OptionSide::Call,
            strike: 100.0,
        };
        assert_eq!(call.terminal_values(&two_step_prices()), vec![50.0, 0.0, 0.0, 0.0]);

        let put = PayoffEvaluator::Terminal {
            side: OptionSide::Put,
            strike: 100.0,
        };
        assert_eq!(put.terminal_values(&two_step_prices()), vec![0.0, 10.0, 0.0, 40.0]);
    }

    #[test]
    fn test_fixed_average() {
        let call = PayoffEvaluator::PathAverage {
            side: OptionSide::Call,
            strike: 100.0,
            style: PayoffStyle::Fixed,
        };
        let values = call.terminal_values(&two_step_prices());

        // Paths: 100-120-150, 100-120-90, 100-80-100, 100-80-60
        assert_relative_eq!(values[0], 370.0 / 3.0 - 100.0);
        assert_relative_eq!(values[1], 310.0 / 3.0 - 100.0);
        assert_eq!(values[2], 0.0);
        assert_eq!(values[3], 0.0);
    }

    #[test]
    fn test_floating_average() {
        let put = PayoffEvaluator::PathAverage {
            side: OptionSide::Put,
            strike: 0.0,
            style: PayoffStyle::Floating,
        };
        let values = put.terminal_values(&two_step_prices());

        assert_eq!(values[0], 0.0);
        assert_relative_eq!(values[1], 310.0 / 3.0 - 90.0);
        assert_eq!(values[2], 0.0);
        assert_relative_eq!(values[3], 80.0 - 60.0);
    }

    #[test]
    fn test_single_level_path() {
        let prices = NodeTree::from_levels(vec![vec![100.0]]).unwrap();
        let call = PayoffEvaluator::PathAverage {
            side: OptionSide::Call,
            strike: 90.0,
            style: PayoffStyle::Fixed,
        };
        assert_eq!(call.terminal_values(&prices), vec![10.0]);
    }

    #[test]
    fn test_exercise_value_ignores_averaging() {
        let call = PayoffEvaluator::PathAverage {
            side: OptionSide::Call,
            strike: 100.0,
            style: PayoffStyle::Floating,
        };
        assert_eq!(call.exercise_value(130.0), 30.0);
    }
}
