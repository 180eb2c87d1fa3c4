//! Finite-difference sensitivities read off a valued tree.
//!
//! Both trees cover the parent levels `0..steps`, one entry per node.

use arbor_core::{ArborResult, IssueKind, NumericIssue};
use arbor_lattice::NodeTree;

/// Delta at every parent node: the slope of value against price across
/// the node's two children.
///
/// ```text
/// Δ(i,k) = (V(i+1,2k) - V(i+1,2k+1)) / (S(i+1,2k) - S(i+1,2k+1))
/// ```
///
/// Nodes whose children share a price are reported as
/// [`IssueKind::ZeroPriceSpread`]; any other non-finite delta (overflowed
/// child prices give `inf - inf`) is reported as [`IssueKind::NonFinite`].
/// Flagged entries hold the raw quotient.
pub fn delta_tree(
    prices: &NodeTree,
    values: &NodeTree,
) -> ArborResult<(NodeTree, Vec<NumericIssue>)> {
    let parents = prices.depth();
    let mut issues = Vec::new();

    let levels: Vec<Vec<f64>> = (0..parents)
        .map(|i| {
            let child_prices = prices.level(i + 1);
            let child_values = values.level(i + 1);

            (0..prices.level(i).len())
                .map(|k| {
                    let (up, down) = (NodeTree::up_child(k), NodeTree::down_child(k));
                    let spread = child_prices[up] - child_prices[down];
                    let delta = (child_values[up] - child_values[down]) / spread;
                    if spread == 0.0 {
                        issues.push(NumericIssue::new(i, k, IssueKind::ZeroPriceSpread));
                    } else if !delta.is_finite() {
                        issues.push(NumericIssue::new(i, k, IssueKind::NonFinite));
                    }
                    delta
                })
                .collect()
        })
        .collect();

    Ok((NodeTree::from_levels(levels)?, issues))
}

/// Theta at every parent node: the gap between holding and the node's
/// realized value, per unit time.
///
/// ```text
/// Θ(i,k) = (C(i,k) - V(i,k)) / dt
/// ```
///
/// Zero wherever the node is held, so identically zero for contracts
/// without early exercise.
pub fn theta_tree(values: &NodeTree, continuation: &NodeTree, dt: f64) -> ArborResult<NodeTree> {
    let levels: Vec<Vec<f64>> = continuation
        .levels()
        .iter()
        .enumerate()
        .map(|(i, held)| {
            held.iter()
                .zip(values.level(i))
                .map(|(c, v)| (c - v) / dt)
                .collect()
        })
        .collect();

    NodeTree::from_levels(levels)
}
