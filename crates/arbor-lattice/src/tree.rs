//! Full binary node trees.
//!
//! Provides the non-recombining tree used for prices, values and Greeks.
//!
//! # Structure
//!
//! Level `i` holds `2^i` nodes. Node `k` at level `i` has its up child at
//! `2k` and its down child at `2k + 1` on level `i + 1`:
//!
//! ```text
//!                  [0,0]
//!                 /     \
//!            [1,0]       [1,1]
//!           /    \      /    \
//!       [2,0]  [2,1]  [2,2]  [2,3]
//! ```
//!
//! Up-then-down and down-then-up paths land on distinct nodes even when the
//! prices agree, so every root-to-leaf path is addressable on its own. The
//! cost is `O(2^steps)` time and memory.

use serde::{Deserialize, Serialize};

use arbor_core::{ArborError, ArborResult};

use crate::model::LatticeModel;

/// A full binary tree of `f64` node values stored level by level.
///
/// Serializes as its nested levels; deserializing applies the same shape
/// check as [`NodeTree::from_levels`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct NodeTree {
    levels: Vec<Vec<f64>>,
}

impl NodeTree {
    /// Expands `spot` into a price tree using the model's branch factors.
    ///
    /// `tree[i + 1][2k] = tree[i][k] * u` and
    /// `tree[i + 1][2k + 1] = tree[i][k] * d`.
    pub fn expand(spot: f64, model: &LatticeModel) -> ArborResult<Self> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(ArborError::configuration(format!(
                "spot must be positive, got {spot}"
            )));
        }
        model.time_step()?;

        let mut levels: Vec<Vec<f64>> = Vec::with_capacity(model.steps() + 1);
        levels.push(vec![spot]);

        for branches in model.branches() {
            let parents = levels.last().map_or(&[][..], Vec::as_slice);
            let mut children = Vec::with_capacity(parents.len() * 2);
            for (price, branch) in parents.iter().zip(branches) {
                children.push(price * branch.up_factor);
                children.push(price * branch.down_factor);
            }
            levels.push(children);
        }

        log::debug!(
            "expanded price tree: depth={}, leaves={}",
            model.steps(),
            levels.last().map_or(0, Vec::len)
        );

        Ok(Self { levels })
    }

    /// Wraps pre-computed levels, checking the `2^i` shape.
    pub fn from_levels(levels: Vec<Vec<f64>>) -> ArborResult<Self> {
        if levels.is_empty() {
            return Err(ArborError::configuration("tree must have at least one level"));
        }
        for (i, level) in levels.iter().enumerate() {
            if level.len() != LatticeModel::node_count(i) {
                return Err(ArborError::configuration(format!(
                    "level {i} has {} nodes, expected {}",
                    level.len(),
                    LatticeModel::node_count(i)
                )));
            }
        }
        Ok(Self { levels })
    }

    /// Builds a tree of `depth + 1` levels with every node set to `value`.
    #[must_use]
    pub fn filled(depth: usize, value: f64) -> Self {
        Self {
            levels: (0..=depth)
                .map(|i| vec![value; LatticeModel::node_count(i)])
                .collect(),
        }
    }

    /// Index of the up child of `node`.
    pub fn up_child(node: usize) -> usize {
        2 * node
    }

    /// Index of the down child of `node`.
    pub fn down_child(node: usize) -> usize {
        2 * node + 1
    }

    /// Index of the last level (the step count for a price tree).
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// All levels, root first.
    pub fn levels(&self) -> &[Vec<f64>] {
        &self.levels
    }

    /// Nodes at level `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i > depth`.
    pub fn level(&self, i: usize) -> &[f64] {
        &self.levels[i]
    }

    /// Value at node `k` of level `i`.
    ///
    /// # Panics
    ///
    /// Panics if the node does not exist.
    pub fn get(&self, i: usize, k: usize) -> f64 {
        self.levels[i][k]
    }

    /// Sets the value at node `k` of level `i`.
    ///
    /// # Panics
    ///
    /// Panics if the node does not exist.
    pub fn set(&mut self, i: usize, k: usize, value: f64) {
        self.levels[i][k] = value;
    }

    /// Mutable access to level `i`.
    pub fn level_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.levels[i]
    }

    /// Root value.
    pub fn root(&self) -> f64 {
        self.levels[0][0]
    }

    /// Deepest level.
    pub fn terminal(&self) -> &[f64] {
        &self.levels[self.depth()]
    }

    /// Total node count across all levels.
    pub fn node_total(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Consumes the tree, returning its levels.
    pub fn into_levels(self) -> Vec<Vec<f64>> {
        self.levels
    }
}

impl TryFrom<Vec<Vec<f64>>> for NodeTree {
    type Error = ArborError;

    fn try_from(levels: Vec<Vec<f64>>) -> ArborResult<Self> {
        Self::from_levels(levels)
    }
}

impl From<NodeTree> for Vec<Vec<f64>> {
    fn from(tree: NodeTree) -> Self {
        tree.into_levels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expand_single_step() {
        let model = LatticeModel::flat(1, 1.0, 0.05, 0.2).unwrap();
        let tree = NodeTree::expand(100.0, &model).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_relative_eq!(tree.root(), 100.0);
        assert_relative_eq!(tree.get(1, 0), 122.140_275_8, epsilon = 1e-6);
        assert_relative_eq!(tree.get(1, 1), 81.873_075_3, epsilon = 1e-6);
    }

    #[test]
    fn test_no_recombination() {
        let model = LatticeModel::flat(3, 1.0, 0.05, 0.2).unwrap();
        let tree = NodeTree::expand(50.0, &model).unwrap();

        assert_eq!(tree.level(3).len(), 8);
        assert_eq!(tree.node_total(), 15);
        // up-down (node 1) and down-up (node 2) are separate nodes with equal prices
        assert_relative_eq!(tree.get(2, 1), tree.get(2, 2), epsilon = 1e-12);
        assert_relative_eq!(tree.get(2, 1), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_child_relation() {
        let model = LatticeModel::new(2, 1.0, vec![0.01, 0.02], vec![0.1, 0.4]).unwrap();
        let tree = NodeTree::expand(10.0, &model).unwrap();

        for k in 0..2 {
            let branch = model.branch(1, k).unwrap();
            let parent = tree.get(1, k);
            assert_relative_eq!(tree.get(2, NodeTree::up_child(k)), parent * branch.up_factor);
            assert_relative_eq!(tree.get(2, NodeTree::down_child(k)), parent * branch.down_factor);
        }
    }

    #[test]
    fn test_expand_rejects_bad_inputs() {
        let model = LatticeModel::flat(2, 1.0, 0.05, 0.2).unwrap();
        assert!(NodeTree::expand(0.0, &model).is_err());
        assert!(NodeTree::expand(f64::NAN, &model).is_err());

        let template = LatticeModel::flat_template(2, 0.05, 0.2).unwrap();
        assert!(NodeTree::expand(100.0, &template)
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_from_levels_shape() {
        assert!(NodeTree::from_levels(vec![vec![1.0], vec![2.0, 3.0]]).is_ok());
        assert!(NodeTree::from_levels(vec![vec![1.0], vec![2.0]]).is_err());
        assert!(NodeTree::from_levels(Vec::new()).is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        assert!(serde_json::from_str::<NodeTree>("[]").is_err());
        assert!(serde_json::from_str::<NodeTree>("[[1.0],[2.0]]").is_err());

        let tree: NodeTree = serde_json::from_str("[[1.0],[2.0,3.0]]").unwrap();
        assert_eq!(tree.depth(), 1);
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[[1.0],[2.0,3.0]]");
    }

    #[test]
    fn test_filled() {
        let tree = NodeTree::filled(2, 0.0);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.terminal(), &[0.0; 4]);
    }
}
