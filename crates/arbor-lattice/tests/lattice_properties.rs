//! Property-based tests for lattice invariants.
//!
//! - Rebuilding from the same inputs yields bit-identical branches
//! - Export followed by import reproduces the model exactly
//! - Up probabilities sit in [0, 1] whenever the no-arbitrage band holds

use arbor_lattice::{LatticeModel, NodeTree};
use proptest::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

fn step_inputs() -> impl Strategy<Value = (usize, Vec<f64>, Vec<f64>, f64)> {
    (1usize..=8).prop_flat_map(|steps| {
        (
            Just(steps),
            prop::collection::vec(-0.02f64..0.15, steps),
            prop::collection::vec(0.01f64..1.0, steps),
            0.01f64..2.0,
        )
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn build_is_deterministic((steps, rates, vols, dt) in step_inputs()) {
        let a = LatticeModel::build(steps, rates.clone(), vols.clone(), dt).unwrap();
        let b = LatticeModel::build(steps, rates, vols, dt).unwrap();
        prop_assert_eq!(a.branches(), b.branches());
    }

    #[test]
    fn snapshot_roundtrip_is_exact((steps, rates, vols, dt) in step_inputs()) {
        let model = LatticeModel::build(steps, rates, vols, dt).unwrap();

        let json = serde_json::to_string(&model.snapshot()).unwrap();
        let restored: LatticeModel = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(restored.dt(), model.dt());
        for (a, b) in restored.branches().iter().flatten().zip(model.branches().iter().flatten()) {
            prop_assert_eq!(a.up_prob.to_bits(), b.up_prob.to_bits());
            prop_assert_eq!(a.up_factor.to_bits(), b.up_factor.to_bits());
            prop_assert_eq!(a.down_factor.to_bits(), b.down_factor.to_bits());
        }
    }

    #[test]
    fn probabilities_in_unit_interval_when_arbitrage_free(
        (steps, rates, vols, dt) in step_inputs()
    ) {
        let model = LatticeModel::build(steps, rates.clone(), vols, dt).unwrap();

        for (step, level) in model.branches().iter().enumerate() {
            let branch = level[0];
            let growth = (rates[step] * dt).exp();
            if branch.down_factor < growth && growth < branch.up_factor {
                prop_assert!((0.0..=1.0).contains(&branch.up_prob));
                prop_assert!(branch.is_arbitrage_free(0.0));
            }
        }
    }

    #[test]
    fn price_tree_shape((steps, rates, vols, dt) in step_inputs(), spot in 1.0f64..500.0) {
        let model = LatticeModel::build(steps, rates, vols, dt).unwrap();
        let tree = NodeTree::expand(spot, &model).unwrap();

        prop_assert_eq!(tree.depth(), steps);
        for (i, level) in tree.levels().iter().enumerate() {
            prop_assert_eq!(level.len(), 1usize << i);
            prop_assert!(level.iter().all(|p| *p > 0.0));
        }
    }
}

#[test]
fn zero_steps_never_builds() {
    let err = LatticeModel::build(0, Vec::new(), Vec::new(), 1.0).unwrap_err();
    assert!(err.is_configuration());
}
