//! # Arbor Lattice
//!
//! Cox-Ross-Rubinstein lattice models and full binary price trees.
//!
//! This crate provides:
//!
//! - **[`LatticeModel`]**: per-step rates and volatilities, bound or unbound,
//!   with the per-node [`Branch`] parameters derived from them
//! - **[`NodeTree`]**: the non-recombining tree used for prices and values
//! - **[`ModelSnapshot`]**: the persisted form of a model
//!
//! ## Example
//!
//! ```rust
//! use arbor_lattice::{LatticeModel, NodeTree};
//!
//! // Reusable assumptions, not yet tied to a contract
//! let template = LatticeModel::flat_template(3, 0.05, 0.2).unwrap();
//!
//! // Bind to a one-year contract and grow the price tree
//! let model = template.bind(1.0).unwrap();
//! let prices = NodeTree::expand(100.0, &model).unwrap();
//! assert_eq!(prices.terminal().len(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod inputs;
pub mod model;
pub mod tree;

pub use inputs::parse_step_values;
pub use model::{Branch, LatticeModel, ModelSnapshot, MAX_STEPS, UNBOUND_DT};
pub use tree::NodeTree;
