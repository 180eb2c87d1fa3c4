//! # Arbor Pricing
//!
//! Binomial valuation of European, American and averaging (Asian) options.
//!
//! This crate provides:
//!
//! - **Contracts**: [`OptionContract`] with a closed [`ContractKind`] variant
//! - **Payoffs**: [`PayoffEvaluator`] for terminal and path-average payoffs
//! - **Engine**: [`PricingEngine`] backward induction, producing a
//!   [`Valuation`] with price, delta and theta
//! - **Reports**: [`PricingReport`] and the transposed [`render_tree`] format
//! - **Market data**: the [`MarketDataSource`] seam and a volatility estimator
//!
//! ## Example
//!
//! ```rust
//! use arbor_core::OptionSide;
//! use arbor_lattice::LatticeModel;
//! use arbor_pricing::prelude::*;
//!
//! let model = LatticeModel::flat_template(3, 0.05, 0.2).unwrap();
//! let put = OptionContract::new(100.0, 100.0, 1.0, OptionSide::Put, ContractKind::American)
//!     .unwrap()
//!     .with_model(&model)
//!     .unwrap();
//!
//! let valuation = PricingEngine::default().valuate(&put).unwrap();
//! assert!(valuation.price() > 0.0);
//! assert_eq!(valuation.delta().depth(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod contract;
pub mod engine;
pub mod greeks;
pub mod market;
pub mod payoff;
pub mod report;

pub use contract::{ContractKind, OptionContract};
pub use engine::{PricingEngine, Valuation};
pub use market::{annualized_volatility, MarketDataSource, StaticMarketData, TRADING_DAYS};
pub use payoff::PayoffEvaluator;
pub use report::{indent_linebreaks, render_tree, PricingReport};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::contract::{ContractKind, OptionContract};
    pub use crate::engine::{PricingEngine, Valuation};
    pub use crate::market::{MarketDataSource, StaticMarketData};
    pub use crate::payoff::PayoffEvaluator;
    pub use crate::report::PricingReport;
}
