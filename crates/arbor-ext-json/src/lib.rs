//! # Arbor Ext JSON
//!
//! JSON persistence for lattice models and option contracts.
//!
//! - Models: `{ "steps", "dt", "rates", "volatilities" }`, with `dt = -1`
//!   marking an unbound template. Branches are rebuilt on load.
//! - Contracts: `{ "underlying", "currency", "spot", "strike", "expiration",
//!   "type", "side", "payoff_type" }`, with `payoff_type` for Asian only.
//! - Trees: factor and price trees plus the strike, for plotting.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod codec;
mod records;
mod store;

pub use codec::JsonCodec;
pub use records::{ContractRecord, TreeExport};
pub use store::{
    list_json_files, load_contract_file, load_model_file, save_contract_file, save_model_file,
    JsonStore,
};
