//! Arbor Configuration Layer
//!
//! TOML configuration for the Arbor pricing engine and its command line.
//!
//! # Sections
//!
//! - **Engine**: step ceiling, strict or lenient numeric policy, probability tolerance
//! - **Model**: default steps, rate and volatility used when none are supplied
//! - **Report**: decimal precision for text output
//!
//! # Example
//!
//! ```rust
//! use arbor_config::{ArborConfig, Validate};
//!
//! let config = ArborConfig::from_toml_str("[engine]\nstrict_numerics = false\n").unwrap();
//! assert!(!config.engine.strict_numerics);
//! assert!(config.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod error;
mod settings;

pub use config::ArborConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use settings::{EngineConfig, ModelDefaults, ReportConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::ArborConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::settings::{EngineConfig, ModelDefaults, ReportConfig};
}
