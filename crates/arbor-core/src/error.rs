//! Error types for the Arbor library.
//!
//! Errors fall into three families:
//!
//! - **Configuration**: invalid step counts, mismatched rate/volatility vectors,
//!   unbound models. Detected before any tree is built.
//! - **Numeric degeneracy**: risk-neutral probabilities outside `[0, 1]` or a
//!   zero price spread under a delta calculation. Detected per pricing call.
//! - **Serialization**: malformed or incomplete persisted models and contracts.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for Arbor operations.
pub type ArborResult<T> = Result<T, ArborError>;

/// The main error type for Arbor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArborError {
    /// Invalid model or contract configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Description of what's invalid.
        reason: String,
    },

    /// The lattice produced numbers that cannot be priced with.
    #[error("Numeric degeneracy: {issue}")]
    NumericDegeneracy {
        /// The first offending node.
        issue: NumericIssue,
    },

    /// Persisted data was missing fields or had the wrong shape.
    #[error("Serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Operation is exposed but has no implementation.
    #[error("Not implemented: {feature}")]
    NotImplemented {
        /// Name of the missing feature.
        feature: String,
    },

    /// File system error raised by a persistence adapter.
    #[error("IO error: {reason}")]
    Io {
        /// Description of the failure.
        reason: String,
    },
}

impl ArborError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a numeric degeneracy error for the given issue.
    #[must_use]
    pub fn degenerate(issue: NumericIssue) -> Self {
        Self::NumericDegeneracy { issue }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Creates a not-implemented error.
    #[must_use]
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns true for numeric degeneracy errors.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::NumericDegeneracy { .. })
    }
}

impl From<serde_json::Error> for ArborError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for ArborError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

/// What went wrong at a degenerate node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IssueKind {
    /// `downFactor < e^(r*dt) < upFactor` does not hold, so the up
    /// probability left `[0, 1]`.
    ProbabilityOutOfRange {
        /// The offending up probability.
        up_prob: f64,
    },

    /// Up and down child prices coincide (zero volatility step).
    ZeroPriceSpread,

    /// A node value came out NaN or infinite.
    NonFinite,
}

/// Location and nature of a numeric problem in a lattice.
///
/// Attached to valuations as an annotation, or carried by
/// [`ArborError::NumericDegeneracy`] when numerics are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericIssue {
    /// Tree level (time step) of the node.
    pub level: usize,
    /// Node index within the level.
    pub node: usize,
    /// What went wrong.
    pub kind: IssueKind,
}

impl NumericIssue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(level: usize, node: usize, kind: IssueKind) -> Self {
        Self { level, node, kind }
    }
}

impl fmt::Display for NumericIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::ProbabilityOutOfRange { up_prob } => write!(
                f,
                "risk-neutral probability {up_prob} outside [0, 1] at step {}",
                self.level
            ),
            IssueKind::ZeroPriceSpread => write!(
                f,
                "up and down prices coincide below node ({}, {})",
                self.level, self.node
            ),
            IssueKind::NonFinite => write!(
                f,
                "non-finite value at node ({}, {})",
                self.level, self.node
            ),
        }
    }
}
