//! Exercise and payoff styles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArborError;

/// When and how a contract pays out.
///
/// Persisted under the names `"European"`, `"American"` and `"Asian"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExerciseStyle {
    /// Exercisable only at expiration.
    #[default]
    European,
    /// Exercisable at any node up to expiration.
    American,
    /// Pays on the average price along the realized path.
    #[serde(rename = "Asian")]
    Averaging,
}

impl ExerciseStyle {
    /// Returns the canonical name used in persisted contracts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseStyle::European => "European",
            ExerciseStyle::American => "American",
            ExerciseStyle::Averaging => "Asian",
        }
    }

    /// Returns true if the holder may exercise before expiration.
    #[must_use]
    pub fn allows_early_exercise(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }

    /// Returns true if the payoff depends on the full price path.
    #[must_use]
    pub fn is_path_dependent(&self) -> bool {
        matches!(self, ExerciseStyle::Averaging)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExerciseStyle {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "european" => Ok(ExerciseStyle::European),
            "american" => Ok(ExerciseStyle::American),
            "asian" | "averaging" => Ok(ExerciseStyle::Averaging),
            _ => Err(ArborError::serialization(format!(
                "unknown exercise style '{s}'"
            ))),
        }
    }
}

/// Strike convention for averaging contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PayoffStyle {
    /// Path average compared against the contract strike.
    #[default]
    Fixed,
    /// Terminal price compared against the path average.
    Floating,
}

impl PayoffStyle {
    /// Returns the canonical name used in persisted contracts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoffStyle::Fixed => "Fixed",
            PayoffStyle::Floating => "Floating",
        }
    }
}

impl fmt::Display for PayoffStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayoffStyle {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(PayoffStyle::Fixed),
            "floating" => Ok(PayoffStyle::Floating),
            _ => Err(ArborError::serialization(format!(
                "unknown payoff style '{s}'"
            ))),
        }
    }
}
