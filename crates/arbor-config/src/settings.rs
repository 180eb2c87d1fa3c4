//! Configuration sections.

use serde::{Deserialize, Serialize};

use arbor_lattice::MAX_STEPS;

use crate::error::{Validate, ValidationError};

// =============================================================================
// ENGINE
// =============================================================================

/// Pricing engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest step count the engine accepts.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Fail on numeric degeneracy instead of annotating the valuation.
    #[serde(default = "default_strict_numerics")]
    pub strict_numerics: bool,

    /// Slack allowed around `[0, 1]` for risk-neutral probabilities.
    #[serde(default = "default_probability_tolerance")]
    pub probability_tolerance: f64,
}

fn default_max_steps() -> usize {
    20
}

fn default_strict_numerics() -> bool {
    true
}

fn default_probability_tolerance() -> f64 {
    1e-12
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            strict_numerics: default_strict_numerics(),
            probability_tolerance: default_probability_tolerance(),
        }
    }
}

impl EngineConfig {
    /// Returns a copy that annotates numeric problems instead of failing.
    pub fn lenient(mut self) -> Self {
        self.strict_numerics = false;
        self
    }

    /// Returns a copy with a different step ceiling.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.max_steps == 0 || self.max_steps > MAX_STEPS {
            errors.push(ValidationError::with_rule(
                "engine.max_steps",
                format!("Max steps must be between 1 and {MAX_STEPS}"),
                "valid_max_steps",
            ));
        }

        if !(self.probability_tolerance.is_finite() && self.probability_tolerance >= 0.0) {
            errors.push(ValidationError::with_rule(
                "engine.probability_tolerance",
                "Probability tolerance must be a non-negative number",
                "valid_tolerance",
            ));
        }

        errors
    }
}

// =============================================================================
// MODEL DEFAULTS
// =============================================================================

/// Model assumptions used when none are supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefaults {
    /// Number of tree steps.
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Annualized risk-free rate applied to every step.
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Annualized volatility applied to every step.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

fn default_steps() -> usize {
    3
}

fn default_rate() -> f64 {
    0.05
}

fn default_volatility() -> f64 {
    0.2
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            rate: default_rate(),
            volatility: default_volatility(),
        }
    }
}

impl Validate for ModelDefaults {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.steps == 0 || self.steps > MAX_STEPS {
            errors.push(ValidationError::with_rule(
                "model.steps",
                format!("Steps must be between 1 and {MAX_STEPS}"),
                "valid_steps",
            ));
        }

        if !self.rate.is_finite() {
            errors.push(ValidationError::new("model.rate", "Rate must be finite"));
        }

        if !(self.volatility.is_finite() && self.volatility > 0.0) {
            errors.push(ValidationError::with_rule(
                "model.volatility",
                "Volatility must be positive",
                "positive_volatility",
            ));
        }

        errors
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Text report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Decimal places for prices and tree nodes.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    3
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.precision > 12 {
            errors.push(ValidationError::with_rule(
                "report.precision",
                "Precision cannot exceed 12",
                "max_precision",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().is_valid());
        assert!(ModelDefaults::default().is_valid());
        assert!(ReportConfig::default().is_valid());
    }

    #[test]
    fn test_engine_limits() {
        let config = EngineConfig::default().with_max_steps(MAX_STEPS + 1);
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "engine.max_steps");

        let config = EngineConfig {
            probability_tolerance: -1.0,
            ..EngineConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_lenient() {
        let config = EngineConfig::default().lenient();
        assert!(!config.strict_numerics);
    }

    #[test]
    fn test_model_defaults_validation() {
        let defaults = ModelDefaults {
            steps: 0,
            rate: f64::NAN,
            volatility: 0.0,
        };
        assert_eq!(defaults.validate().len(), 3);
    }
}
