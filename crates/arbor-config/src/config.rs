//! Top-level configuration and TOML loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::settings::{EngineConfig, ModelDefaults, ReportConfig};

/// Complete Arbor configuration, one table per section.
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```toml
/// [engine]
/// max_steps = 20
/// strict_numerics = true
///
/// [model]
/// steps = 3
/// rate = 0.05
/// volatility = 0.2
///
/// [report]
/// precision = 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArborConfig {
    /// Engine limits and numeric policy.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Fallback model assumptions.
    #[serde(default)]
    pub model: ModelDefaults,

    /// Report formatting.
    #[serde(default)]
    pub report: ReportConfig,
}

impl ArborConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        log::debug!("loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads from `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Validate for ArborConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.engine.validate();
        errors.extend(self.model.validate());
        errors.extend(self.report.validate());

        if self.model.steps > self.engine.max_steps {
            errors.push(ValidationError::with_rule(
                "model.steps",
                format!(
                    "Default steps ({}) exceed engine.max_steps ({})",
                    self.model.steps, self.engine.max_steps
                ),
                "steps_within_limit",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_is_default() {
        let config = ArborConfig::from_toml_str("").unwrap();
        assert_eq!(config, ArborConfig::default());
        assert_eq!(config.engine.max_steps, 20);
        assert!(config.engine.strict_numerics);
        assert_eq!(config.model.steps, 3);
        assert_eq!(config.report.precision, 3);
    }

    #[test]
    fn test_partial_sections() {
        let config = ArborConfig::from_toml_str(
            r#"
            [engine]
            strict_numerics = false

            [model]
            volatility = 0.35
            "#,
        )
        .unwrap();

        assert!(!config.engine.strict_numerics);
        assert_eq!(config.engine.max_steps, 20);
        assert_eq!(config.model.volatility, 0.35);
        assert_eq!(config.model.rate, 0.05);
    }

    #[test]
    fn test_invalid_rejected() {
        let err = ArborConfig::from_toml_str("[engine]\nmax_steps = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));

        let err = ArborConfig::from_toml_str("[model]\nsteps = 0\nvolatility = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::MultipleValidationErrors(_)));
    }

    #[test]
    fn test_steps_above_engine_limit() {
        let err =
            ArborConfig::from_toml_str("[engine]\nmax_steps = 4\n[model]\nsteps = 6\n").unwrap_err();
        assert!(err.to_string().contains("engine.max_steps"));
    }

    #[test]
    fn test_parse_error() {
        let err = ArborConfig::from_toml_str("[engine\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nprecision = 5").unwrap();

        let config = ArborConfig::load(file.path()).unwrap();
        assert_eq!(config.report.precision, 5);

        let config = ArborConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.report.precision, 5);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArborConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert_eq!(ArborConfig::load_or_default(None).unwrap(), ArborConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ArborConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ArborConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_into_arbor_error() {
        let err: arbor_core::ArborError = ConfigError::NotFound {
            path: "x.toml".into(),
        }
        .into();
        assert!(err.is_configuration());
    }
}
