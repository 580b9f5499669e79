//! Configuration module for the strategy margin engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for margin rates, order sizing limits and logging.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strategy_margin::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("margin buffer: {}", config.margin.margin_buffer);
//! ```

mod margin;
mod observability;
mod sizing;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use margin::MarginConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use sizing::SizingConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Margin rates and buffer.
    #[serde(default)]
    pub margin: MarginConfig,
    /// Order quantity search limits.
    #[serde(default)]
    pub sizing: SizingConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn check_fraction(name: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be between 0.0 and 1.0"
        )));
    }
    Ok(())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let margin = &config.margin;
    check_fraction("margin.equity_initial_rate", margin.equity_initial_rate)?;
    check_fraction("margin.equity_maintenance_rate", margin.equity_maintenance_rate)?;
    check_fraction(
        "margin.naked_option_underlying_rate",
        margin.naked_option_underlying_rate,
    )?;
    check_fraction(
        "margin.naked_option_minimum_rate",
        margin.naked_option_minimum_rate,
    )?;
    check_fraction("sizing.min_order_margin_pct", config.sizing.min_order_margin_pct)?;

    if margin.equity_maintenance_rate > margin.equity_initial_rate {
        return Err(ConfigError::ValidationError(
            "margin.equity_maintenance_rate must not exceed equity_initial_rate".to_string(),
        ));
    }

    if margin.margin_buffer <= Decimal::ZERO || margin.margin_buffer > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "margin.margin_buffer must be in (0.0, 1.0]".to_string(),
        ));
    }

    if margin.covered_minimum_per_lot < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "margin.covered_minimum_per_lot must not be negative".to_string(),
        ));
    }

    if config.sizing.max_search_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "sizing.max_search_iterations must be positive".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty", "compact"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.margin.equity_initial_rate, dec!(0.5));
        assert_eq!(config.margin.equity_maintenance_rate, dec!(0.25));
        assert_eq!(config.margin.margin_buffer, dec!(0.9975));
        assert_eq!(config.margin.covered_minimum_per_lot, dec!(2000));
        assert_eq!(config.sizing.max_search_iterations, 1000);
        assert_eq!(config.observability.logging.format, "json");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.margin, MarginConfig::default());
        assert_eq!(config.sizing, SizingConfig::default());
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "format: ${STRATEGY_MARGIN_TEST_NONEXISTENT_VAR:-pretty}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "format: pretty");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${STRATEGY_MARGIN_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "level: ");
    }

    #[test]
    fn test_validation_rate_out_of_range() {
        let yaml = r"
margin:
  equity_initial_rate: 1.5
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid equity_initial_rate");
        };
        assert!(err.to_string().contains("equity_initial_rate"));
    }

    #[test]
    fn test_validation_maintenance_above_initial() {
        let yaml = r"
margin:
  equity_initial_rate: 0.25
  equity_maintenance_rate: 0.30
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for maintenance above initial");
        };
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn test_validation_zero_buffer() {
        let yaml = r"
margin:
  margin_buffer: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero margin buffer");
        };
        assert!(err.to_string().contains("margin_buffer"));
    }

    #[test]
    fn test_validation_zero_iterations() {
        let yaml = r"
sizing:
  max_search_iterations: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero iterations");
        };
        assert!(err.to_string().contains("max_search_iterations"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid log format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
margin:
  equity_initial_rate: 0.25
  equity_maintenance_rate: 0.25
  naked_option_underlying_rate: 0.2
  naked_option_minimum_rate: 0.1
  covered_minimum_per_lot: 1500
  margin_buffer: "0.99"

sizing:
  max_search_iterations: 250
  min_order_margin_pct: 0.001

observability:
  logging:
    level: debug
    format: pretty
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should parse full config: {e}"),
        };

        assert_eq!(config.margin.equity_initial_rate, dec!(0.25));
        assert_eq!(config.margin.covered_minimum_per_lot, dec!(1500));
        assert_eq!(config.margin.margin_buffer, dec!(0.99));
        assert_eq!(config.sizing.max_search_iterations, 250);
        assert_eq!(config.sizing.min_order_margin_pct, dec!(0.001));
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.observability.logging.format, "pretty");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sizing:\n  max_search_iterations: 42").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.sizing.max_search_iterations, 42);
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/strategy-margin.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
