//! Crate-level error handling for the strategy margin engine.
//!
//! Each bounded context has its own `thiserror` enum. [`MarginEngineError`]
//! flattens them into a stable [`ErrorCode`] plus message and key-value
//! context, the shape reported by the scenario runner.
//!
//! # Error Codes
//!
//! | Reason | Usage |
//! |--------|-------|
//! | `INVALID_CONFIG` | Config file unreadable or invalid |
//! | `INVALID_SCENARIO` | Scenario file unreadable or malformed |
//! | `INVALID_SNAPSHOT` | Portfolio snapshot inconsistent |
//! | `INVALID_ORDER` | Contemplated orders malformed |
//! | `INVALID_CONTRACT` | Option contract or position malformed |
//! | `MISSING_PRICE` | A security needed for margin has no price |
//! | `INVARIANT_VIOLATION` | Group positions do not fit their strategy |
//! | `UNKNOWN_STRATEGY` | Strategy name not in the catalog |
//! | `INTERNAL_ERROR` | Unexpected failure |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::buying_power::BuyingPowerError;
use crate::domain::option_position::OptionPositionError;
use crate::domain::position_grouping::PositionGroupError;
use crate::domain::strategy_catalog::StrategyCatalogError;

/// Error codes for the margin engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid configuration.
    InvalidConfig,
    /// Invalid scenario input.
    InvalidScenario,
    /// Inconsistent portfolio snapshot.
    InvalidSnapshot,
    /// Malformed contemplated orders.
    InvalidOrder,
    /// Malformed option contract or position.
    InvalidContract,
    /// Missing price.
    MissingPrice,
    /// Group inconsistent with its strategy.
    InvariantViolation,
    /// Unknown strategy name.
    UnknownStrategy,
    /// Internal error.
    InternalError,
}

impl ErrorCode {
    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::InvalidScenario => "INVALID_SCENARIO",
            Self::InvalidSnapshot => "INVALID_SNAPSHOT",
            Self::InvalidOrder => "INVALID_ORDER",
            Self::InvalidContract => "INVALID_CONTRACT",
            Self::MissingPrice => "MISSING_PRICE",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::UnknownStrategy => "UNKNOWN_STRATEGY",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller, rather than the engine, is at fault.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation | Self::InternalError)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A coded error with context.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("[{}] {}", .code.reason(), .message)]
pub struct MarginEngineError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl MarginEngineError {
    /// Create a new error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Invalid scenario input.
    #[must_use]
    pub fn invalid_scenario(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidScenario, message)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<ConfigError> for MarginEngineError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorCode::InvalidConfig, err.to_string())
    }
}

impl From<StrategyCatalogError> for MarginEngineError {
    fn from(err: StrategyCatalogError) -> Self {
        let StrategyCatalogError::UnknownStrategy { name } = &err;
        let name = name.clone();
        Self::new(ErrorCode::UnknownStrategy, err.to_string()).with_context("strategy", name)
    }
}

impl From<OptionPositionError> for MarginEngineError {
    fn from(err: OptionPositionError) -> Self {
        Self::new(ErrorCode::InvalidContract, err.to_string())
    }
}

impl From<PositionGroupError> for MarginEngineError {
    fn from(err: PositionGroupError) -> Self {
        match err {
            PositionGroupError::Catalog(inner) => inner.into(),
            PositionGroupError::InvariantViolation { ref strategy, .. } => {
                let strategy = strategy.clone();
                Self::new(ErrorCode::InvariantViolation, err.to_string())
                    .with_context("strategy", strategy)
            }
        }
    }
}

impl From<BuyingPowerError> for MarginEngineError {
    fn from(err: BuyingPowerError) -> Self {
        match err {
            BuyingPowerError::MissingPrice { ref symbol } => {
                let symbol = symbol.clone();
                Self::new(ErrorCode::MissingPrice, err.to_string()).with_context("symbol", symbol)
            }
            BuyingPowerError::InvalidSnapshot { .. } => {
                Self::new(ErrorCode::InvalidSnapshot, err.to_string())
            }
            BuyingPowerError::InvalidOrder { .. } => {
                Self::new(ErrorCode::InvalidOrder, err.to_string())
            }
            BuyingPowerError::Group(inner) => inner.into(),
        }
    }
}
