//! Position Grouping Errors

use thiserror::Error;

use crate::domain::strategy_catalog::StrategyCatalogError;

/// Errors raised when a group's positions do not fit its strategy.
///
/// These indicate a caller or engine bug, never a market condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionGroupError {
    /// Group positions inconsistent with the assigned definition.
    #[error("Invariant violated for {strategy} group: {message}")]
    InvariantViolation {
        /// Strategy the group claims to be.
        strategy: String,
        /// What was inconsistent.
        message: String,
    },

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] StrategyCatalogError),
}

impl PositionGroupError {
    pub(crate) fn invariant(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}
