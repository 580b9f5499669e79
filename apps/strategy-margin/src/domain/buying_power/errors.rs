//! Buying Power Errors
//!
//! Only caller or engine bugs are errors here. Insufficient buying power is
//! an ordinary result value.

use thiserror::Error;

use crate::domain::position_grouping::PositionGroupError;

/// Errors raised by margin and buying-power computations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuyingPowerError {
    /// The snapshot has no price for a security that needs one.
    #[error("Missing price for {symbol}")]
    MissingPrice {
        /// Security without a price.
        symbol: String,
    },

    /// The portfolio snapshot is internally inconsistent.
    #[error("Invalid portfolio snapshot: {message}")]
    InvalidSnapshot {
        /// What was wrong.
        message: String,
    },

    /// The contemplated orders are malformed.
    #[error("Invalid contemplated order: {message}")]
    InvalidOrder {
        /// What was wrong.
        message: String,
    },

    /// A group does not fit its strategy definition.
    #[error(transparent)]
    Group(#[from] PositionGroupError),
}
