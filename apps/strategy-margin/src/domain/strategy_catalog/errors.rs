//! Strategy Catalog Errors

use thiserror::Error;

/// Errors raised by catalog lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyCatalogError {
    /// No built-in strategy has this name.
    #[error("Unknown option strategy: {name}")]
    UnknownStrategy {
        /// The name that was looked up.
        name: String,
    },
}
