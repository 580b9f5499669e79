//! Option Position Errors

use thiserror::Error;

/// Errors that can occur with securities and positions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionPositionError {
    /// Invalid option contract.
    #[error("Invalid option contract: {message}")]
    InvalidContract {
        /// Description of the problem.
        message: String,
    },

    /// Two positions for different securities cannot be combined.
    #[error("Cannot combine positions in {left} and {right}")]
    MismatchedSecurity {
        /// Symbol of the receiving position.
        left: String,
        /// Symbol of the other position.
        right: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OptionPositionError::InvalidContract {
            message: "bad OCC symbol".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid option contract: bad OCC symbol");

        let err = OptionPositionError::MismatchedSecurity {
            left: "SPY".to_string(),
            right: "QQQ".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot combine positions in SPY and QQQ");
    }
}
