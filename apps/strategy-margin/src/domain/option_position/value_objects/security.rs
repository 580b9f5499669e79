//! Security Value Object

use serde::{Deserialize, Serialize};

use super::option_contract::OptionContract;
use crate::domain::shared::Symbol;

/// A tradable security held in a portfolio.
///
/// `Other` covers any security type the grouping engine does not
/// understand (futures, crypto, ...); those always fall back to
/// single-position default groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Security {
    /// Common stock or ETF.
    Equity {
        /// Ticker symbol.
        symbol: Symbol,
    },
    /// Listed equity option.
    Option(OptionContract),
    /// Unsupported security type.
    Other {
        /// Identifier of the security.
        symbol: Symbol,
    },
}

impl Security {
    /// Create an equity security.
    #[must_use]
    pub fn equity(symbol: impl Into<Symbol>) -> Self {
        Self::Equity {
            symbol: symbol.into(),
        }
    }

    /// Create an unsupported security.
    #[must_use]
    pub fn other(symbol: impl Into<Symbol>) -> Self {
        Self::Other {
            symbol: symbol.into(),
        }
    }

    /// Identifier of the security.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        match self {
            Self::Equity { symbol } | Self::Other { symbol } => symbol,
            Self::Option(contract) => contract.symbol(),
        }
    }

    /// Symbol of the underlying (the equity itself for equities).
    #[must_use]
    pub const fn underlying(&self) -> &Symbol {
        match self {
            Self::Equity { symbol } | Self::Other { symbol } => symbol,
            Self::Option(contract) => contract.underlying(),
        }
    }

    /// The option contract, if this is an option.
    #[must_use]
    pub const fn as_option(&self) -> Option<&OptionContract> {
        match self {
            Self::Option(contract) => Some(contract),
            _ => None,
        }
    }

    /// Check if this is an equity.
    #[must_use]
    pub const fn is_equity(&self) -> bool {
        matches!(self, Self::Equity { .. })
    }

    /// Check if this security participates in strategy matching.
    #[must_use]
    pub const fn is_groupable(&self) -> bool {
        !matches!(self, Self::Other { .. })
    }
}

impl From<OptionContract> for Security {
    fn from(contract: OptionContract) -> Self {
        Self::Option(contract)
    }
}

impl std::fmt::Display for Security {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
