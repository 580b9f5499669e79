//! Symbol value object for instrument identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trading symbol (ticker or OCC option symbol).
///
/// Examples:
/// - Equity: "SPY", "AAPL"
/// - Option: "SPY230519C00300000" (OCC format, root unpadded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if this looks like an OCC option symbol.
    ///
    /// OCC format: `{ROOT}{YY}{MM}{DD}{P/C}{PRICE}`
    /// - Root: 1-6 characters
    /// - Date: 6 digits (YYMMDD)
    /// - Type: P (put) or C (call)
    /// - Price: 8 digits (strike × 1000)
    #[must_use]
    pub fn is_option(&self) -> bool {
        let s = self.0.as_bytes();
        let len = s.len();
        if !(16..=21).contains(&len) {
            return false;
        }
        let type_pos = len - 9;
        matches!(s[type_pos], b'P' | b'C')
            && s[len - 8..].iter().all(u8::is_ascii_digit)
            && s[type_pos - 6..type_pos].iter().all(u8::is_ascii_digit)
    }

    /// Check if the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
