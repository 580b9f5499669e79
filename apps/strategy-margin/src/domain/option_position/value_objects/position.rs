//! Position Value Object

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::security::Security;
use crate::domain::option_position::errors::OptionPositionError;
use crate::domain::shared::Symbol;

fn default_unit_quantity() -> Decimal {
    Decimal::ONE
}

/// A signed holding of one security.
///
/// `unit_quantity` is the signed quantity of this security in one lot of
/// the group that owns it: `+100` shares and `-1` call for one covered
/// call, `1` for anything margined on its own. Positions are immutable;
/// every change produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    security: Security,
    quantity: Decimal,
    #[serde(default = "default_unit_quantity")]
    unit_quantity: Decimal,
}

impl Position {
    /// Create a position with unit quantity 1.
    #[must_use]
    pub fn new(security: Security, quantity: Decimal) -> Self {
        Self {
            security,
            quantity,
            unit_quantity: Decimal::ONE,
        }
    }

    /// Create a position with an explicit lot unit quantity.
    #[must_use]
    pub const fn with_unit(security: Security, quantity: Decimal, unit_quantity: Decimal) -> Self {
        Self {
            security,
            quantity,
            unit_quantity,
        }
    }

    /// The held security.
    #[must_use]
    pub const fn security(&self) -> &Security {
        &self.security
    }

    /// Identifier of the held security.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        self.security.symbol()
    }

    /// Signed quantity (shares or contracts).
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Signed quantity per group lot.
    #[must_use]
    pub const fn unit_quantity(&self) -> Decimal {
        self.unit_quantity
    }

    /// Check if the position holds nothing.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Same security and unit, different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: Decimal) -> Self {
        Self {
            security: self.security.clone(),
            quantity,
            unit_quantity: self.unit_quantity,
        }
    }

    /// Same security and unit, opposite quantity.
    #[must_use]
    pub fn negate(&self) -> Self {
        self.with_quantity(-self.quantity)
    }

    /// Add another position in the same security.
    ///
    /// The receiver's unit quantity is kept.
    pub fn combine(&self, other: &Self) -> Result<Self, OptionPositionError> {
        if self.symbol() != other.symbol() {
            return Err(OptionPositionError::MismatchedSecurity {
                left: self.symbol().to_string(),
                right: other.symbol().to_string(),
            });
        }
        Ok(self.with_quantity(self.quantity + other.quantity))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.quantity, self.security)
    }
}
