//! Option Contract Value Object

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::errors::OptionPositionError;
use crate::domain::shared::Symbol;

/// Default equity option contract multiplier.
pub const DEFAULT_MULTIPLIER: u32 = 100;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionRight {
    /// OCC symbol character for this right.
    #[must_use]
    pub const fn occ_char(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

const fn default_multiplier() -> u32 {
    DEFAULT_MULTIPLIER
}

/// Option contract specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionContract {
    /// OCC symbol (e.g., "SPY230519C00300000").
    symbol: Symbol,
    /// Underlying symbol.
    underlying: Symbol,
    /// Strike price.
    strike: Decimal,
    /// Expiration date.
    expiration: NaiveDate,
    /// Call or put.
    right: OptionRight,
    /// Contract multiplier (typically 100 for equity options).
    #[serde(default = "default_multiplier")]
    multiplier: u32,
}

impl OptionContract {
    /// Create a new option contract; the OCC symbol is derived from the terms.
    #[must_use]
    pub fn new(
        underlying: impl Into<Symbol>,
        strike: Decimal,
        expiration: NaiveDate,
        right: OptionRight,
    ) -> Self {
        let underlying = underlying.into();
        let symbol = occ_symbol(&underlying, strike, expiration, right);
        Self {
            symbol,
            underlying,
            strike,
            expiration,
            right,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }

    /// Create a call option contract.
    #[must_use]
    pub fn call(underlying: impl Into<Symbol>, strike: Decimal, expiration: NaiveDate) -> Self {
        Self::new(underlying, strike, expiration, OptionRight::Call)
    }

    /// Create a put option contract.
    #[must_use]
    pub fn put(underlying: impl Into<Symbol>, strike: Decimal, expiration: NaiveDate) -> Self {
        Self::new(underlying, strike, expiration, OptionRight::Put)
    }

    /// Parse a contract from an OCC symbol (`{ROOT}{YYMMDD}{C|P}{STRIKE×1000:08}`).
    ///
    /// Space-padded roots are accepted.
    pub fn from_occ(symbol: &str) -> Result<Self, OptionPositionError> {
        let compact: String = symbol.chars().filter(|c| !c.is_whitespace()).collect();
        let candidate = Symbol::new(compact);
        if !candidate.is_option() {
            return Err(OptionPositionError::InvalidContract {
                message: format!("'{symbol}' is not an OCC option symbol"),
            });
        }

        let s = candidate.as_str();
        let len = s.len();
        let root = &s[..len - 15];
        let date = &s[len - 15..len - 9];
        let right = match &s[len - 9..len - 8] {
            "C" => OptionRight::Call,
            _ => OptionRight::Put,
        };
        let strike_thousandths: i64 =
            s[len - 8..]
                .parse()
                .map_err(|_| OptionPositionError::InvalidContract {
                    message: format!("invalid strike in '{symbol}'"),
                })?;
        let expiration = NaiveDate::parse_from_str(&format!("20{date}"), "%Y%m%d").map_err(|e| {
            OptionPositionError::InvalidContract {
                message: format!("invalid expiration in '{symbol}': {e}"),
            }
        })?;

        Ok(Self::new(
            root,
            Decimal::new(strike_thousandths, 3).normalize(),
            expiration,
            right,
        ))
    }

    /// Set a custom multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Get the OCC symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the underlying symbol.
    #[must_use]
    pub const fn underlying(&self) -> &Symbol {
        &self.underlying
    }

    /// Get the strike price.
    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.strike
    }

    /// Get the expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Get the option right.
    #[must_use]
    pub const fn right(&self) -> OptionRight {
        self.right
    }

    /// Get the contract multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Contract multiplier as a Decimal.
    #[must_use]
    pub fn multiplier_decimal(&self) -> Decimal {
        Decimal::from(self.multiplier)
    }

    /// Check if this is a call option.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self.right, OptionRight::Call)
    }

    /// Check if this is a put option.
    #[must_use]
    pub const fn is_put(&self) -> bool {
        matches!(self.right, OptionRight::Put)
    }

    /// In-the-money amount per share at the given underlying price.
    #[must_use]
    pub fn intrinsic_value(&self, underlying_price: Decimal) -> Decimal {
        let raw = match self.right {
            OptionRight::Call => underlying_price - self.strike,
            OptionRight::Put => self.strike - underlying_price,
        };
        raw.max(Decimal::ZERO)
    }

    /// Out-of-the-money amount per share at the given underlying price.
    #[must_use]
    pub fn out_of_the_money_amount(&self, underlying_price: Decimal) -> Decimal {
        let raw = match self.right {
            OptionRight::Call => self.strike - underlying_price,
            OptionRight::Put => underlying_price - self.strike,
        };
        raw.max(Decimal::ZERO)
    }
}

fn occ_symbol(
    underlying: &Symbol,
    strike: Decimal,
    expiration: NaiveDate,
    right: OptionRight,
) -> Symbol {
    let thousandths = (strike * Decimal::ONE_THOUSAND)
        .trunc()
        .to_u64()
        .unwrap_or_default();
    Symbol::new(format!(
        "{}{}{}{:08}",
        underlying,
        expiration.format("%y%m%d"),
        right.occ_char(),
        thousandths
    ))
}
