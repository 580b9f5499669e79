//! Leg Template Value Object

use serde::{Deserialize, Serialize};

use crate::domain::option_position::{OptionRight, Security};

/// Role a position plays within a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegRole {
    /// Shares of the underlying equity.
    Underlying,
    /// Call option on the underlying.
    Call,
    /// Put option on the underlying.
    Put,
}

impl LegRole {
    /// Check if a security can fill this role.
    #[must_use]
    pub fn accepts(self, security: &Security) -> bool {
        match (self, security) {
            (Self::Underlying, Security::Equity { .. }) => true,
            (Self::Call, Security::Option(c)) => c.right() == OptionRight::Call,
            (Self::Put, Security::Option(c)) => c.right() == OptionRight::Put,
            _ => false,
        }
    }
}

/// One leg of a strategy shape.
///
/// Ranks are relative: legs sharing a strike rank must share a strike,
/// and a lower rank means a strictly lower strike (earlier expiry for
/// `expiry_rank`). Ranks are ignored for the underlying leg. The ratio is
/// signed per strategy lot; for the underlying leg it counts contract
/// multiples (one covered call is `+1` × 100 shares).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegTemplate {
    /// Security role.
    pub role: LegRole,
    /// Relative strike rank.
    pub strike_rank: u8,
    /// Relative expiry rank.
    pub expiry_rank: u8,
    /// Signed ratio per lot.
    pub ratio: i32,
}

impl LegTemplate {
    /// Underlying shares leg.
    #[must_use]
    pub const fn underlying(ratio: i32) -> Self {
        Self {
            role: LegRole::Underlying,
            strike_rank: 0,
            expiry_rank: 0,
            ratio,
        }
    }

    /// Call leg at the given strike rank, nearest expiry.
    #[must_use]
    pub const fn call(strike_rank: u8, ratio: i32) -> Self {
        Self {
            role: LegRole::Call,
            strike_rank,
            expiry_rank: 0,
            ratio,
        }
    }

    /// Put leg at the given strike rank, nearest expiry.
    #[must_use]
    pub const fn put(strike_rank: u8, ratio: i32) -> Self {
        Self {
            role: LegRole::Put,
            strike_rank,
            expiry_rank: 0,
            ratio,
        }
    }

    /// Same leg at another expiry rank.
    #[must_use]
    pub const fn expiring(mut self, expiry_rank: u8) -> Self {
        self.expiry_rank = expiry_rank;
        self
    }

    /// Check if this is the underlying leg.
    #[must_use]
    pub const fn is_underlying(&self) -> bool {
        matches!(self.role, LegRole::Underlying)
    }
}
