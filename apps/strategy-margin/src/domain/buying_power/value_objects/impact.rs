//! Buying Power Impact Value Objects

use serde::Serialize;

use crate::domain::position_grouping::PositionGroup;
use crate::domain::shared::Margin;

/// Reserved buying power before and after a contemplated trade.
///
/// Only groups touching the affected symbols are counted, so `delta` is the
/// marginal cost of the trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservedBuyingPowerImpact {
    /// Reserved buying power of the affected holdings today.
    pub current: Margin,
    /// Reserved buying power of the affected holdings after the orders fill.
    pub contemplated: Margin,
    /// `contemplated - current`.
    pub delta: Margin,
    /// Groups the affected holdings would resolve into after the fill.
    pub contemplated_groups: Vec<PositionGroup>,
}

impl ReservedBuyingPowerImpact {
    /// Build an impact from before and after figures.
    #[must_use]
    pub fn new(current: Margin, contemplated: Margin, contemplated_groups: Vec<PositionGroup>) -> Self {
        Self {
            current,
            contemplated,
            delta: contemplated - current,
            contemplated_groups,
        }
    }
}

/// Outcome of a buying-power check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyingPowerSufficiency {
    /// Whether the order may proceed.
    pub is_sufficient: bool,
    /// Human-readable explanation when it may not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BuyingPowerSufficiency {
    /// The order fits.
    #[must_use]
    pub const fn sufficient() -> Self {
        Self {
            is_sufficient: true,
            reason: None,
        }
    }

    /// The order does not fit.
    #[must_use]
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self {
            is_sufficient: false,
            reason: Some(reason.into()),
        }
    }
}
