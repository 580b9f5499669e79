//! Report DTOs

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::buying_power::{BuyingPowerSufficiency, ReservedBuyingPowerImpact};
use crate::domain::order_sizing::LotSearchResult;
use crate::domain::position_grouping::PositionGroup;
use crate::domain::shared::Margin;

/// Everything computed for one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReportDto {
    /// Reserved buying power of all holdings.
    pub total_margin_used: Margin,
    /// Buying power left under the configured buffer.
    pub available_buying_power: Margin,
    /// Holdings resolved into groups.
    pub groups: Vec<GroupReportDto>,
    /// Results of the order checks.
    pub checks: Vec<CheckReportDto>,
}

/// One resolved group with its margin figures.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReportDto {
    /// Strategy name or `Default`.
    pub model: String,
    /// Signed lots.
    pub quantity: Decimal,
    /// Positions, formatted.
    pub positions: Vec<String>,
    /// Initial margin requirement.
    pub initial_margin: Margin,
    /// Maintenance margin requirement.
    pub maintenance_margin: Margin,
    /// Larger of the two.
    pub reserved_buying_power: Margin,
}

impl GroupReportDto {
    /// Build from a group and its figures.
    #[must_use]
    pub fn new(group: &PositionGroup, initial_margin: Margin, maintenance_margin: Margin) -> Self {
        Self {
            model: group.model().to_string(),
            quantity: group.quantity(),
            positions: group.positions().iter().map(ToString::to_string).collect(),
            initial_margin,
            maintenance_margin,
            reserved_buying_power: initial_margin.max(maintenance_margin),
        }
    }
}

/// Impact of an order, with contemplated groups formatted.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactDto {
    /// Reserved buying power of the affected holdings now.
    pub current: Margin,
    /// Reserved buying power after the order fills.
    pub contemplated: Margin,
    /// Difference.
    pub delta: Margin,
    /// Groups after the fill, formatted.
    pub contemplated_groups: Vec<String>,
}

impl From<ReservedBuyingPowerImpact> for ImpactDto {
    fn from(impact: ReservedBuyingPowerImpact) -> Self {
        Self {
            current: impact.current,
            contemplated: impact.contemplated,
            delta: impact.delta,
            contemplated_groups: impact
                .contemplated_groups
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Result of one order check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReportDto {
    /// Group the order trades, formatted with its current quantity.
    pub group: String,
    /// Lots ordered.
    pub lots: Decimal,
    /// Buying-power impact.
    pub impact: ImpactDto,
    /// Whether the order fits.
    pub sufficiency: BuyingPowerSufficiency,
    /// Lots that reach the target, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lots_for_target: Option<LotSearchResult>,
}
