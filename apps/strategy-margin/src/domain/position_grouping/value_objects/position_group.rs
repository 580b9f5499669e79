//! Position Group Value Object

use rust_decimal::Decimal;
use serde::Serialize;

use super::group_model::GroupBuyingPowerModel;
use crate::domain::option_position::{OptionContract, Position, Security};
use crate::domain::position_grouping::errors::PositionGroupError;
use crate::domain::shared::Symbol;
use crate::domain::strategy_catalog::{LegTemplate, StrategyDefinition, StrategyKind};

/// Signed quantity of a leg's security in one strategy lot.
pub(crate) fn leg_unit(leg: &LegTemplate, multiplier: u32) -> Decimal {
    let ratio = Decimal::from(leg.ratio);
    if leg.is_underlying() {
        ratio * Decimal::from(multiplier)
    } else {
        ratio
    }
}

/// Positions resolved into one strategy (or default) group.
///
/// Strategy groups keep their positions in the definition's leg order and
/// satisfy `position.quantity == quantity × position.unit_quantity` for
/// every leg. Default groups hold exactly one position with unit quantity 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionGroup {
    positions: Vec<Position>,
    quantity: Decimal,
    model: GroupBuyingPowerModel,
}

impl PositionGroup {
    /// Create a strategy group, validating the positions against the definition.
    pub fn strategy(
        definition: &StrategyDefinition,
        quantity: Decimal,
        positions: Vec<Position>,
    ) -> Result<Self, PositionGroupError> {
        validate_legs(definition, quantity, &positions)?;
        Ok(Self {
            positions,
            quantity,
            model: GroupBuyingPowerModel::Strategy(definition.kind()),
        })
    }

    /// Create a strategy group from leg securities, deriving unit quantities.
    ///
    /// A zero quantity yields an empty template group that orders can be
    /// sized against.
    pub fn from_legs(
        definition: &StrategyDefinition,
        securities: Vec<Security>,
        quantity: Decimal,
    ) -> Result<Self, PositionGroupError> {
        if securities.len() != definition.leg_count() {
            return Err(PositionGroupError::invariant(
                definition.name(),
                format!(
                    "expected {} legs, got {}",
                    definition.leg_count(),
                    securities.len()
                ),
            ));
        }
        let multiplier = shared_multiplier(definition.name(), &securities)?;
        let positions = definition
            .legs()
            .iter()
            .zip(securities)
            .map(|(leg, security)| {
                let unit = leg_unit(leg, multiplier);
                Position::with_unit(security, quantity * unit, unit)
            })
            .collect();
        Self::strategy(definition, quantity, positions)
    }

    /// Single-position group margined with the additive fallback.
    #[must_use]
    pub fn single(position: &Position) -> Self {
        Self {
            positions: vec![Position::with_unit(
                position.security().clone(),
                position.quantity(),
                Decimal::ONE,
            )],
            quantity: position.quantity(),
            model: GroupBuyingPowerModel::Default,
        }
    }

    /// Positions in leg order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Signed number of strategy lots.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Margin model applied to this group.
    #[must_use]
    pub const fn model(&self) -> GroupBuyingPowerModel {
        self.model
    }

    /// The matched strategy, if any.
    #[must_use]
    pub const fn strategy_kind(&self) -> Option<StrategyKind> {
        self.model.strategy()
    }

    /// Check if this is a default single-position group.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self.model, GroupBuyingPowerModel::Default)
    }

    /// Underlying shared by the group's positions.
    #[must_use]
    pub fn underlying(&self) -> Option<&Symbol> {
        self.positions.first().map(|p| p.security().underlying())
    }

    /// Symbols of the group's securities.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.positions.iter().map(Position::symbol)
    }

    /// Quantity of one security in this group (zero when absent).
    #[must_use]
    pub fn quantity_of(&self, symbol: &Symbol) -> Decimal {
        self.positions
            .iter()
            .filter(|p| p.symbol() == symbol)
            .map(Position::quantity)
            .sum()
    }

    /// Contract multiplier of the option legs (1 when there are none).
    #[must_use]
    pub fn multiplier(&self) -> u32 {
        self.positions
            .iter()
            .find_map(|p| p.security().as_option())
            .map_or(1, OptionContract::multiplier)
    }

    /// The same legs scaled to another lot count.
    #[must_use]
    pub fn with_quantity(&self, quantity: Decimal) -> Self {
        Self {
            positions: self.lot_positions(quantity),
            quantity,
            model: self.model,
        }
    }

    /// Leg positions for the given number of lots.
    #[must_use]
    pub fn lot_positions(&self, lots: Decimal) -> Vec<Position> {
        self.positions
            .iter()
            .map(|p| p.with_quantity(lots * p.unit_quantity()))
            .collect()
    }
}

impl std::fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x{} [", self.model, self.quantity)?;
        for (i, position) in self.positions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{position}")?;
        }
        write!(f, "]")
    }
}

fn shared_multiplier<'a>(
    strategy: &str,
    securities: impl IntoIterator<Item = &'a Security>,
) -> Result<u32, PositionGroupError> {
    let mut multipliers = securities
        .into_iter()
        .filter_map(Security::as_option)
        .map(OptionContract::multiplier);
    let Some(first) = multipliers.next() else {
        return Err(PositionGroupError::invariant(strategy, "no option legs"));
    };
    if multipliers.any(|m| m != first) {
        return Err(PositionGroupError::invariant(
            strategy,
            "option legs have different multipliers",
        ));
    }
    Ok(first)
}

fn validate_legs(
    definition: &StrategyDefinition,
    quantity: Decimal,
    positions: &[Position],
) -> Result<(), PositionGroupError> {
    let name = definition.name();
    if positions.len() != definition.leg_count() {
        return Err(PositionGroupError::invariant(
            name,
            format!(
                "expected {} legs, got {}",
                definition.leg_count(),
                positions.len()
            ),
        ));
    }

    let multiplier = shared_multiplier(name, positions.iter().map(Position::security))?;

    let underlying = positions[0].security().underlying();
    for (i, (leg, position)) in definition.legs().iter().zip(positions).enumerate() {
        if !leg.role.accepts(position.security()) {
            return Err(PositionGroupError::invariant(
                name,
                format!("leg {i} ({}) cannot fill {:?} role", position.symbol(), leg.role),
            ));
        }
        if position.security().underlying() != underlying {
            return Err(PositionGroupError::invariant(
                name,
                format!("leg {i} underlying differs from {underlying}"),
            ));
        }
        let unit = leg_unit(leg, multiplier);
        if position.unit_quantity() != unit {
            return Err(PositionGroupError::invariant(
                name,
                format!(
                    "leg {i} unit quantity {} does not match ratio {unit}",
                    position.unit_quantity()
                ),
            ));
        }
        if position.quantity() != quantity * unit {
            return Err(PositionGroupError::invariant(
                name,
                format!(
                    "leg {i} quantity {} is not {quantity} × {unit}",
                    position.quantity()
                ),
            ));
        }
    }

    let options: Vec<(&LegTemplate, &OptionContract)> = definition
        .legs()
        .iter()
        .zip(positions)
        .filter_map(|(leg, p)| p.security().as_option().map(|c| (leg, c)))
        .collect();
    for (i, (leg_a, a)) in options.iter().enumerate() {
        for (leg_b, b) in &options[i + 1..] {
            if !ranks_consistent(leg_a, a, leg_b, b) {
                return Err(PositionGroupError::invariant(
                    name,
                    format!("{} and {} violate strike/expiry ranks", a.symbol(), b.symbol()),
                ));
            }
        }
    }
    Ok(())
}

/// Check that two option legs respect their relative strike and expiry ranks.
pub(crate) fn ranks_consistent(
    leg_a: &LegTemplate,
    a: &OptionContract,
    leg_b: &LegTemplate,
    b: &OptionContract,
) -> bool {
    leg_a.strike_rank.cmp(&leg_b.strike_rank) == a.strike().cmp(&b.strike())
        && leg_a.expiry_rank.cmp(&leg_b.expiry_rank) == a.expiration().cmp(&b.expiration())
}
