//! Contemplated Order Value Object

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::{Position, Security};
use crate::domain::position_grouping::PositionGroup;
use crate::domain::shared::Symbol;

/// Identifier shared by the legs of one combo order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComboOrderId(u64);

impl ComboOrderId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ComboOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "combo-{}", self.0)
    }
}

/// A not-yet-submitted order leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContemplatedOrder {
    security: Security,
    quantity: Decimal,
    #[serde(default)]
    combo_id: Option<ComboOrderId>,
}

impl ContemplatedOrder {
    /// Create a standalone order leg.
    #[must_use]
    pub const fn new(security: Security, quantity: Decimal) -> Self {
        Self {
            security,
            quantity,
            combo_id: None,
        }
    }

    /// Attach the leg to a combo.
    #[must_use]
    pub const fn with_combo(mut self, combo_id: ComboOrderId) -> Self {
        self.combo_id = Some(combo_id);
        self
    }

    /// Order legs that trade `lots` of the group's strategy.
    #[must_use]
    pub fn for_group_lots(
        group: &PositionGroup,
        lots: Decimal,
        combo_id: Option<ComboOrderId>,
    ) -> Vec<Self> {
        group
            .lot_positions(lots)
            .into_iter()
            .map(|p| Self {
                security: p.security().clone(),
                quantity: p.quantity(),
                combo_id,
            })
            .collect()
    }

    /// Security being traded.
    #[must_use]
    pub const fn security(&self) -> &Security {
        &self.security
    }

    /// Symbol being traded.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        self.security.symbol()
    }

    /// Signed order quantity.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Combo the leg belongs to.
    #[must_use]
    pub const fn combo_id(&self) -> Option<ComboOrderId> {
        self.combo_id
    }

    /// The position this order would add if filled.
    #[must_use]
    pub fn to_position(&self) -> Position {
        Position::new(self.security.clone(), self.quantity)
    }
}
