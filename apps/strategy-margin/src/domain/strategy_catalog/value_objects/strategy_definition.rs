//! Strategy Definition Value Object

use serde::Serialize;

use super::leg_template::LegTemplate;
use super::strategy_kind::StrategyKind;

/// A named multi-leg strategy shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyDefinition {
    kind: StrategyKind,
    legs: &'static [LegTemplate],
    inverse: StrategyKind,
}

impl StrategyDefinition {
    /// Create a definition.
    #[must_use]
    pub const fn new(
        kind: StrategyKind,
        legs: &'static [LegTemplate],
        inverse: StrategyKind,
    ) -> Self {
        Self {
            kind,
            legs,
            inverse,
        }
    }

    /// Strategy kind.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Strategy name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Leg templates, in canonical order.
    #[must_use]
    pub const fn legs(&self) -> &'static [LegTemplate] {
        self.legs
    }

    /// Number of legs.
    #[must_use]
    pub const fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Strategy matched when the legs appear with the opposite sign.
    #[must_use]
    pub const fn inverse(&self) -> StrategyKind {
        self.inverse
    }

    /// Check if a negated match keeps this definition (with negative quantity).
    #[must_use]
    pub fn is_self_inverse(&self) -> bool {
        self.inverse == self.kind
    }

    /// Check if one leg is the underlying equity.
    #[must_use]
    pub fn has_underlying_leg(&self) -> bool {
        self.legs.iter().any(LegTemplate::is_underlying)
    }
}
