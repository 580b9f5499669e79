//! Group Buying-Power Model selector

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::strategy_catalog::StrategyKind;

/// Which margin formula applies to a position group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "model", content = "strategy", rename_all = "snake_case")]
pub enum GroupBuyingPowerModel {
    /// Closed-form formula of a matched strategy.
    Strategy(StrategyKind),
    /// Additive per-security fallback margin.
    Default,
}

impl GroupBuyingPowerModel {
    /// Model name: the strategy name, or `"Default"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Strategy(kind) => kind.name(),
            Self::Default => "Default",
        }
    }

    /// The matched strategy, if any.
    #[must_use]
    pub const fn strategy(&self) -> Option<StrategyKind> {
        match self {
            Self::Strategy(kind) => Some(*kind),
            Self::Default => None,
        }
    }
}

impl fmt::Display for GroupBuyingPowerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
