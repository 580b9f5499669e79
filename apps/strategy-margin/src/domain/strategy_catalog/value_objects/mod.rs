//! Strategy Catalog Value Objects

mod leg_template;
mod strategy_definition;
mod strategy_kind;

pub use leg_template::{LegRole, LegTemplate};
pub use strategy_definition::StrategyDefinition;
pub use strategy_kind::StrategyKind;
