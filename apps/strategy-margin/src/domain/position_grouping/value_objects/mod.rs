//! Position Grouping Value Objects

mod group_model;
mod position_group;

pub use group_model::GroupBuyingPowerModel;
pub use position_group::PositionGroup;
pub(crate) use position_group::{leg_unit, ranks_consistent};
