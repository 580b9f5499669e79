//! Position Grouping Bounded Context
//!
//! Resolves a flat position set into strategy-matched and default
//! single-position groups. Groups are recomputed on every call and never
//! persisted.

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::PositionGroupError;
pub use services::{PositionGroupResolver, resolve};
pub use value_objects::{GroupBuyingPowerModel, PositionGroup};
