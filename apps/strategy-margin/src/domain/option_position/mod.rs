//! Option Position Bounded Context
//!
//! Securities, option contracts and the immutable positions that the
//! grouping and buying-power contexts consume.

pub mod errors;
pub mod value_objects;

pub use errors::OptionPositionError;
pub use value_objects::{DEFAULT_MULTIPLIER, OptionContract, OptionRight, Position, Security};
