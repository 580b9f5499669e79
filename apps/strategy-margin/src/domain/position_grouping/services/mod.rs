//! Position Grouping Services

mod leg_matcher;
mod resolver;

pub use resolver::{PositionGroupResolver, resolve};
