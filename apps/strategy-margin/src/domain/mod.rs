//! Domain Layer
//!
//! Pure business logic with no I/O. Every operation takes an immutable
//! portfolio snapshot and returns plain values.
//!
//! # Bounded Contexts
//!
//! - [`option_position`]: Securities, option contracts and positions
//! - [`strategy_catalog`]: Built-in multi-leg strategy definitions
//! - [`position_grouping`]: Resolving positions into strategy groups
//! - [`buying_power`]: Group margin models, impact and sufficiency
//! - [`order_sizing`]: Maximum order size for a buying-power budget

pub mod buying_power;
pub mod option_position;
pub mod order_sizing;
pub mod position_grouping;
pub mod shared;
pub mod strategy_catalog;
