//! Strategy Catalog Bounded Context
//!
//! Read-only table of the named multi-leg shapes the resolver can
//! recognize, each paired with the inverse it resolves to when its legs
//! appear with the opposite sign.

pub mod catalog;
pub mod errors;
pub mod value_objects;

pub use catalog::StrategyCatalog;
pub use errors::StrategyCatalogError;
pub use value_objects::{LegRole, LegTemplate, StrategyDefinition, StrategyKind};
