//! Order Sizing Bounded Context
//!
//! Converts a buying-power budget into a strategy lot count by searching
//! over the buying-power impact of candidate orders.

pub mod services;
pub mod value_objects;

pub use services::OrderQuantityCalculator;
pub use value_objects::LotSearchResult;
