//! Order Sizing Services

mod quantity_calculator;

pub use quantity_calculator::OrderQuantityCalculator;
