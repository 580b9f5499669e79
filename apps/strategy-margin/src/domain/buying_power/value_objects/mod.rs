//! Buying Power Value Objects

mod contemplated_order;
mod impact;
mod portfolio_snapshot;

pub use contemplated_order::{ComboOrderId, ContemplatedOrder};
pub use impact::{BuyingPowerSufficiency, ReservedBuyingPowerImpact};
pub use portfolio_snapshot::PortfolioSnapshot;
