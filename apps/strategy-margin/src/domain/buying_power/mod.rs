//! Buying Power Bounded Context
//!
//! Margin requirements for position groups, the reserved buying-power
//! impact of contemplated orders, and the sufficiency decision built on it.
//!
//! # Model family
//!
//! Each strategy has a closed-form requirement built on a per-security
//! fallback model ([`SecurityMarginModel`]). Default groups use the fallback
//! directly. Reserved buying power is the larger of initial and maintenance
//! margin.

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::BuyingPowerError;
pub use services::{BuyingPowerService, MarginBasis, RegTSecurityMarginModel, SecurityMarginModel};
pub use value_objects::{
    BuyingPowerSufficiency, ComboOrderId, ContemplatedOrder, PortfolioSnapshot,
    ReservedBuyingPowerImpact,
};
