//! Buying Power Services

mod buying_power_service;
mod security_margin;
mod strategy_margin;

pub use buying_power_service::BuyingPowerService;
pub use security_margin::{MarginBasis, RegTSecurityMarginModel, SecurityMarginModel};

#[cfg(test)]
pub use security_margin::MockSecurityMarginModel;
