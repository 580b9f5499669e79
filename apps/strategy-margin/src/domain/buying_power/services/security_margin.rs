//! Per-Security Margin Models
//!
//! The fallback margin charged on a single position, used directly for
//! default groups and as the building block of every strategy formula.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MarginConfig;
use crate::domain::buying_power::errors::BuyingPowerError;
use crate::domain::buying_power::value_objects::PortfolioSnapshot;
use crate::domain::option_position::{OptionContract, Position, Security};
use crate::domain::shared::Margin;

/// Which requirement is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBasis {
    /// Requirement to open the position.
    Initial,
    /// Requirement to keep holding it.
    Maintenance,
}

/// Margin requirement of one stand-alone position.
#[cfg_attr(test, mockall::automock)]
pub trait SecurityMarginModel: Send + Sync {
    /// Requirement for `position`, non-negative.
    fn margin_requirement(
        &self,
        portfolio: &PortfolioSnapshot,
        position: &Position,
        basis: MarginBasis,
    ) -> Result<Margin, BuyingPowerError>;
}

/// Regulation T style rates for equities and naked short options.
#[derive(Debug, Clone, Default)]
pub struct RegTSecurityMarginModel {
    config: MarginConfig,
}

impl RegTSecurityMarginModel {
    /// Create a model with the given rates.
    #[must_use]
    pub const fn new(config: MarginConfig) -> Self {
        Self { config }
    }

    /// Rates in use.
    #[must_use]
    pub const fn config(&self) -> &MarginConfig {
        &self.config
    }

    const fn equity_rate(&self, basis: MarginBasis) -> Decimal {
        match basis {
            MarginBasis::Initial => self.config.equity_initial_rate,
            MarginBasis::Maintenance => self.config.equity_maintenance_rate,
        }
    }

    fn short_option(
        &self,
        portfolio: &PortfolioSnapshot,
        contract: &OptionContract,
        contracts: Decimal,
    ) -> Result<Margin, BuyingPowerError> {
        let premium = portfolio.price(contract.symbol())?;
        let spot = portfolio.price(contract.underlying())?;
        let floor_base = if contract.is_call() {
            spot
        } else {
            contract.strike()
        };
        let charge = (self.config.naked_option_underlying_rate * spot
            - contract.out_of_the_money_amount(spot))
        .max(self.config.naked_option_minimum_rate * floor_base);
        Ok(Margin::new(
            (premium + charge) * contract.multiplier_decimal() * contracts,
        ))
    }
}

impl SecurityMarginModel for RegTSecurityMarginModel {
    fn margin_requirement(
        &self,
        portfolio: &PortfolioSnapshot,
        position: &Position,
        basis: MarginBasis,
    ) -> Result<Margin, BuyingPowerError> {
        let size = position.quantity().abs();
        match position.security() {
            Security::Equity { symbol } | Security::Other { symbol } => {
                let price = portfolio.price(symbol)?;
                Ok(Margin::new(size * price * self.equity_rate(basis)))
            }
            Security::Option(_) if position.quantity() >= Decimal::ZERO => Ok(Margin::ZERO),
            Security::Option(contract) => self.short_option(portfolio, contract, size),
        }
    }
}
