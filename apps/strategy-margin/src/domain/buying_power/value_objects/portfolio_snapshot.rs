//! Portfolio Snapshot Value Object

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::buying_power::errors::BuyingPowerError;
use crate::domain::option_position::Position;
use crate::domain::shared::{Margin, Symbol};

/// Read-only view of a portfolio for one buying-power decision.
///
/// The caller owns the live portfolio and hands in a copy (or holds a lock)
/// so that a check and the subsequent accept see the same holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    total_portfolio_value: Decimal,
    #[serde(default)]
    total_margin_used: Decimal,
    #[serde(default)]
    holdings: Vec<Position>,
    #[serde(default)]
    prices: HashMap<Symbol, Decimal>,
}

impl PortfolioSnapshot {
    /// Create an empty snapshot with the given portfolio value.
    #[must_use]
    pub fn new(total_portfolio_value: Decimal) -> Self {
        Self {
            total_portfolio_value,
            ..Self::default()
        }
    }

    /// Set the margin currently used by all holdings.
    #[must_use]
    pub const fn with_margin_used(mut self, total_margin_used: Decimal) -> Self {
        self.total_margin_used = total_margin_used;
        self
    }

    /// Add a holding.
    #[must_use]
    pub fn with_holding(mut self, position: Position) -> Self {
        self.holdings.push(position);
        self
    }

    /// Add several holdings.
    #[must_use]
    pub fn with_holdings(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.holdings.extend(positions);
        self
    }

    /// Set the price of a security.
    #[must_use]
    pub fn with_price(mut self, symbol: impl Into<Symbol>, price: Decimal) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }

    /// Total portfolio value.
    #[must_use]
    pub const fn total_portfolio_value(&self) -> Decimal {
        self.total_portfolio_value
    }

    /// Margin used by all holdings.
    #[must_use]
    pub const fn total_margin_used(&self) -> Decimal {
        self.total_margin_used
    }

    /// Current holdings.
    #[must_use]
    pub fn holdings(&self) -> &[Position] {
        &self.holdings
    }

    /// Net held quantity of a security.
    #[must_use]
    pub fn holding_quantity(&self, symbol: &Symbol) -> Decimal {
        self.holdings
            .iter()
            .filter(|p| p.symbol() == symbol)
            .map(Position::quantity)
            .sum()
    }

    /// Price of a security.
    pub fn price(&self, symbol: &Symbol) -> Result<Decimal, BuyingPowerError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| BuyingPowerError::MissingPrice {
                symbol: symbol.to_string(),
            })
    }

    /// `total_portfolio_value × buffer − total_margin_used`.
    #[must_use]
    pub fn margin_remaining(&self, buffer: Decimal) -> Margin {
        Margin::new(self.total_portfolio_value * buffer - self.total_margin_used)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), BuyingPowerError> {
        if self.total_margin_used.is_sign_negative() && !self.total_margin_used.is_zero() {
            return Err(BuyingPowerError::InvalidSnapshot {
                message: format!("total margin used {} is negative", self.total_margin_used),
            });
        }
        if let Some((symbol, price)) = self.prices.iter().find(|(_, p)| **p < Decimal::ZERO) {
            return Err(BuyingPowerError::InvalidSnapshot {
                message: format!("price {price} for {symbol} is negative"),
            });
        }
        Ok(())
    }
}
