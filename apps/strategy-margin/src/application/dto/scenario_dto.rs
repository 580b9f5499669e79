//! Scenario DTOs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::{OptionContract, OptionPositionError, Position, Security};
use crate::domain::shared::Symbol;

/// A portfolio plus the orders to evaluate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDto {
    /// Portfolio state.
    pub portfolio: PortfolioDto,
    /// Orders to check and size.
    #[serde(default)]
    pub checks: Vec<OrderCheckDto>,
}

/// Portfolio state in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioDto {
    /// Total portfolio value.
    pub total_portfolio_value: Decimal,
    /// Margin already used. Computed from the holdings when omitted.
    #[serde(default)]
    pub total_margin_used: Option<Decimal>,
    /// Current holdings.
    #[serde(default)]
    pub holdings: Vec<HoldingDto>,
    /// Prices by symbol (tickers and OCC option symbols).
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,
}

/// One holding: a ticker or OCC option symbol and a signed quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingDto {
    /// Ticker or OCC option symbol.
    pub symbol: String,
    /// Signed quantity.
    pub quantity: Decimal,
}

impl HoldingDto {
    /// Convert to a domain position.
    pub fn to_position(&self) -> Result<Position, OptionPositionError> {
        Ok(Position::new(parse_security(&self.symbol)?, self.quantity))
    }
}

/// An order on a strategy, checked for buying power and optionally sized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCheckDto {
    /// Strategy name, case-insensitive.
    pub strategy: String,
    /// Leg symbols in the strategy's leg order.
    pub legs: Vec<String>,
    /// Signed lots to order.
    pub lots: Decimal,
    /// Combo id stamped on every leg.
    #[serde(default)]
    pub combo_id: Option<u64>,
    /// Reserved buying power target as a fraction of portfolio value.
    #[serde(default)]
    pub target_pct: Option<Decimal>,
    /// Overrides the configured minimum order margin fraction.
    #[serde(default)]
    pub min_order_margin_pct: Option<Decimal>,
}

/// Options are recognized by their OCC symbol; anything else is an equity.
pub(crate) fn parse_security(symbol: &str) -> Result<Security, OptionPositionError> {
    if Symbol::new(symbol).is_option() {
        Ok(Security::from(OptionContract::from_occ(symbol)?))
    } else {
        Ok(Security::equity(symbol))
    }
}
