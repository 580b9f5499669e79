//! Margin rate configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rates for the fallback security margin model and strategy formulas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Initial margin as a fraction of equity notional.
    #[serde(default = "default_equity_initial_rate")]
    pub equity_initial_rate: Decimal,
    /// Maintenance margin as a fraction of equity notional.
    #[serde(default = "default_equity_maintenance_rate")]
    pub equity_maintenance_rate: Decimal,
    /// Fraction of the underlying price charged on a naked short option.
    #[serde(default = "default_naked_option_underlying_rate")]
    pub naked_option_underlying_rate: Decimal,
    /// Floor fraction (of underlying for calls, strike for puts) on a naked short option.
    #[serde(default = "default_naked_option_minimum_rate")]
    pub naked_option_minimum_rate: Decimal,
    /// Per-lot floor for covered and protective strategies.
    #[serde(default = "default_covered_minimum_per_lot")]
    pub covered_minimum_per_lot: Decimal,
    /// Fraction of portfolio value usable as buying power.
    #[serde(default = "default_margin_buffer")]
    pub margin_buffer: Decimal,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            equity_initial_rate: default_equity_initial_rate(),
            equity_maintenance_rate: default_equity_maintenance_rate(),
            naked_option_underlying_rate: default_naked_option_underlying_rate(),
            naked_option_minimum_rate: default_naked_option_minimum_rate(),
            covered_minimum_per_lot: default_covered_minimum_per_lot(),
            margin_buffer: default_margin_buffer(),
        }
    }
}

const fn default_equity_initial_rate() -> Decimal {
    dec!(0.50)
}

const fn default_equity_maintenance_rate() -> Decimal {
    dec!(0.25)
}

const fn default_naked_option_underlying_rate() -> Decimal {
    dec!(0.20)
}

const fn default_naked_option_minimum_rate() -> Decimal {
    dec!(0.10)
}

const fn default_covered_minimum_per_lot() -> Decimal {
    dec!(2000)
}

// 0.25% of portfolio value is kept free.
const fn default_margin_buffer() -> Decimal {
    dec!(0.9975)
}
