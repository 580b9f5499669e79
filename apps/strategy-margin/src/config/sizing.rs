//! Order sizing configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Limits for the order quantity search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Maximum impact evaluations per search.
    #[serde(default = "default_max_search_iterations")]
    pub max_search_iterations: u32,
    /// Default minimum order margin as a fraction of portfolio value.
    #[serde(default)]
    pub min_order_margin_pct: Decimal,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            max_search_iterations: default_max_search_iterations(),
            min_order_margin_pct: Decimal::ZERO,
        }
    }
}

const fn default_max_search_iterations() -> u32 {
    1000
}
