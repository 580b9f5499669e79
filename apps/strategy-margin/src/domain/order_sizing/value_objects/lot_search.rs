//! Lot Search Result Value Object

use serde::Serialize;

/// Outcome of a maximum-lots search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotSearchResult {
    /// Signed order size in strategy lots, relative to the group quantity.
    pub lots: i64,
    /// Impact evaluations spent.
    pub iterations: u32,
    /// False when the iteration cap cut the search short.
    pub converged: bool,
    /// Why the result is zero or not exact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LotSearchResult {
    /// An exact boundary was found.
    #[must_use]
    pub const fn found(lots: i64, iterations: u32) -> Self {
        Self {
            lots,
            iterations,
            converged: true,
            reason: None,
        }
    }

    /// A definitive answer that needs explaining.
    #[must_use]
    pub fn explained(lots: i64, iterations: u32, reason: impl Into<String>) -> Self {
        Self {
            lots,
            iterations,
            converged: true,
            reason: Some(reason.into()),
        }
    }

    /// The iteration cap was hit; `lots` is the best bound seen.
    #[must_use]
    pub fn capped(lots: i64, iterations: u32) -> Self {
        Self {
            lots,
            iterations,
            converged: false,
            reason: Some(format!("search stopped after {iterations} evaluations")),
        }
    }
}
