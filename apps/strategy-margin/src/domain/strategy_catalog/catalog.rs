//! Built-in strategy catalog.
//!
//! Definitions are stored in matching priority order: leg count
//! descending, then name ascending. The resolver walks them in exactly
//! this order, so grouping never depends on construction order.

use std::sync::OnceLock;

use super::errors::StrategyCatalogError;
use super::value_objects::{LegTemplate, StrategyDefinition, StrategyKind};

const IRON_BUTTERFLY: &[LegTemplate] = &[
    LegTemplate::put(0, 1),
    LegTemplate::put(1, -1),
    LegTemplate::call(1, -1),
    LegTemplate::call(2, 1),
];
const IRON_CONDOR: &[LegTemplate] = &[
    LegTemplate::put(0, 1),
    LegTemplate::put(1, -1),
    LegTemplate::call(2, -1),
    LegTemplate::call(3, 1),
];
const BUTTERFLY_CALL: &[LegTemplate] = &[
    LegTemplate::call(0, 1),
    LegTemplate::call(1, -2),
    LegTemplate::call(2, 1),
];
const BUTTERFLY_PUT: &[LegTemplate] = &[
    LegTemplate::put(0, 1),
    LegTemplate::put(1, -2),
    LegTemplate::put(2, 1),
];
const SHORT_BUTTERFLY_CALL: &[LegTemplate] = &[
    LegTemplate::call(0, -1),
    LegTemplate::call(1, 2),
    LegTemplate::call(2, -1),
];
const SHORT_BUTTERFLY_PUT: &[LegTemplate] = &[
    LegTemplate::put(0, -1),
    LegTemplate::put(1, 2),
    LegTemplate::put(2, -1),
];
const BEAR_CALL_SPREAD: &[LegTemplate] = &[LegTemplate::call(0, -1), LegTemplate::call(1, 1)];
const BEAR_PUT_SPREAD: &[LegTemplate] = &[LegTemplate::put(0, -1), LegTemplate::put(1, 1)];
const BULL_CALL_SPREAD: &[LegTemplate] = &[LegTemplate::call(0, 1), LegTemplate::call(1, -1)];
const BULL_PUT_SPREAD: &[LegTemplate] = &[LegTemplate::put(0, 1), LegTemplate::put(1, -1)];
const CALL_CALENDAR_SPREAD: &[LegTemplate] = &[
    LegTemplate::call(0, -1),
    LegTemplate::call(0, 1).expiring(1),
];
const PUT_CALENDAR_SPREAD: &[LegTemplate] = &[
    LegTemplate::put(0, -1),
    LegTemplate::put(0, 1).expiring(1),
];
const COVERED_CALL: &[LegTemplate] = &[LegTemplate::underlying(1), LegTemplate::call(0, -1)];
const COVERED_PUT: &[LegTemplate] = &[LegTemplate::underlying(-1), LegTemplate::put(0, -1)];
const PROTECTIVE_CALL: &[LegTemplate] = &[LegTemplate::underlying(-1), LegTemplate::call(0, 1)];
const PROTECTIVE_PUT: &[LegTemplate] = &[LegTemplate::underlying(1), LegTemplate::put(0, 1)];
const STRADDLE: &[LegTemplate] = &[LegTemplate::call(0, 1), LegTemplate::put(0, 1)];
const STRANGLE: &[LegTemplate] = &[LegTemplate::put(0, 1), LegTemplate::call(1, 1)];

fn builtin_definitions() -> Vec<StrategyDefinition> {
    use StrategyKind as K;

    vec![
        StrategyDefinition::new(K::IronButterfly, IRON_BUTTERFLY, K::IronButterfly),
        StrategyDefinition::new(K::IronCondor, IRON_CONDOR, K::IronCondor),
        StrategyDefinition::new(K::ButterflyCall, BUTTERFLY_CALL, K::ShortButterflyCall),
        StrategyDefinition::new(K::ButterflyPut, BUTTERFLY_PUT, K::ShortButterflyPut),
        StrategyDefinition::new(K::ShortButterflyCall, SHORT_BUTTERFLY_CALL, K::ButterflyCall),
        StrategyDefinition::new(K::ShortButterflyPut, SHORT_BUTTERFLY_PUT, K::ButterflyPut),
        StrategyDefinition::new(K::BearCallSpread, BEAR_CALL_SPREAD, K::BullCallSpread),
        StrategyDefinition::new(K::BearPutSpread, BEAR_PUT_SPREAD, K::BullPutSpread),
        StrategyDefinition::new(K::BullCallSpread, BULL_CALL_SPREAD, K::BearCallSpread),
        StrategyDefinition::new(K::BullPutSpread, BULL_PUT_SPREAD, K::BearPutSpread),
        StrategyDefinition::new(K::CallCalendarSpread, CALL_CALENDAR_SPREAD, K::CallCalendarSpread),
        StrategyDefinition::new(K::CoveredCall, COVERED_CALL, K::ProtectiveCall),
        StrategyDefinition::new(K::CoveredPut, COVERED_PUT, K::ProtectivePut),
        StrategyDefinition::new(K::ProtectiveCall, PROTECTIVE_CALL, K::CoveredCall),
        StrategyDefinition::new(K::ProtectivePut, PROTECTIVE_PUT, K::CoveredPut),
        StrategyDefinition::new(K::PutCalendarSpread, PUT_CALENDAR_SPREAD, K::PutCalendarSpread),
        StrategyDefinition::new(K::Straddle, STRADDLE, K::Straddle),
        StrategyDefinition::new(K::Strangle, STRANGLE, K::Strangle),
    ]
}

/// Immutable, process-wide registry of strategy definitions.
#[derive(Debug)]
pub struct StrategyCatalog {
    definitions: Vec<StrategyDefinition>,
}

impl StrategyCatalog {
    /// Build a catalog from definitions, sorting them into priority order.
    #[must_use]
    pub fn new(mut definitions: Vec<StrategyDefinition>) -> Self {
        definitions.sort_by(|a, b| {
            b.leg_count()
                .cmp(&a.leg_count())
                .then_with(|| a.name().cmp(b.name()))
        });
        Self { definitions }
    }

    /// The built-in catalog, created on first use.
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<StrategyCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self::new(builtin_definitions()))
    }

    /// Definitions in matching priority order.
    #[must_use]
    pub fn definitions(&self) -> &[StrategyDefinition] {
        &self.definitions
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a definition by kind.
    pub fn get(&self, kind: StrategyKind) -> Result<&StrategyDefinition, StrategyCatalogError> {
        self.definitions
            .iter()
            .find(|def| def.kind() == kind)
            .ok_or_else(|| StrategyCatalogError::UnknownStrategy {
                name: kind.name().to_string(),
            })
    }

    /// Look up a definition by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Result<&StrategyDefinition, StrategyCatalogError> {
        let kind: StrategyKind = name.parse()?;
        self.get(kind)
    }
}
