// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::items_after_statements
    )
)]

//! Strategy Margin - Option Strategy Buying Power Engine
//!
//! Groups option and equity positions into recognized multi-leg
//! strategies, computes the margin each group ties up, decides whether
//! contemplated orders fit in the remaining buying power, and sizes orders
//! against a buying-power budget.
//!
//! # Architecture (Clean Architecture + DDD)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure business logic
//!   - `option_position`: Securities, OCC option contracts, positions
//!   - `strategy_catalog`: Strategy definitions in matching priority order
//!   - `position_grouping`: Greedy, deterministic group resolver
//!   - `buying_power`: Per-strategy margin formulas, impact, sufficiency
//!   - `order_sizing`: Maximum-lots search
//!
//! - **Application**: Scenario evaluation
//!   - `dto`: YAML scenario input and report output
//!   - `use_cases`: `EvaluateScenarioUseCase`
//!
//! # Data flow
//!
//! positions → resolver → groups → margin model → impact → lot search
//!
//! # Example
//!
//! ```rust,ignore
//! use strategy_margin::{BuyingPowerService, PortfolioSnapshot, resolve};
//!
//! let groups = resolve(snapshot.holdings());
//! let service = BuyingPowerService::default();
//! let used = service.total_margin_used(&snapshot)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and DTOs.
pub mod application;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Crate-level error codes.
pub mod error;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::buying_power::{
    BuyingPowerError, BuyingPowerService, BuyingPowerSufficiency, ComboOrderId,
    ContemplatedOrder, MarginBasis, PortfolioSnapshot, RegTSecurityMarginModel,
    ReservedBuyingPowerImpact, SecurityMarginModel,
};
pub use domain::option_position::{OptionContract, OptionRight, Position, Security};
pub use domain::order_sizing::{LotSearchResult, OrderQuantityCalculator};
pub use domain::position_grouping::{
    GroupBuyingPowerModel, PositionGroup, PositionGroupResolver, resolve,
};
pub use domain::shared::{Margin, Symbol};
pub use domain::strategy_catalog::{StrategyCatalog, StrategyDefinition, StrategyKind};

// Application re-exports
pub use application::use_cases::{EvaluateScenarioUseCase, load_scenario};

// Cross-cutting re-exports
pub use config::{Config, ConfigError, load_config};
pub use error::{ErrorCode, MarginEngineError};
