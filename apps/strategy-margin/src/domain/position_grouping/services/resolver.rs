//! Position Group Resolver
//!
//! Partitions a flat set of positions into strategy groups and default
//! single-position groups.
//!
//! # Algorithm
//!
//! 1. Net duplicate securities and drop flat positions.
//! 2. Bucket by underlying (sorted); buckets resolve in parallel.
//! 3. Per bucket, scan the catalog in priority order trying each definition
//!    with its own sign, then the opposite sign. The first match consumes
//!    `k` lots from every leg and the scan restarts from the top.
//! 4. Whatever quantity is left becomes a default group per security.
//!
//! Matching is greedy; no subset search is attempted.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;

use super::leg_matcher::{LegMatch, Residual, find_match};
use crate::domain::option_position::{Position, Security};
use crate::domain::position_grouping::errors::PositionGroupError;
use crate::domain::position_grouping::value_objects::{PositionGroup, leg_unit};
use crate::domain::shared::Symbol;
use crate::domain::strategy_catalog::{StrategyCatalog, StrategyDefinition};

/// Resolves positions into position groups against a strategy catalog.
#[derive(Debug, Clone, Copy)]
pub struct PositionGroupResolver {
    catalog: &'static StrategyCatalog,
}

impl Default for PositionGroupResolver {
    fn default() -> Self {
        Self::new(StrategyCatalog::builtin())
    }
}

impl PositionGroupResolver {
    /// Create a resolver over the given catalog.
    #[must_use]
    pub const fn new(catalog: &'static StrategyCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog definitions are matched from.
    #[must_use]
    pub const fn catalog(&self) -> &'static StrategyCatalog {
        self.catalog
    }

    /// Resolve positions into groups.
    ///
    /// Total: every nonzero input quantity ends up in exactly one group, and
    /// the output depends only on the multiset of positions, not their order.
    #[must_use]
    pub fn resolve(&self, positions: &[Position]) -> Vec<PositionGroup> {
        let mut netted: BTreeMap<Symbol, Residual> = BTreeMap::new();
        for position in positions {
            netted
                .entry(position.symbol().clone())
                .and_modify(|r| r.quantity += position.quantity())
                .or_insert_with(|| Residual {
                    security: position.security().clone(),
                    quantity: position.quantity(),
                });
        }

        let mut buckets: BTreeMap<Symbol, Vec<Residual>> = BTreeMap::new();
        for residual in netted.into_values().filter(|r| !r.quantity.is_zero()) {
            buckets
                .entry(residual.security.underlying().clone())
                .or_default()
                .push(residual);
        }

        let buckets: Vec<(Symbol, Vec<Residual>)> = buckets.into_iter().collect();
        buckets
            .into_par_iter()
            .map(|(underlying, residuals)| self.resolve_underlying(&underlying, residuals))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    fn resolve_underlying(
        &self,
        underlying: &Symbol,
        mut residuals: Vec<Residual>,
    ) -> Vec<PositionGroup> {
        residuals.sort_by(|a, b| sort_key(&a.security).cmp(&sort_key(&b.security)));

        let mut groups = Vec::new();
        let pass_cap = (residuals.len() + 1) * self.catalog.len();
        let mut capped = true;

        for _ in 0..pass_cap {
            match self.next_group(&mut residuals) {
                None => {
                    capped = false;
                    break;
                }
                Some(Ok(group)) => {
                    tracing::debug!(
                        underlying = %underlying,
                        strategy = %group.model(),
                        quantity = %group.quantity(),
                        "Matched option strategy"
                    );
                    groups.push(group);
                }
                Some(Err(e)) => {
                    tracing::error!(
                        underlying = %underlying,
                        error = %e,
                        "Discarding inconsistent strategy match"
                    );
                    capped = false;
                    break;
                }
            }
        }
        if capped {
            tracing::warn!(
                underlying = %underlying,
                pass_cap,
                "Strategy matching hit its pass cap; remaining quantity grouped individually"
            );
        }

        groups.extend(
            residuals
                .iter()
                .filter(|r| !r.quantity.is_zero())
                .map(|r| PositionGroup::single(&Position::new(r.security.clone(), r.quantity))),
        );
        groups
    }

    /// First match in priority order, consumed from the residuals.
    fn next_group(
        &self,
        residuals: &mut [Residual],
    ) -> Option<Result<PositionGroup, PositionGroupError>> {
        for definition in self.catalog.definitions() {
            for sign in [Decimal::ONE, Decimal::NEGATIVE_ONE] {
                if let Some(found) = find_match(definition, sign, residuals) {
                    return Some(self.emit(definition, sign, &found, residuals));
                }
            }
        }
        None
    }

    /// Build the group for a match and consume its quantity from the residuals.
    fn emit(
        &self,
        matched: &StrategyDefinition,
        sign: Decimal,
        found: &LegMatch,
        residuals: &mut [Residual],
    ) -> Result<PositionGroup, PositionGroupError> {
        let (definition, quantity) = if sign.is_sign_positive() || matched.is_self_inverse() {
            (matched, found.lots * sign)
        } else {
            (self.catalog.get(matched.inverse())?, found.lots)
        };

        let positions: Vec<Position> = definition
            .legs()
            .iter()
            .zip(&found.indices)
            .map(|(leg, &i)| {
                let unit = leg_unit(leg, found.multiplier);
                Position::with_unit(residuals[i].security.clone(), quantity * unit, unit)
            })
            .collect();
        let group = PositionGroup::strategy(definition, quantity, positions)?;

        for (position, &i) in group.positions().iter().zip(&found.indices) {
            residuals[i].quantity -= position.quantity();
        }
        Ok(group)
    }
}

/// Equities first, then options by expiry, right, strike; symbol breaks ties.
fn sort_key(security: &Security) -> (u8, Option<chrono::NaiveDate>, u8, Decimal, &Symbol) {
    match security {
        Security::Equity { symbol } => (0, None, 0, Decimal::ZERO, symbol),
        Security::Option(c) => (
            1,
            Some(c.expiration()),
            u8::from(c.is_put()),
            c.strike(),
            c.symbol(),
        ),
        Security::Other { symbol } => (2, None, 0, Decimal::ZERO, symbol),
    }
}

/// Resolve positions with the built-in catalog.
#[must_use]
pub fn resolve(positions: &[Position]) -> Vec<PositionGroup> {
    PositionGroupResolver::default().resolve(positions)
}
