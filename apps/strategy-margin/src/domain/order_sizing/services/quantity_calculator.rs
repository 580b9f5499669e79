//! Order Quantity Calculator
//!
//! Finds the largest order, in strategy lots, whose buying-power impact
//! stays within a budget.
//!
//! # Search
//!
//! Lots are counted in the group's margin-increasing direction (the sign of
//! the group quantity, long when flat). A non-negative budget grows the
//! group; a negative budget shrinks it toward zero and never past it, since
//! the strategy may invert there and use a different formula.
//!
//! 1. Measure the one-lot marginal rate.
//! 2. Estimate the answer linearly from that rate.
//! 3. Evaluate the real impact (full regrouping) at the estimate.
//! 4. Walk one lot at a time until the estimate fits and the next lot does not.
//!
//! A group whose first lot needs no margin has no rate to estimate from and
//! is walked up from one lot.
//!
//! Every evaluation counts against `max_search_iterations`. Hitting the cap
//! returns the largest count already shown to fit, unconverged.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::SizingConfig;
use crate::domain::buying_power::{
    BuyingPowerError, BuyingPowerService, ContemplatedOrder, PortfolioSnapshot,
    RegTSecurityMarginModel, SecurityMarginModel,
};
use crate::domain::order_sizing::value_objects::LotSearchResult;
use crate::domain::position_grouping::PositionGroup;

/// Sizes orders against a buying-power budget.
#[derive(Debug, Clone)]
pub struct OrderQuantityCalculator<'a, M = RegTSecurityMarginModel> {
    buying_power: &'a BuyingPowerService<M>,
    config: SizingConfig,
}

impl<'a, M: SecurityMarginModel> OrderQuantityCalculator<'a, M> {
    /// Create a calculator over a buying-power service.
    #[must_use]
    pub const fn new(buying_power: &'a BuyingPowerService<M>, config: SizingConfig) -> Self {
        Self {
            buying_power,
            config,
        }
    }

    /// Search limits in use.
    #[must_use]
    pub const fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Largest signed lot count whose impact delta stays at or below `target_delta`.
    ///
    /// Returns zero when one lot's initial margin is below
    /// `min_order_margin_pct × total_portfolio_value`.
    pub fn max_lots_for_delta_buying_power(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
        target_delta: Decimal,
        min_order_margin_pct: Decimal,
    ) -> Result<LotSearchResult, BuyingPowerError> {
        portfolio.validate()?;
        let direction: i64 = if group.quantity() < Decimal::ZERO { -1 } else { 1 };

        if min_order_margin_pct > Decimal::ZERO {
            let one_lot = self
                .buying_power
                .initial_margin_requirement(portfolio, &group.with_quantity(Decimal::from(direction)))?;
            let minimum = min_order_margin_pct * portfolio.total_portfolio_value();
            if one_lot.amount() < minimum {
                return Ok(LotSearchResult::explained(
                    0,
                    0,
                    format!(
                        "One lot of {} needs {one_lot}, below the minimum order margin of {}",
                        group.model(),
                        minimum.round_dp(2)
                    ),
                ));
            }
        }

        let mut trial = Trial {
            buying_power: self.buying_power,
            portfolio,
            group,
            direction,
            iterations: 0,
            cap: self.config.max_search_iterations,
        };

        let outcome = if target_delta >= Decimal::ZERO {
            grow(&mut trial, target_delta)?
        } else {
            shrink(&mut trial, group, target_delta)?
        };

        let result = match outcome {
            Outcome::Found(steps) => LotSearchResult::found(direction * steps, trial.iterations),
            Outcome::Explained(steps, reason) => {
                LotSearchResult::explained(direction * steps, trial.iterations, reason)
            }
            Outcome::Capped(steps) => {
                tracing::warn!(
                    group = %group.model(),
                    target = %target_delta,
                    iterations = trial.iterations,
                    best = direction * steps,
                    "Lot search hit iteration cap"
                );
                LotSearchResult::capped(direction * steps, trial.iterations)
            }
        };

        tracing::debug!(
            group = %group.model(),
            target = %target_delta,
            lots = result.lots,
            iterations = result.iterations,
            "Lot search finished"
        );
        Ok(result)
    }

    /// Largest signed lot count that brings the group's reserved buying power
    /// to `target_pct × total_portfolio_value`.
    pub fn max_lots_for_target_buying_power(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
        target_pct: Decimal,
        min_order_margin_pct: Decimal,
    ) -> Result<LotSearchResult, BuyingPowerError> {
        let target = target_pct * portfolio.total_portfolio_value();
        let reserved = self
            .buying_power
            .reserved_buying_power_for_group(portfolio, group)?;
        let delta = target - reserved.amount();
        tracing::debug!(
            group = %group.model(),
            target = %target,
            reserved = %reserved,
            delta = %delta,
            "Converted target buying power to delta"
        );
        self.max_lots_for_delta_buying_power(portfolio, group, delta, min_order_margin_pct)
    }
}

enum Outcome {
    Found(i64),
    Explained(i64, String),
    Capped(i64),
}

struct Trial<'a, M> {
    buying_power: &'a BuyingPowerService<M>,
    portfolio: &'a PortfolioSnapshot,
    group: &'a PositionGroup,
    direction: i64,
    iterations: u32,
    cap: u32,
}

impl<M: SecurityMarginModel> Trial<'_, M> {
    /// Impact delta of trading `steps` lots in the search direction; `None`
    /// once the evaluation budget is spent.
    fn delta(&mut self, steps: i64) -> Result<Option<Decimal>, BuyingPowerError> {
        if self.iterations >= self.cap {
            return Ok(None);
        }
        self.iterations += 1;
        let lots = Decimal::from(self.direction * steps);
        let orders = ContemplatedOrder::for_group_lots(self.group, lots, None);
        let impact = self
            .buying_power
            .reserved_buying_power_impact(self.portfolio, self.group, &orders)?;
        Ok(Some(impact.delta.amount()))
    }
}

/// Budget is non-negative: add lots in the search direction.
fn grow<M: SecurityMarginModel>(
    trial: &mut Trial<'_, M>,
    target: Decimal,
) -> Result<Outcome, BuyingPowerError> {
    let Some(unit) = trial.delta(1)? else {
        return Ok(Outcome::Capped(0));
    };
    if unit <= Decimal::ZERO {
        // No rate to estimate from: count up until a lot overshoots or the
        // evaluation budget runs out.
        return walk(trial, 1, 1, i64::MAX, target);
    }
    if unit > target {
        return Ok(Outcome::Explained(
            0,
            format!("One lot needs {unit}, more than the target {target}"),
        ));
    }

    let cap = i64::from(trial.cap);
    let estimate = target
        .checked_div(unit)
        .and_then(|q| q.floor().to_i64())
        .unwrap_or(cap)
        .max(1);
    walk(trial, estimate, 1, estimate.saturating_add(cap), target)
}

/// Budget is negative: remove lots, never crossing zero.
fn shrink<M: SecurityMarginModel>(
    trial: &mut Trial<'_, M>,
    group: &PositionGroup,
    target: Decimal,
) -> Result<Outcome, BuyingPowerError> {
    let held = group.quantity().abs().trunc().to_i64().unwrap_or_default();
    if held == 0 {
        return Ok(Outcome::Explained(
            0,
            "Group holds no lots to reduce".to_string(),
        ));
    }
    let lower = -held;

    let Some(freed) = trial.delta(-1)? else {
        return Ok(Outcome::Capped(lower));
    };
    let unit = -freed;
    let estimate = if unit <= Decimal::ZERO {
        lower
    } else {
        (-target)
            .checked_div(unit)
            .and_then(|q| q.ceil().to_i64())
            .map_or(lower, |needed| -needed)
    }
    .clamp(lower, -1);

    let Some(closed) = trial.delta(lower)? else {
        return Ok(Outcome::Capped(lower));
    };
    if closed > target {
        return Ok(Outcome::Explained(
            lower,
            format!("Closing all {held} lots changes margin by {closed}, short of the target {target}"),
        ));
    }
    walk(trial, estimate, lower, -1, target)
}

/// Step from `start` to the largest fitting count in `[lower, upper]`.
///
/// `lower` must already be known to fit.
fn walk<M: SecurityMarginModel>(
    trial: &mut Trial<'_, M>,
    start: i64,
    lower: i64,
    upper: i64,
    target: Decimal,
) -> Result<Outcome, BuyingPowerError> {
    let mut steps = start.clamp(lower, upper);
    if steps > lower {
        let Some(value) = trial.delta(steps)? else {
            return Ok(Outcome::Capped(lower));
        };
        if value > target {
            while steps > lower {
                steps -= 1;
                if steps == lower {
                    break;
                }
                let Some(value) = trial.delta(steps)? else {
                    return Ok(Outcome::Capped(lower));
                };
                if value <= target {
                    break;
                }
            }
            return Ok(Outcome::Found(steps));
        }
    }

    while steps < upper {
        let Some(next) = trial.delta(steps + 1)? else {
            return Ok(Outcome::Capped(steps));
        };
        if next > target {
            break;
        }
        steps += 1;
    }
    Ok(Outcome::Found(steps))
}
