//! Buying Power Service
//!
//! Margins position groups and decides whether contemplated orders fit in
//! the remaining buying power.
//!
//! The impact of an order is measured on the affected slice of the
//! portfolio only: holdings that share an underlying with the group or the
//! orders are regrouped with and without the orders, and the difference
//! in reserved buying power is the order's cost. Shares already held can
//! therefore cover calls written against them.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use super::security_margin::{MarginBasis, RegTSecurityMarginModel, SecurityMarginModel};
use super::strategy_margin::StrategyMarginFormula;
use crate::config::MarginConfig;
use crate::domain::buying_power::errors::BuyingPowerError;
use crate::domain::buying_power::value_objects::{
    BuyingPowerSufficiency, ContemplatedOrder, PortfolioSnapshot, ReservedBuyingPowerImpact,
};
use crate::domain::option_position::Position;
use crate::domain::position_grouping::{PositionGroup, PositionGroupResolver};
use crate::domain::shared::{Margin, Symbol};

/// Group buying-power model family over a per-security fallback model.
#[derive(Debug, Clone)]
pub struct BuyingPowerService<M = RegTSecurityMarginModel> {
    security_model: M,
    config: MarginConfig,
    resolver: PositionGroupResolver,
}

impl BuyingPowerService<RegTSecurityMarginModel> {
    /// Service using the Reg T fallback with the configured rates.
    #[must_use]
    pub fn from_config(config: &MarginConfig) -> Self {
        Self::new(RegTSecurityMarginModel::new(config.clone()), config.clone())
    }
}

impl Default for BuyingPowerService<RegTSecurityMarginModel> {
    fn default() -> Self {
        Self::from_config(&MarginConfig::default())
    }
}

impl<M: SecurityMarginModel> BuyingPowerService<M> {
    /// Create a service over the given fallback model.
    #[must_use]
    pub fn new(security_model: M, config: MarginConfig) -> Self {
        Self {
            security_model,
            config,
            resolver: PositionGroupResolver::default(),
        }
    }

    /// Margin rates and buffer.
    #[must_use]
    pub const fn config(&self) -> &MarginConfig {
        &self.config
    }

    /// Resolver used to regroup holdings.
    #[must_use]
    pub const fn resolver(&self) -> &PositionGroupResolver {
        &self.resolver
    }

    /// Margin required to open the group.
    pub fn initial_margin_requirement(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
    ) -> Result<Margin, BuyingPowerError> {
        self.formula(portfolio, MarginBasis::Initial)
            .group_requirement(group)
    }

    /// Margin required to keep holding the group.
    pub fn maintenance_margin(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
    ) -> Result<Margin, BuyingPowerError> {
        self.formula(portfolio, MarginBasis::Maintenance)
            .group_requirement(group)
    }

    /// Buying power the group ties up: the larger of the two requirements.
    pub fn reserved_buying_power_for_group(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
    ) -> Result<Margin, BuyingPowerError> {
        let initial = self.initial_margin_requirement(portfolio, group)?;
        let maintenance = self.maintenance_margin(portfolio, group)?;
        Ok(initial.max(maintenance))
    }

    /// Reserved buying power of the affected holdings before and after the orders.
    pub fn reserved_buying_power_impact(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
        orders: &[ContemplatedOrder],
    ) -> Result<ReservedBuyingPowerImpact, BuyingPowerError> {
        portfolio.validate()?;
        validate_combo(orders)?;

        let affected: BTreeSet<&Symbol> = group
            .positions()
            .iter()
            .map(|p| p.security().underlying())
            .chain(orders.iter().map(|o| o.security().underlying()))
            .collect();
        let held: Vec<Position> = portfolio
            .holdings()
            .iter()
            .filter(|p| affected.contains(p.security().underlying()))
            .cloned()
            .collect();
        let mut contemplated_positions = held.clone();
        contemplated_positions.extend(orders.iter().map(ContemplatedOrder::to_position));

        let (current, _) = self.reserved_for_positions(portfolio, &held)?;
        let (contemplated, contemplated_groups) =
            self.reserved_for_positions(portfolio, &contemplated_positions)?;
        let impact = ReservedBuyingPowerImpact::new(current, contemplated, contemplated_groups);

        tracing::debug!(
            group = %group.model(),
            underlyings = affected.len(),
            held = held.len(),
            current = %impact.current,
            contemplated = %impact.contemplated,
            delta = %impact.delta,
            "Computed buying power impact"
        );
        Ok(impact)
    }

    /// Decide whether the orders fit in the remaining buying power.
    ///
    /// Orders that only shrink existing holdings, or that free margin, are
    /// always allowed.
    pub fn has_sufficient_buying_power_for_order(
        &self,
        portfolio: &PortfolioSnapshot,
        group: &PositionGroup,
        orders: &[ContemplatedOrder],
    ) -> Result<BuyingPowerSufficiency, BuyingPowerError> {
        let impact = self.reserved_buying_power_impact(portfolio, group, orders)?;

        if is_liquidation(portfolio, orders) {
            tracing::debug!(group = %group.model(), "Order only reduces holdings");
            return Ok(BuyingPowerSufficiency::sufficient());
        }
        if impact.delta.is_negative() {
            return Ok(BuyingPowerSufficiency::sufficient());
        }

        let available = self.available_buying_power(portfolio);
        if impact.delta <= available {
            return Ok(BuyingPowerSufficiency::sufficient());
        }

        tracing::info!(
            group = %group.model(),
            delta = %impact.delta,
            available = %available,
            "Insufficient buying power"
        );
        Ok(BuyingPowerSufficiency::insufficient(format!(
            "Insufficient buying power to complete order for {} group: margin delta {} exceeds available buying power {} (current {}, contemplated {})",
            group.model(),
            impact.delta,
            available,
            impact.current,
            impact.contemplated,
        )))
    }

    /// `total_portfolio_value × margin_buffer − total_margin_used`.
    #[must_use]
    pub fn available_buying_power(&self, portfolio: &PortfolioSnapshot) -> Margin {
        portfolio.margin_remaining(self.config.margin_buffer)
    }

    /// Reserved buying power of every holding, grouped.
    pub fn total_margin_used(&self, portfolio: &PortfolioSnapshot) -> Result<Margin, BuyingPowerError> {
        portfolio.validate()?;
        let (total, groups) = self.reserved_for_positions(portfolio, portfolio.holdings())?;
        tracing::debug!(groups = groups.len(), total = %total, "Computed total margin used");
        Ok(total)
    }

    fn reserved_for_positions(
        &self,
        portfolio: &PortfolioSnapshot,
        positions: &[Position],
    ) -> Result<(Margin, Vec<PositionGroup>), BuyingPowerError> {
        let groups = self.resolver.resolve(positions);
        let total = groups
            .iter()
            .map(|g| self.reserved_buying_power_for_group(portfolio, g))
            .sum::<Result<Margin, _>>()?;
        Ok((total, groups))
    }

    const fn formula<'a>(
        &'a self,
        portfolio: &'a PortfolioSnapshot,
        basis: MarginBasis,
    ) -> StrategyMarginFormula<'a, M> {
        StrategyMarginFormula {
            security: &self.security_model,
            config: &self.config,
            portfolio,
            basis,
        }
    }
}

/// Combo legs must all carry the same id.
fn validate_combo(orders: &[ContemplatedOrder]) -> Result<(), BuyingPowerError> {
    let ids: BTreeSet<_> = orders.iter().filter_map(ContemplatedOrder::combo_id).collect();
    if ids.len() > 1 {
        return Err(BuyingPowerError::InvalidOrder {
            message: format!("orders span {} combos", ids.len()),
        });
    }
    if let Some(id) = ids.first()
        && let Some(loose) = orders.iter().find(|o| o.combo_id().is_none())
    {
        return Err(BuyingPowerError::InvalidOrder {
            message: format!("{} is not part of {id}", loose.symbol()),
        });
    }
    Ok(())
}

/// Every netted order leg shrinks an existing holding without flipping it.
fn is_liquidation(portfolio: &PortfolioSnapshot, orders: &[ContemplatedOrder]) -> bool {
    let mut netted: BTreeMap<&Symbol, Decimal> = BTreeMap::new();
    for order in orders {
        *netted.entry(order.symbol()).or_default() += order.quantity();
    }
    netted.retain(|_, q| !q.is_zero());
    if netted.is_empty() {
        return false;
    }
    netted.into_iter().all(|(symbol, quantity)| {
        let held = portfolio.holding_quantity(symbol);
        !held.is_zero()
            && held.is_sign_negative() != quantity.is_sign_negative()
            && quantity.abs() <= held.abs()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::buying_power::value_objects::ComboOrderId;
    use crate::domain::option_position::{OptionContract, Security};
    use crate::domain::strategy_catalog::{StrategyCatalog, StrategyKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 19).unwrap()
    }

    fn service() -> BuyingPowerService {
        BuyingPowerService::from_config(&MarginConfig {
            equity_initial_rate: dec!(0.25),
            ..MarginConfig::default()
        })
    }

    fn covered_call_setup(tpv: Decimal) -> (PortfolioSnapshot, PositionGroup) {
        let call = OptionContract::call("SPY", dec!(300), expiry());
        let portfolio = PortfolioSnapshot::new(tpv)
            .with_price("SPY", dec!(395))
            .with_price(call.symbol().clone(), dec!(97));
        let def = StrategyCatalog::builtin().get(StrategyKind::CoveredCall).unwrap();
        let group =
            PositionGroup::from_legs(def, vec![Security::equity("SPY"), Security::from(call)], dec!(0))
                .unwrap();
        (portfolio, group)
    }

    #[test]
    fn reserved_is_max_of_initial_and_maintenance() {
        let (portfolio, group) = covered_call_setup(dec!(1_000_000));
        let service = BuyingPowerService::default();
        let group = group.with_quantity(dec!(1));

        let initial = service.initial_margin_requirement(&portfolio, &group).unwrap();
        let maintenance = service.maintenance_margin(&portfolio, &group).unwrap();
        assert!(maintenance <= initial);
        assert_eq!(
            service.reserved_buying_power_for_group(&portfolio, &group).unwrap(),
            initial
        );
    }

    #[test]
    fn impact_of_new_covered_call() {
        let (portfolio, group) = covered_call_setup(dec!(1_000_000));
        let orders = ContemplatedOrder::for_group_lots(&group, dec!(2), None);

        let impact = service()
            .reserved_buying_power_impact(&portfolio, &group, &orders)
            .unwrap();
        assert_eq!(impact.current, Margin::ZERO);
        assert_eq!(impact.contemplated, Margin::new(dec!(38750)));
        assert_eq!(impact.delta, Margin::new(dec!(38750)));
        assert_eq!(impact.contemplated_groups.len(), 1);
        assert_eq!(
            impact.contemplated_groups[0].strategy_kind(),
            Some(StrategyKind::CoveredCall)
        );
    }

    #[test]
    fn unaffected_holdings_are_ignored() {
        let (portfolio, group) = covered_call_setup(dec!(1_000_000));
        let portfolio = portfolio
            .with_price("QQQ", dec!(300))
            .with_holding(Position::new(Security::equity("QQQ"), dec!(1000)));
        let orders = ContemplatedOrder::for_group_lots(&group, dec!(1), None);

        let impact = service()
            .reserved_buying_power_impact(&portfolio, &group, &orders)
            .unwrap();
        assert_eq!(impact.current, Margin::ZERO);
        assert_eq!(impact.delta, Margin::new(dec!(19375)));
    }

    #[test]
    fn held_shares_cover_calls_written_against_them() {
        let (portfolio, _) = covered_call_setup(dec!(1_000_000));
        let portfolio = portfolio.with_holding(Position::new(Security::equity("SPY"), dec!(1000)));
        let call = OptionContract::call("SPY", dec!(300), expiry());
        let order = ContemplatedOrder::new(Security::from(call), dec!(-10));
        let group = PositionGroup::single(&order.to_position());

        // 1000 shares at 98,750 become ten covered calls at 193,750.
        let impact = service()
            .reserved_buying_power_impact(&portfolio, &group, &[order])
            .unwrap();
        assert_eq!(impact.current, Margin::new(dec!(98750)));
        assert_eq!(impact.contemplated, Margin::new(dec!(193750)));
        assert_eq!(impact.delta, Margin::new(dec!(95000)));
        assert_eq!(impact.contemplated_groups.len(), 1);
        assert_eq!(
            impact.contemplated_groups[0].strategy_kind(),
            Some(StrategyKind::CoveredCall)
        );
    }

    #[test]
    fn sufficiency_boundary() {
        // 19375 per lot against 997,500 available.
        let (portfolio, group) = covered_call_setup(dec!(1_000_000));
        let service = service();

        let fits = ContemplatedOrder::for_group_lots(&group, dec!(51), None);
        let result = service
            .has_sufficient_buying_power_for_order(&portfolio, &group, &fits)
            .unwrap();
        assert!(result.is_sufficient);

        let too_many = ContemplatedOrder::for_group_lots(&group, dec!(52), None);
        let result = service
            .has_sufficient_buying_power_for_order(&portfolio, &group, &too_many)
            .unwrap();
        assert!(!result.is_sufficient);
        let reason = result.reason.unwrap();
        assert!(reason.starts_with("Insufficient buying power to complete order for CoveredCall group"));
        assert!(reason.contains("$1007500.00"));
    }

    #[test]
    fn liquidation_is_always_allowed() {
        // Selling the stock leaves a naked call costing more than the covered call.
        let call = OptionContract::call("SPY", dec!(90), expiry());
        let portfolio = PortfolioSnapshot::new(dec!(100))
            .with_margin_used(dec!(3500))
            .with_price("SPY", dec!(100))
            .with_price(call.symbol().clone(), dec!(20))
            .with_holdings([
                Position::new(Security::equity("SPY"), dec!(100)),
                Position::new(Security::from(call.clone()), dec!(-1)),
            ]);
        let service = service();
        let def = StrategyCatalog::builtin().get(StrategyKind::CoveredCall).unwrap();
        let group =
            PositionGroup::from_legs(def, vec![Security::equity("SPY"), Security::from(call)], dec!(1))
                .unwrap();
        let orders = [ContemplatedOrder::new(Security::equity("SPY"), dec!(-100))];

        let impact = service
            .reserved_buying_power_impact(&portfolio, &group, &orders)
            .unwrap();
        assert_eq!(impact.current, Margin::new(dec!(3500)));
        assert_eq!(impact.contemplated, Margin::new(dec!(4000)));

        let result = service
            .has_sufficient_buying_power_for_order(&portfolio, &group, &orders)
            .unwrap();
        assert!(result.is_sufficient);
    }

    #[test]
    fn crossing_zero_is_not_liquidation() {
        let portfolio = PortfolioSnapshot::new(dec!(0))
            .with_margin_used(dec!(100))
            .with_price("SPY", dec!(100))
            .with_holding(Position::new(Security::equity("SPY"), dec!(10)));
        let orders = [ContemplatedOrder::new(Security::equity("SPY"), dec!(-20))];
        assert!(!is_liquidation(&portfolio, &orders));

        let group = PositionGroup::single(&Position::new(Security::equity("SPY"), dec!(10)));
        let result = service()
            .has_sufficient_buying_power_for_order(&portfolio, &group, &orders)
            .unwrap();
        assert!(!result.is_sufficient);
    }

    #[test]
    fn mixed_combo_ids_are_rejected() {
        let (portfolio, group) = covered_call_setup(dec!(1_000_000));
        let mut orders = ContemplatedOrder::for_group_lots(&group, dec!(1), Some(ComboOrderId::new(1)));
        orders[1] = orders[1].clone().with_combo(ComboOrderId::new(2));

        let Err(err) = service().reserved_buying_power_impact(&portfolio, &group, &orders) else {
            panic!("expected invalid order");
        };
        assert!(matches!(err, BuyingPowerError::InvalidOrder { .. }));

        let loose = vec![
            orders[0].clone(),
            ContemplatedOrder::new(Security::equity("SPY"), dec!(1)),
        ];
        assert!(service()
            .reserved_buying_power_impact(&portfolio, &group, &loose)
            .is_err());
    }

    #[test]
    fn invalid_snapshot_is_rejected() {
        let (portfolio, group) = covered_call_setup(dec!(1_000_000));
        let portfolio = portfolio.with_margin_used(dec!(-5));
        assert!(matches!(
            service().reserved_buying_power_impact(&portfolio, &group, &[]),
            Err(BuyingPowerError::InvalidSnapshot { .. })
        ));
    }

    #[test]
    fn total_margin_used_groups_holdings() {
        let (portfolio, _) = covered_call_setup(dec!(1_000_000));
        let call = OptionContract::call("SPY", dec!(300), expiry());
        let portfolio = portfolio.with_holdings([
            Position::new(Security::equity("SPY"), dec!(300)),
            Position::new(Security::from(call), dec!(-3)),
        ]);
        assert_eq!(
            service().total_margin_used(&portfolio).unwrap(),
            Margin::new(dec!(58125))
        );
    }

    #[test]
    fn available_buying_power_applies_buffer() {
        let portfolio = PortfolioSnapshot::new(dec!(10000)).with_margin_used(dec!(42000));
        assert_eq!(
            service().available_buying_power(&portfolio),
            Margin::new(dec!(-32025))
        );
    }
}
