//! Strategy Margin Formulas
//!
//! One closed-form requirement per strategy, built on the per-security
//! fallback model. Every figure is capped at the additive fallback sum of
//! the group's legs, so grouping never costs more than margining the legs
//! one by one.

use rust_decimal::Decimal;

use super::security_margin::{MarginBasis, SecurityMarginModel};
use crate::config::MarginConfig;
use crate::domain::buying_power::errors::BuyingPowerError;
use crate::domain::buying_power::value_objects::PortfolioSnapshot;
use crate::domain::option_position::{OptionContract, Position};
use crate::domain::position_grouping::{PositionGroup, PositionGroupError};
use crate::domain::shared::Margin;
use crate::domain::strategy_catalog::{StrategyCatalog, StrategyKind};

/// Evaluates group requirements for one snapshot and basis.
pub(crate) struct StrategyMarginFormula<'a, M> {
    pub security: &'a M,
    pub config: &'a MarginConfig,
    pub portfolio: &'a PortfolioSnapshot,
    pub basis: MarginBasis,
}

impl<M: SecurityMarginModel> StrategyMarginFormula<'_, M> {
    /// Requirement of the whole group.
    pub fn group_requirement(&self, group: &PositionGroup) -> Result<Margin, BuyingPowerError> {
        let additive = self.additive(group.positions())?;
        let Some(kind) = group.strategy_kind() else {
            return Ok(additive);
        };

        // Negative lots of a one-directional strategy are its inverse.
        let kind = if group.quantity() < Decimal::ZERO {
            let definition = StrategyCatalog::builtin()
                .get(kind)
                .map_err(PositionGroupError::from)?;
            definition.inverse()
        } else {
            kind
        };

        let requirement = self.strategy_requirement(kind, group)?;
        Ok(requirement.min(additive).non_negative())
    }

    /// Sum of the fallback margins of the positions.
    pub fn additive(&self, positions: &[Position]) -> Result<Margin, BuyingPowerError> {
        positions.iter().map(|p| self.leg(p)).sum()
    }

    fn leg(&self, position: &Position) -> Result<Margin, BuyingPowerError> {
        self.security
            .margin_requirement(self.portfolio, position, self.basis)
    }

    #[allow(clippy::match_same_arms)]
    fn strategy_requirement(
        &self,
        kind: StrategyKind,
        group: &PositionGroup,
    ) -> Result<Margin, BuyingPowerError> {
        use StrategyKind as K;

        let legs = group.positions();
        let lots = group.quantity().abs();
        let long = group.quantity() > Decimal::ZERO;
        let multiplier = Decimal::from(group.multiplier());
        let width = |lo: usize, hi: usize| -> Result<Margin, BuyingPowerError> {
            let spread = option_of(kind, &legs[hi])?.strike() - option_of(kind, &legs[lo])?.strike();
            Ok(Margin::new(spread.abs() * multiplier * lots))
        };
        let floor = Margin::new(self.config.covered_minimum_per_lot * lots);

        let requirement = match kind {
            K::CoveredCall | K::CoveredPut => {
                let underlying = self.leg(&legs[0])?;
                let contract = option_of(kind, &legs[1])?;
                let spot = self.portfolio.price(contract.underlying())?;
                let in_the_money = Margin::new(contract.intrinsic_value(spot) * multiplier * lots);
                let naked = self.leg(&legs[1])?;
                (underlying + in_the_money.min(naked)).max(floor)
            }
            K::ProtectiveCall | K::ProtectivePut => self.leg(&legs[0])?.max(floor),
            K::BullCallSpread | K::BearPutSpread | K::ButterflyCall | K::ButterflyPut => {
                Margin::ZERO
            }
            K::BearCallSpread | K::BullPutSpread | K::ShortButterflyCall => width(0, 1)?,
            K::ShortButterflyPut => width(1, 2)?,
            K::Straddle | K::Strangle if long => Margin::ZERO,
            K::Straddle | K::Strangle => self.short_pair(kind, legs, multiplier, lots)?,
            K::CallCalendarSpread | K::PutCalendarSpread if long => Margin::ZERO,
            K::CallCalendarSpread | K::PutCalendarSpread => self.leg(&legs[1])?,
            K::IronCondor | K::IronButterfly if long => width(0, 1)?.max(width(2, 3)?),
            K::IronCondor | K::IronButterfly => Margin::ZERO,
        };
        Ok(requirement)
    }

    /// Short straddle or strangle: the larger naked leg plus the other leg's premium.
    fn short_pair(
        &self,
        kind: StrategyKind,
        legs: &[Position],
        multiplier: Decimal,
        lots: Decimal,
    ) -> Result<Margin, BuyingPowerError> {
        let (call, put) = if option_of(kind, &legs[0])?.is_call() {
            (&legs[0], &legs[1])
        } else {
            (&legs[1], &legs[0])
        };
        let naked_call = self.leg(call)?;
        let naked_put = self.leg(put)?;
        let (naked, other) = if naked_call >= naked_put {
            (naked_call, put)
        } else {
            (naked_put, call)
        };
        let premium = self.portfolio.price(other.symbol())?;
        Ok(naked + Margin::new(premium * multiplier * lots))
    }
}

fn option_of(kind: StrategyKind, position: &Position) -> Result<&OptionContract, BuyingPowerError> {
    position.security().as_option().ok_or_else(|| {
        PositionGroupError::invariant(
            kind.name(),
            format!("{} is not an option leg", position.symbol()),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::buying_power::services::security_margin::{
        MockSecurityMarginModel, RegTSecurityMarginModel,
    };
    use crate::domain::option_position::Security;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 19).unwrap()
    }

    fn far_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 16).unwrap()
    }

    fn call(strike: Decimal) -> OptionContract {
        OptionContract::call("SPY", strike, expiry())
    }

    fn put(strike: Decimal) -> OptionContract {
        OptionContract::put("SPY", strike, expiry())
    }

    /// Every leg priced, so any fallback lookup succeeds.
    fn snapshot(spot: Decimal, options: &[(&OptionContract, Decimal)]) -> PortfolioSnapshot {
        options.iter().fold(
            PortfolioSnapshot::new(dec!(1_000_000)).with_price("SPY", spot),
            |s, (c, price)| s.with_price(c.symbol().clone(), *price),
        )
    }

    fn group(kind: StrategyKind, legs: Vec<Security>, lots: Decimal) -> PositionGroup {
        let def = StrategyCatalog::builtin().get(kind).unwrap();
        PositionGroup::from_legs(def, legs, lots).unwrap()
    }

    fn requirement(
        portfolio: &PortfolioSnapshot,
        config: &MarginConfig,
        group: &PositionGroup,
    ) -> Margin {
        let model = RegTSecurityMarginModel::new(config.clone());
        StrategyMarginFormula {
            security: &model,
            config,
            portfolio,
            basis: MarginBasis::Initial,
        }
        .group_requirement(group)
        .unwrap()
    }

    fn quarter_equity() -> MarginConfig {
        MarginConfig {
            equity_initial_rate: dec!(0.25),
            ..MarginConfig::default()
        }
    }

    #[test]
    fn covered_call_charges_stock_plus_itm() {
        // 395 × 100 × 0.25 + min(95 × 100, naked)
        let c = call(dec!(300));
        let portfolio = snapshot(dec!(395), &[(&c, dec!(97))]);
        let group = group(
            StrategyKind::CoveredCall,
            vec![Security::equity("SPY"), Security::from(c)],
            dec!(1),
        );
        assert_eq!(
            requirement(&portfolio, &quarter_equity(), &group),
            Margin::new(dec!(19375))
        );
    }

    #[test]
    fn covered_call_respects_per_lot_floor() {
        // Stock at 10: 250 + 0 ITM is below the 2000 floor.
        let c = call(dec!(15));
        let portfolio = snapshot(dec!(10), &[(&c, dec!(0.1))]);
        let group = group(
            StrategyKind::CoveredCall,
            vec![Security::equity("SPY"), Security::from(c)],
            dec!(2),
        );
        // additive = 500 stock + naked (0.1 + max(2 − 5, 1)) × 100 × 2 = 220
        assert_eq!(
            requirement(&portfolio, &quarter_equity(), &group),
            Margin::new(dec!(720))
        );
    }

    #[test]
    fn protective_put_charges_stock_only() {
        let p = put(dec!(380));
        let portfolio = snapshot(dec!(400), &[(&p, dec!(3))]);
        let group = group(
            StrategyKind::ProtectivePut,
            vec![Security::equity("SPY"), Security::from(p)],
            dec!(1),
        );
        assert_eq!(
            requirement(&portfolio, &quarter_equity(), &group),
            Margin::new(dec!(10000))
        );
    }

    #[test_case(StrategyKind::BearCallSpread, dec!(1000) ; "bear call spread pays width")]
    #[test_case(StrategyKind::BullCallSpread, dec!(0) ; "bull call spread is paid for")]
    fn vertical_call_spreads(kind: StrategyKind, expected: Decimal) {
        let (low, high) = (call(dec!(300)), call(dec!(310)));
        let portfolio = snapshot(dec!(400), &[(&low, dec!(101)), (&high, dec!(91))]);
        let group = group(kind, vec![Security::from(low), Security::from(high)], dec!(1));
        assert_eq!(
            requirement(&portfolio, &MarginConfig::default(), &group),
            Margin::new(expected)
        );
    }

    #[test]
    fn negative_lots_margin_as_inverse() {
        // BullCallSpread x-1 holds the same legs as BearCallSpread x1.
        let (low, high) = (call(dec!(300)), call(dec!(310)));
        let portfolio = snapshot(dec!(400), &[(&low, dec!(101)), (&high, dec!(91))]);
        let group = group(
            StrategyKind::BullCallSpread,
            vec![Security::from(low), Security::from(high)],
            dec!(-3),
        );
        assert_eq!(
            requirement(&portfolio, &MarginConfig::default(), &group),
            Margin::new(dec!(3000))
        );
    }

    #[test]
    fn short_butterflies_use_one_wing() {
        let calls = [call(dec!(300)), call(dec!(310)), call(dec!(330))];
        let puts = [put(dec!(300)), put(dec!(320)), put(dec!(330))];
        let priced: Vec<(&OptionContract, Decimal)> =
            calls.iter().chain(&puts).map(|c| (c, dec!(1))).collect();
        let portfolio = snapshot(dec!(315), &priced);

        let call_fly = group(
            StrategyKind::ShortButterflyCall,
            calls.iter().cloned().map(Security::from).collect(),
            dec!(1),
        );
        let put_fly = group(
            StrategyKind::ShortButterflyPut,
            puts.iter().cloned().map(Security::from).collect(),
            dec!(1),
        );
        let config = MarginConfig::default();
        assert_eq!(requirement(&portfolio, &config, &call_fly), Margin::new(dec!(1000)));
        assert_eq!(requirement(&portfolio, &config, &put_fly), Margin::new(dec!(1000)));
    }

    #[test]
    fn short_straddle_adds_other_premium() {
        // naked call = naked put = (1 + 40) × 100 = 4100, plus 1 × 100 premium
        let (c, p) = (call(dec!(200)), put(dec!(200)));
        let portfolio = snapshot(dec!(200), &[(&c, dec!(1)), (&p, dec!(1))]);
        let straddle = group(
            StrategyKind::Straddle,
            vec![Security::from(c), Security::from(p)],
            dec!(-10),
        );
        let config = MarginConfig::default();
        assert_eq!(requirement(&portfolio, &config, &straddle), Margin::new(dec!(42000)));
        assert_eq!(
            requirement(&portfolio, &config, &straddle.with_quantity(dec!(10))),
            Margin::ZERO
        );
    }

    #[test]
    fn iron_condor_charges_wider_wing() {
        let legs = [put(dec!(300)), put(dec!(310)), call(dec!(320)), call(dec!(340))];
        let priced: Vec<(&OptionContract, Decimal)> = legs.iter().map(|c| (c, dec!(1))).collect();
        let portfolio = snapshot(dec!(410), &priced);
        let condor = group(
            StrategyKind::IronCondor,
            legs.iter().cloned().map(Security::from).collect(),
            dec!(2),
        );
        let config = MarginConfig::default();
        assert_eq!(requirement(&portfolio, &config, &condor), Margin::new(dec!(4000)));
        assert_eq!(
            requirement(&portfolio, &config, &condor.with_quantity(dec!(-2))),
            Margin::ZERO
        );
    }

    #[test]
    fn short_calendar_charges_far_leg() {
        let near = call(dec!(400));
        let far = OptionContract::call("SPY", dec!(400), far_expiry());
        let portfolio = snapshot(dec!(400), &[(&near, dec!(5)), (&far, dec!(8))]);
        let calendar = group(
            StrategyKind::CallCalendarSpread,
            vec![Security::from(near), Security::from(far)],
            dec!(-1),
        );
        // (8 + 80) × 100
        assert_eq!(
            requirement(&portfolio, &MarginConfig::default(), &calendar),
            Margin::new(dec!(8800))
        );
    }

    #[test]
    fn default_group_is_additive() {
        let mut model = MockSecurityMarginModel::new();
        model
            .expect_margin_requirement()
            .times(1)
            .returning(|_, _, _| Ok(Margin::new(dec!(123))));
        let config = MarginConfig::default();
        let portfolio = PortfolioSnapshot::default();
        let group = PositionGroup::single(&Position::new(Security::equity("SPY"), dec!(1)));

        let margin = StrategyMarginFormula {
            security: &model,
            config: &config,
            portfolio: &portfolio,
            basis: MarginBasis::Maintenance,
        }
        .group_requirement(&group)
        .unwrap();
        assert_eq!(margin, Margin::new(dec!(123)));
    }

    #[test]
    fn strategy_is_capped_by_additive() {
        // Legs margin to 10 each in isolation, far below the 1000 width.
        let mut model = MockSecurityMarginModel::new();
        model
            .expect_margin_requirement()
            .returning(|_, _, _| Ok(Margin::new(dec!(10))));
        let config = MarginConfig::default();
        let portfolio = PortfolioSnapshot::default();
        let spread = group(
            StrategyKind::BearCallSpread,
            vec![Security::from(call(dec!(300))), Security::from(call(dec!(310)))],
            dec!(1),
        );

        let margin = StrategyMarginFormula {
            security: &model,
            config: &config,
            portfolio: &portfolio,
            basis: MarginBasis::Initial,
        }
        .group_requirement(&spread)
        .unwrap();
        assert_eq!(margin, Margin::new(dec!(20)));
    }
}
