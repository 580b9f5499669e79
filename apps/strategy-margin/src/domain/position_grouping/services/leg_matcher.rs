//! Leg assignment for one strategy definition.
//!
//! Depth-first over residual positions in their sorted order, so the first
//! assignment found is always the same for the same residuals.
//!
//! Each leg first keeps only the residuals it admits on its own. The search
//! then walks those candidate lists, checking strike and expiry
//! ranks against the legs already chosen. With `c` candidates per leg and
//! `k` legs (at most four in the built-in catalog) one call costs
//! O(c^k) in the worst case, where `c` is bounded by the residuals on one
//! underlying.

use rust_decimal::Decimal;

use crate::domain::option_position::{OptionContract, Security};
use crate::domain::position_grouping::value_objects::{leg_unit, ranks_consistent};
use crate::domain::strategy_catalog::{LegTemplate, StrategyDefinition};

/// A position's unconsumed quantity during resolution.
#[derive(Debug, Clone)]
pub(crate) struct Residual {
    pub security: Security,
    pub quantity: Decimal,
}

/// Positions assigned to each leg (by residual index) and the lot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LegMatch {
    pub indices: Vec<usize>,
    pub lots: Decimal,
    pub multiplier: u32,
}

/// Finds the first complete assignment of `definition` with leg signs
/// multiplied by `sign` (±1) that supports at least one lot.
pub(crate) fn find_match(
    definition: &StrategyDefinition,
    sign: Decimal,
    residuals: &[Residual],
) -> Option<LegMatch> {
    let matcher = LegMatcher {
        legs: definition.legs(),
        sign,
        residuals,
    };
    let candidates: Vec<Vec<usize>> = matcher
        .legs
        .iter()
        .map(|leg| {
            residuals
                .iter()
                .enumerate()
                .filter(|(_, residual)| matcher.admits(leg, residual))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();
    if candidates.iter().any(Vec::is_empty) {
        return None;
    }
    let mut chosen = Vec::with_capacity(matcher.legs.len());
    matcher.assign(&candidates, &mut chosen)
}

struct LegMatcher<'a> {
    legs: &'static [LegTemplate],
    sign: Decimal,
    residuals: &'a [Residual],
}

impl LegMatcher<'_> {
    fn assign(&self, candidates: &[Vec<usize>], chosen: &mut Vec<usize>) -> Option<LegMatch> {
        let leg_index = chosen.len();
        if leg_index == self.legs.len() {
            return self.lots(chosen);
        }
        let leg = &self.legs[leg_index];
        for &i in &candidates[leg_index] {
            if chosen.contains(&i) || !self.consistent(leg, &self.residuals[i], chosen) {
                continue;
            }
            chosen.push(i);
            if let Some(found) = self.assign(candidates, chosen) {
                return Some(found);
            }
            chosen.pop();
        }
        None
    }

    /// Role, sign and size checks that do not depend on other legs.
    fn admits(&self, leg: &LegTemplate, residual: &Residual) -> bool {
        if residual.quantity.is_zero() || !leg.role.accepts(&residual.security) {
            return false;
        }
        let wanted = Decimal::from(leg.ratio) * self.sign;
        if residual.quantity.is_sign_negative() != wanted.is_sign_negative() {
            return false;
        }
        residual.security.as_option().is_none() || residual.quantity.abs() >= wanted.abs()
    }

    fn consistent(&self, leg: &LegTemplate, residual: &Residual, chosen: &[usize]) -> bool {
        let Some(contract) = residual.security.as_option() else {
            return true;
        };
        chosen.iter().enumerate().all(|(j, &idx)| {
            let Some(other) = self.residuals[idx].security.as_option() else {
                return true;
            };
            other.multiplier() == contract.multiplier()
                && ranks_consistent(&self.legs[j], other, leg, contract)
        })
    }

    fn lots(&self, chosen: &[usize]) -> Option<LegMatch> {
        let multiplier = chosen
            .iter()
            .find_map(|&i| self.residuals[i].security.as_option())
            .map(OptionContract::multiplier)?;

        let lots = self
            .legs
            .iter()
            .zip(chosen)
            .map(|(leg, &i)| {
                let per_lot = leg_unit(leg, multiplier).abs();
                (self.residuals[i].quantity.abs() / per_lot).floor()
            })
            .min()?;

        (lots >= Decimal::ONE).then(|| LegMatch {
            indices: chosen.to_vec(),
            lots,
            multiplier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy_catalog::{StrategyCatalog, StrategyKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 19).unwrap()
    }

    fn call(strike: Decimal, quantity: Decimal) -> Residual {
        Residual {
            security: Security::from(OptionContract::call("SPY", strike, expiry())),
            quantity,
        }
    }

    fn put(strike: Decimal, quantity: Decimal) -> Residual {
        Residual {
            security: Security::from(OptionContract::put("SPY", strike, expiry())),
            quantity,
        }
    }

    fn shares(quantity: Decimal) -> Residual {
        Residual {
            security: Security::equity("SPY"),
            quantity,
        }
    }

    fn definition(kind: StrategyKind) -> &'static StrategyDefinition {
        StrategyCatalog::builtin().get(kind).unwrap()
    }

    #[test]
    fn matches_bull_call_spread_with_min_lots() {
        let residuals = vec![call(dec!(300), dec!(5)), call(dec!(310), dec!(-3))];
        let found = find_match(definition(StrategyKind::BullCallSpread), Decimal::ONE, &residuals)
            .unwrap();
        assert_eq!(found.indices, vec![0, 1]);
        assert_eq!(found.lots, dec!(3));
    }

    #[test]
    fn negative_sign_matches_inverted_legs() {
        let residuals = vec![call(dec!(300), dec!(-2)), call(dec!(310), dec!(2))];
        assert!(
            find_match(definition(StrategyKind::BullCallSpread), Decimal::ONE, &residuals)
                .is_none()
        );
        let found = find_match(
            definition(StrategyKind::BullCallSpread),
            Decimal::NEGATIVE_ONE,
            &residuals,
        )
        .unwrap();
        assert_eq!(found.lots, dec!(2));
    }

    #[test]
    fn underlying_leg_counts_in_multiplier_units() {
        let residuals = vec![shares(dec!(250)), call(dec!(300), dec!(-5))];
        let found =
            find_match(definition(StrategyKind::CoveredCall), Decimal::ONE, &residuals).unwrap();
        assert_eq!(found.lots, dec!(2));
        assert_eq!(found.multiplier, 100);

        let too_few = vec![shares(dec!(99)), call(dec!(300), dec!(-5))];
        assert!(find_match(definition(StrategyKind::CoveredCall), Decimal::ONE, &too_few).is_none());
    }

    #[test]
    fn butterfly_needs_ratio_two_body() {
        let residuals = vec![
            call(dec!(300), dec!(1)),
            call(dec!(310), dec!(-1)),
            call(dec!(320), dec!(1)),
        ];
        assert!(
            find_match(definition(StrategyKind::ButterflyCall), Decimal::ONE, &residuals).is_none()
        );
    }

    #[test]
    fn straddle_requires_equal_strikes() {
        let residuals = vec![call(dec!(310), dec!(1)), put(dec!(300), dec!(1))];
        assert!(find_match(definition(StrategyKind::Straddle), Decimal::ONE, &residuals).is_none());
        assert!(find_match(definition(StrategyKind::Strangle), Decimal::ONE, &residuals).is_some());
    }

    #[test]
    fn missing_leg_role_ends_the_search() {
        // Forty long calls: every call leg has candidates, no put leg does.
        let residuals: Vec<Residual> = (0..40)
            .map(|i| call(Decimal::from(200 + 5 * i), dec!(3)))
            .collect();
        assert!(
            find_match(definition(StrategyKind::IronCondor), Decimal::ONE, &residuals).is_none()
        );
        assert!(
            find_match(definition(StrategyKind::ButterflyCall), Decimal::ONE, &residuals)
                .is_none()
        );
    }

    #[test]
    fn ladder_matches_lowest_strikes_first() {
        let mut residuals: Vec<Residual> = (0..20)
            .map(|i| call(Decimal::from(200 + 5 * i), dec!(2)))
            .collect();
        residuals.push(call(dec!(400), dec!(-2)));
        let found = find_match(definition(StrategyKind::BullCallSpread), Decimal::ONE, &residuals)
            .unwrap();
        assert_eq!(found.indices, vec![0, 20]);
        assert_eq!(found.lots, dec!(2));
    }
}
