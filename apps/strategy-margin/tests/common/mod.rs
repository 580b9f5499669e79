//! Shared strategy fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategy_margin::{
    OptionContract, PortfolioSnapshot, PositionGroup, Security, StrategyCatalog, StrategyKind,
};

pub fn near() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 19).unwrap()
}

pub fn far() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 16).unwrap()
}

pub fn call(strike: Decimal, expiry: NaiveDate) -> Security {
    OptionContract::call("SPY", strike, expiry).into()
}

pub fn put(strike: Decimal, expiry: NaiveDate) -> Security {
    OptionContract::put("SPY", strike, expiry).into()
}

/// Legs of `kind` on SPY at the 300/310/320/330 strikes, in template order.
pub fn legs(kind: StrategyKind) -> Vec<Security> {
    let (k1, k2, k3, k4) = (dec!(300), dec!(310), dec!(320), dec!(330));
    match kind {
        StrategyKind::CoveredCall | StrategyKind::ProtectiveCall => {
            vec![Security::equity("SPY"), call(k1, near())]
        }
        StrategyKind::CoveredPut | StrategyKind::ProtectivePut => {
            vec![Security::equity("SPY"), put(k1, near())]
        }
        StrategyKind::BullCallSpread | StrategyKind::BearCallSpread => {
            vec![call(k1, near()), call(k2, near())]
        }
        StrategyKind::BullPutSpread | StrategyKind::BearPutSpread => {
            vec![put(k1, near()), put(k2, near())]
        }
        StrategyKind::ButterflyCall | StrategyKind::ShortButterflyCall => {
            vec![call(k1, near()), call(k2, near()), call(k3, near())]
        }
        StrategyKind::ButterflyPut | StrategyKind::ShortButterflyPut => {
            vec![put(k1, near()), put(k2, near()), put(k3, near())]
        }
        StrategyKind::Straddle => vec![call(k2, near()), put(k2, near())],
        StrategyKind::Strangle => vec![put(k1, near()), call(k3, near())],
        StrategyKind::IronCondor => vec![
            put(k1, near()),
            put(k2, near()),
            call(k3, near()),
            call(k4, near()),
        ],
        StrategyKind::IronButterfly => vec![
            put(k1, near()),
            put(k2, near()),
            call(k2, near()),
            call(k3, near()),
        ],
        StrategyKind::CallCalendarSpread => vec![call(k2, near()), call(k2, far())],
        StrategyKind::PutCalendarSpread => vec![put(k2, near()), put(k2, far())],
    }
}

/// A `lots`-sized group of `kind` built from [`legs`].
pub fn group(kind: StrategyKind, lots: Decimal) -> PositionGroup {
    let definition = StrategyCatalog::builtin().get(kind).unwrap();
    PositionGroup::from_legs(definition, legs(kind), lots).unwrap()
}

/// SPY at `spot`, every contract priced at intrinsic value plus half a dollar
/// of time value (a dollar for the far expiry).
pub fn priced(spot: Decimal) -> PortfolioSnapshot {
    let mut snapshot = PortfolioSnapshot::new(dec!(1_000_000)).with_price("SPY", spot);
    for expiry in [near(), far()] {
        for strike in [dec!(300), dec!(310), dec!(320), dec!(330)] {
            for contract in [
                OptionContract::call("SPY", strike, expiry),
                OptionContract::put("SPY", strike, expiry),
            ] {
                let time_value = if expiry == far() { dec!(1) } else { dec!(0.5) };
                let price = contract.intrinsic_value(spot) + time_value;
                snapshot = snapshot.with_price(contract.symbol().clone(), price);
            }
        }
    }
    snapshot
}
