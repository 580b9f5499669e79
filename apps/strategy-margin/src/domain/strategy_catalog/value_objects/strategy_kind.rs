//! Strategy Kind Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::strategy_catalog::errors::StrategyCatalogError;

/// Closed set of recognized option strategies.
///
/// Serialized with the strategy name (e.g. `"IronCondor"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Short put spread plus short call spread, shared body strike.
    IronButterfly,
    /// Short put spread plus short call spread.
    IronCondor,
    /// Long 1-2-1 call butterfly.
    ButterflyCall,
    /// Long 1-2-1 put butterfly.
    ButterflyPut,
    /// Short 1-2-1 call butterfly.
    ShortButterflyCall,
    /// Short 1-2-1 put butterfly.
    ShortButterflyPut,
    /// Short lower call, long higher call (credit).
    BearCallSpread,
    /// Short lower put, long higher put (debit).
    BearPutSpread,
    /// Long lower call, short higher call (debit).
    BullCallSpread,
    /// Long lower put, short higher put (credit).
    BullPutSpread,
    /// Short near call, long far call at one strike.
    CallCalendarSpread,
    /// Long stock, short call.
    CoveredCall,
    /// Short stock, short put.
    CoveredPut,
    /// Short stock, long call.
    ProtectiveCall,
    /// Long stock, long put.
    ProtectivePut,
    /// Short near put, long far put at one strike.
    PutCalendarSpread,
    /// Long call and put at one strike.
    Straddle,
    /// Long lower put, long higher call.
    Strangle,
}

impl StrategyKind {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::IronButterfly,
        Self::IronCondor,
        Self::ButterflyCall,
        Self::ButterflyPut,
        Self::ShortButterflyCall,
        Self::ShortButterflyPut,
        Self::BearCallSpread,
        Self::BearPutSpread,
        Self::BullCallSpread,
        Self::BullPutSpread,
        Self::CallCalendarSpread,
        Self::CoveredCall,
        Self::CoveredPut,
        Self::ProtectiveCall,
        Self::ProtectivePut,
        Self::PutCalendarSpread,
        Self::Straddle,
        Self::Strangle,
    ];

    /// Strategy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IronButterfly => "IronButterfly",
            Self::IronCondor => "IronCondor",
            Self::ButterflyCall => "ButterflyCall",
            Self::ButterflyPut => "ButterflyPut",
            Self::ShortButterflyCall => "ShortButterflyCall",
            Self::ShortButterflyPut => "ShortButterflyPut",
            Self::BearCallSpread => "BearCallSpread",
            Self::BearPutSpread => "BearPutSpread",
            Self::BullCallSpread => "BullCallSpread",
            Self::BullPutSpread => "BullPutSpread",
            Self::CallCalendarSpread => "CallCalendarSpread",
            Self::CoveredCall => "CoveredCall",
            Self::CoveredPut => "CoveredPut",
            Self::ProtectiveCall => "ProtectiveCall",
            Self::ProtectivePut => "ProtectivePut",
            Self::PutCalendarSpread => "PutCalendarSpread",
            Self::Straddle => "Straddle",
            Self::Strangle => "Strangle",
        }
    }

    /// Check if the strategy spans more than one expiration.
    #[must_use]
    pub const fn is_calendar(self) -> bool {
        matches!(self, Self::CallCalendarSpread | Self::PutCalendarSpread)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StrategyCatalogError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_kind_display_matches_name() {
        assert_eq!(StrategyKind::IronCondor.to_string(), "IronCondor");
        assert_eq!(StrategyKind::ShortButterflyPut.to_string(), "ShortButterflyPut");
    }

    #[test]
    fn strategy_kind_from_str_is_case_insensitive() {
        assert_eq!(
            "coveredcall".parse::<StrategyKind>().unwrap(),
            StrategyKind::CoveredCall
        );
        assert_eq!(
            " Straddle ".parse::<StrategyKind>().unwrap(),
            StrategyKind::Straddle
        );
    }

    #[test]
    fn strategy_kind_from_str_unknown() {
        let Err(err) = "JadeLizard".parse::<StrategyKind>() else {
            panic!("expected unknown strategy");
        };
        assert!(err.to_string().contains("JadeLizard"));
    }

    #[test]
    fn strategy_kind_all_names_unique() {
        let mut names: Vec<&str> = StrategyKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), StrategyKind::ALL.len());
    }

    #[test]
    fn strategy_kind_serde() {
        let json = serde_json::to_string(&StrategyKind::BullPutSpread).unwrap();
        assert_eq!(json, "\"BullPutSpread\"");

        let parsed: StrategyKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StrategyKind::BullPutSpread);
    }
}
