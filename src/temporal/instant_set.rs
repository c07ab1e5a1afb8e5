// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sets of instants.

use super::{cmp_by_count, unify_srid, TInstant, Temporal, TemporalDuration};
use crate::base::BaseType;
use crate::error::{Error, Result};
use crate::geom::SRID_DEFAULT;
use crate::io::{write_srid_prefix, Deserializer};
use crate::period::Period;
use crate::period_set::PeriodSet;
use crate::range::Range;
use crate::time::{TimeDelta, TimePoint};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A non-empty, sorted, de-duplicated set of instants with one SRID.
///
/// An instant set has no interior: its [`period`](Temporal::period) is the
/// closed envelope of its timestamps and its timespan is zero.
#[derive(Debug, Clone)]
pub struct TInstantSet<T> {
    instants: Vec<TInstant<T>>,
}

impl<T: BaseType> TInstantSet<T> {
    pub fn new<I>(instants: I) -> Result<Self>
    where
        I: IntoIterator<Item = TInstant<T>>,
    {
        Self::with_srid(instants, SRID_DEFAULT)
    }

    /// Build a set whose members all share `srid`.
    ///
    /// Members without an SRID adopt the resolved one. Two different
    /// non-default SRIDs, between `srid` and a member or between members,
    /// are a conflict.
    pub fn with_srid<I>(instants: I, srid: i32) -> Result<Self>
    where
        I: IntoIterator<Item = TInstant<T>>,
    {
        let instants: Vec<TInstant<T>> = instants.into_iter().collect();
        if instants.is_empty() {
            return Err(Error::Empty { what: "instant set" });
        }
        let srid = unify_srid(srid, instants.iter().map(TInstant::srid))?;
        let instants: BTreeSet<TInstant<T>> = instants.iter().map(|i| i.to_srid(srid)).collect();
        Ok(Self {
            instants: instants.into_iter().collect(),
        })
    }

    /// Members in ascending order.
    pub fn members(&self) -> &[TInstant<T>] {
        &self.instants
    }

    /// The same set with every value placed under `srid`.
    pub fn to_srid(&self, srid: i32) -> Self {
        Self {
            instants: self.instants.iter().map(|i| i.to_srid(srid)).collect(),
        }
    }

    pub(crate) fn write_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, instant) in self.instants.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            instant.write_body(f)?;
        }
        f.write_str("}")
    }
}

impl<T: BaseType> Temporal for TInstantSet<T> {
    type Base = T;

    fn duration(&self) -> TemporalDuration {
        TemporalDuration::InstantSet
    }

    fn instants(&self) -> Vec<TInstant<T>> {
        self.instants.clone()
    }

    fn get_values(&self) -> BTreeSet<Range<T>> {
        self.instants
            .iter()
            .map(|i| Range::singleton(i.value().clone()))
            .collect()
    }

    fn get_time(&self) -> PeriodSet {
        PeriodSet::new(self.instants.iter().map(|i| i.period()))
            .unwrap_or_else(|_| PeriodSet::from_period(self.period()))
    }

    fn period(&self) -> Period {
        let first = self.instants[0].timestamp();
        let last = self.instants[self.instants.len() - 1].timestamp();
        Period::closed(first, last)
    }

    fn timespan(&self) -> TimeDelta {
        TimeDelta::zero()
    }

    fn timestamps(&self) -> BTreeSet<TimePoint> {
        self.instants.iter().map(TInstant::timestamp).collect()
    }

    fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(Self {
            instants: self
                .instants
                .iter()
                .map(|i| i.shift(delta))
                .collect::<Result<_>>()?,
        })
    }

    fn intersects_timestamp(&self, t: TimePoint) -> bool {
        self.timestamps().contains(&t)
    }

    fn intersects_period(&self, period: &Period) -> bool {
        self.timestamps()
            .iter()
            .any(|t| period.contains_timestamp(*t))
    }

    fn srid(&self) -> i32 {
        self.instants[0].srid()
    }
}

impl<T: BaseType> PartialEq for TInstantSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: BaseType> Eq for TInstantSet<T> {}

impl<T: BaseType> PartialOrd for TInstantSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: BaseType> Ord for TInstantSet<T> {
    /// Fewer instants first, then instant by instant.
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_by_count(&self.instants, &other.instants, TInstant::cmp)
    }
}

impl<T: BaseType> fmt::Display for TInstantSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_srid_prefix(f, self.srid())?;
        self.write_body(f)
    }
}

impl<T: BaseType> FromStr for TInstantSet<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let set = de.next_tinstant_set::<T>()?;
        de.expect_end()?;
        Ok(set)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TInstantSet<T>);
