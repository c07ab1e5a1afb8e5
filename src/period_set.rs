// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sets of periods.

use crate::error::{Error, Result};
use crate::io::Deserializer;
use crate::period::Period;
use crate::time::{TimeDelta, TimePoint};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A sorted, de-duplicated, non-empty set of periods.
///
/// Member periods may overlap; nothing is merged. [`period`](Self::period)
/// is the envelope across all members and [`timespan`](Self::timespan) the
/// sum of the member spans.
///
/// Sets compare lexicographically by their sorted members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodSet {
    periods: Vec<Period>,
}

impl PeriodSet {
    /// Build a set from any collection of periods.
    pub fn new<I>(periods: I) -> Result<Self>
    where
        I: IntoIterator<Item = Period>,
    {
        let periods: BTreeSet<Period> = periods.into_iter().collect();
        if periods.is_empty() {
            return Err(Error::Empty { what: "period set" });
        }
        Ok(Self {
            periods: periods.into_iter().collect(),
        })
    }

    /// The set holding a single period.
    pub fn from_period(period: Period) -> Self {
        Self {
            periods: vec![period],
        }
    }

    /// Members in ascending order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    pub fn start_period(&self) -> Period {
        self.periods[0]
    }

    pub fn end_period(&self) -> Period {
        self.periods[self.periods.len() - 1]
    }

    /// The `n`-th member, zero-based.
    pub fn period_n(&self, n: usize) -> Result<Period> {
        self.periods
            .get(n)
            .copied()
            .ok_or(Error::not_enough("period", n + 1))
    }

    /// Envelope from the earliest lower bound to the latest upper bound.
    pub fn period(&self) -> Period {
        Period::envelope(&self.periods).unwrap_or(self.periods[0])
    }

    /// Sum of the member spans. Overlapping members are counted twice.
    pub fn timespan(&self) -> TimeDelta {
        self.periods
            .iter()
            .fold(TimeDelta::zero(), |acc, p| acc + p.timespan())
    }

    /// Translate every member by `delta`.
    pub fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(Self {
            periods: self
                .periods
                .iter()
                .map(|p| p.shift(delta))
                .collect::<Result<_>>()?,
        })
    }

    /// All member bounds, lower and upper.
    pub fn timestamps(&self) -> BTreeSet<TimePoint> {
        self.periods
            .iter()
            .flat_map(|p| [p.lower(), p.upper()])
            .collect()
    }

    pub fn num_timestamps(&self) -> usize {
        self.timestamps().len()
    }

    pub fn start_timestamp(&self) -> TimePoint {
        self.periods[0].lower()
    }

    pub fn end_timestamp(&self) -> TimePoint {
        self.period().upper()
    }

    /// The `n`-th distinct bound, zero-based.
    pub fn timestamp_n(&self, n: usize) -> Result<TimePoint> {
        self.timestamps()
            .into_iter()
            .nth(n)
            .ok_or(Error::not_enough("timestamp", n + 1))
    }
}

impl fmt::Display for PeriodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, period) in self.periods.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{period}")?;
        }
        f.write_str("}")
    }
}

impl FromStr for PeriodSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let set = de.next_period_set()?;
        de.expect_end()?;
        Ok(set)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(PeriodSet);
