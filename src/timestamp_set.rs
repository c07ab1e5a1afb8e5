// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sets of time points.

use crate::error::{Error, Result};
use crate::io::Deserializer;
use crate::period::Period;
use crate::time::{format_time, shift_time, truncate_to_millis, TimeDelta, TimePoint};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A sorted, de-duplicated, non-empty set of time points.
///
/// Each timestamp can also be seen as the closed single-instant period
/// `[t, t]`. The [`timespan`](Self::timespan) of a timestamp set is zero by
/// convention, even though its envelope [`period`](Self::period) may be
/// longer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampSet {
    timestamps: Vec<TimePoint>,
}

impl TimestampSet {
    pub fn new<I>(timestamps: I) -> Result<Self>
    where
        I: IntoIterator<Item = TimePoint>,
    {
        let timestamps: BTreeSet<TimePoint> =
            timestamps.into_iter().map(truncate_to_millis).collect();
        if timestamps.is_empty() {
            return Err(Error::Empty { what: "timestamp set" });
        }
        Ok(Self {
            timestamps: timestamps.into_iter().collect(),
        })
    }

    pub fn timestamps(&self) -> &[TimePoint] {
        &self.timestamps
    }

    pub fn num_timestamps(&self) -> usize {
        self.timestamps.len()
    }

    pub fn start_timestamp(&self) -> TimePoint {
        self.timestamps[0]
    }

    pub fn end_timestamp(&self) -> TimePoint {
        self.timestamps[self.timestamps.len() - 1]
    }

    pub fn timestamp_n(&self, n: usize) -> Result<TimePoint> {
        self.timestamps
            .get(n)
            .copied()
            .ok_or(Error::not_enough("timestamp", n + 1))
    }

    /// One closed single-instant period per timestamp.
    pub fn periods(&self) -> Vec<Period> {
        self.timestamps.iter().map(|t| Period::instant(*t)).collect()
    }

    pub fn num_periods(&self) -> usize {
        self.timestamps.len()
    }

    pub fn start_period(&self) -> Period {
        Period::instant(self.start_timestamp())
    }

    pub fn end_period(&self) -> Period {
        Period::instant(self.end_timestamp())
    }

    pub fn period_n(&self, n: usize) -> Result<Period> {
        self.timestamps
            .get(n)
            .map(|t| Period::instant(*t))
            .ok_or(Error::not_enough("period", n + 1))
    }

    /// Closed envelope `[start, end]`.
    pub fn period(&self) -> Period {
        Period::closed(self.start_timestamp(), self.end_timestamp())
    }

    /// Always zero.
    pub fn timespan(&self) -> TimeDelta {
        TimeDelta::zero()
    }

    pub fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(Self {
            timestamps: self
                .timestamps
                .iter()
                .map(|t| shift_time(*t, delta))
                .collect::<Result<_>>()?,
        })
    }
}

impl fmt::Display for TimestampSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, t) in self.timestamps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&format_time(*t))?;
        }
        f.write_str("}")
    }
}

impl FromStr for TimestampSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let set = de.next_timestamp_set()?;
        de.expect_end()?;
        Ok(set)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TimestampSet);
