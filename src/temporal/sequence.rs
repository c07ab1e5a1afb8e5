// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sequences: instants joined by an interpolation over a period.

use super::{cmp_by_count, unify_srid, TInstant, Temporal, TemporalDuration};
use crate::base::{BaseType, Interpolation};
use crate::error::{Error, Result};
use crate::geom::SRID_DEFAULT;
use crate::io::{write_interp_prefix, write_srid_prefix, Deserializer};
use crate::period::Period;
use crate::period_set::PeriodSet;
use crate::range::Range;
use crate::time::{TimeDelta, TimePoint};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A value evolving continuously (or stepwise) between its instants.
///
/// Invariants:
/// - at least one instant;
/// - a single-timestamp sequence is closed on both sides;
/// - discrete base types are only interpolated [`Interpolation::Stepwise`];
/// - every value shares one SRID.
///
/// # Examples
///
/// ```
/// use tempval::{Interpolation, TSequence, Temporal};
///
/// let s: TSequence<f64> = "[1.5@2012-01-01, 2.5@2012-01-02)".parse().unwrap();
/// assert_eq!(s.interpolation(), Interpolation::Linear);
/// assert!(s.lower_inc() && !s.upper_inc());
/// assert_eq!(s.num_instants(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TSequence<T> {
    instants: Vec<TInstant<T>>,
    lower_inc: bool,
    upper_inc: bool,
    interpolation: Interpolation,
}

impl<T: BaseType> TSequence<T> {
    pub fn new<I>(
        instants: I,
        lower_inc: bool,
        upper_inc: bool,
        interpolation: Interpolation,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = TInstant<T>>,
    {
        Self::build(instants, lower_inc, upper_inc, interpolation, SRID_DEFAULT, true)
    }

    /// Build a sequence whose members all share `srid`.
    pub fn with_srid<I>(
        instants: I,
        lower_inc: bool,
        upper_inc: bool,
        interpolation: Interpolation,
        srid: i32,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = TInstant<T>>,
    {
        Self::build(instants, lower_inc, upper_inc, interpolation, srid, true)
    }

    /// Shared constructor. With `strict_bounds` off, a single-timestamp
    /// sequence may carry exclusive bounds, as the text form allows.
    pub(crate) fn build<I>(
        instants: I,
        lower_inc: bool,
        upper_inc: bool,
        interpolation: Interpolation,
        srid: i32,
        strict_bounds: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = TInstant<T>>,
    {
        let instants: Vec<TInstant<T>> = instants.into_iter().collect();
        if instants.is_empty() {
            return Err(Error::Empty { what: "sequence" });
        }
        if interpolation == Interpolation::Linear && T::DISCRETE {
            return Err(Error::DiscreteInterpolation);
        }
        let srid = unify_srid(srid, instants.iter().map(TInstant::srid))?;
        let instants: BTreeSet<TInstant<T>> = instants.iter().map(|i| i.to_srid(srid)).collect();
        let sequence = Self {
            instants: instants.into_iter().collect(),
            lower_inc,
            upper_inc,
            interpolation,
        };
        if strict_bounds && sequence.is_instantaneous() && !(lower_inc && upper_inc) {
            return Err(Error::InvalidBounds {
                reason: "the lower and upper bounds must be inclusive for an instant sequence",
            });
        }
        Ok(sequence)
    }

    fn first(&self) -> &TInstant<T> {
        &self.instants[0]
    }

    fn last(&self) -> &TInstant<T> {
        &self.instants[self.instants.len() - 1]
    }

    fn is_instantaneous(&self) -> bool {
        self.first().timestamp() == self.last().timestamp()
    }

    #[inline]
    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    #[inline]
    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Members in ascending order.
    pub fn members(&self) -> &[TInstant<T>] {
        &self.instants
    }

    /// The same sequence under another interpolation.
    pub fn with_interp(&self, interpolation: Interpolation) -> Result<Self> {
        if interpolation == Interpolation::Linear && T::DISCRETE {
            return Err(Error::DiscreteInterpolation);
        }
        Ok(Self {
            interpolation,
            ..self.clone()
        })
    }

    /// The same sequence with every value placed under `srid`.
    pub fn to_srid(&self, srid: i32) -> Self {
        Self {
            instants: self.instants.iter().map(|i| i.to_srid(srid)).collect(),
            ..self.clone()
        }
    }

    /// Bracketed instants, without any prefix.
    pub(crate) fn write_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.lower_inc { "[" } else { "(" })?;
        for (i, instant) in self.instants.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            instant.write_body(f)?;
        }
        f.write_str(if self.upper_inc { "]" } else { ")" })
    }
}

impl<T: BaseType> Temporal for TSequence<T> {
    type Base = T;

    fn duration(&self) -> TemporalDuration {
        TemporalDuration::Sequence
    }

    fn instants(&self) -> Vec<TInstant<T>> {
        self.instants.clone()
    }

    /// One range from the smallest to the largest value, with the
    /// sequence's own bound flags.
    fn get_values(&self) -> BTreeSet<Range<T>> {
        let values = self.instants.iter().map(TInstant::value);
        let min = values.clone().min_by(|a, b| a.compare(b));
        let max = values.max_by(|a, b| a.compare(b));
        match (min, max) {
            (Some(min), Some(max)) => BTreeSet::from([Range::new(
                min.clone(),
                max.clone(),
                self.lower_inc,
                self.upper_inc,
            )]),
            _ => BTreeSet::new(),
        }
    }

    fn get_time(&self) -> PeriodSet {
        PeriodSet::from_period(self.period())
    }

    /// `[start, end]` with the sequence's bound flags. A single-timestamp
    /// sequence always yields the closed instant period.
    fn period(&self) -> Period {
        let (start, end) = (self.first().timestamp(), self.last().timestamp());
        Period::new(start, end, self.lower_inc, self.upper_inc)
            .unwrap_or_else(|_| Period::closed(start, end))
    }

    fn timespan(&self) -> TimeDelta {
        self.last().timestamp() - self.first().timestamp()
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
            lower_inc: self.lower_inc,
            upper_inc: self.upper_inc,
            interpolation: self.interpolation,
        })
    }

    fn intersects_timestamp(&self, t: TimePoint) -> bool {
        self.period().contains_timestamp(t)
    }

    fn intersects_period(&self, period: &Period) -> bool {
        self.period().overlap(period)
    }

    fn srid(&self) -> i32 {
        self.first().srid()
    }
}

impl<T: BaseType> PartialEq for TSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: BaseType> Eq for TSequence<T> {}

impl<T: BaseType> PartialOrd for TSequence<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: BaseType> Ord for TSequence<T> {
    /// Fewer instants first. At equal count, bounds decide: an inclusive
    /// lower bound sorts first, then an exclusive upper bound. Then the
    /// instants, then the interpolation.
    fn cmp(&self, other: &Self) -> Ordering {
        self.instants
            .len()
            .cmp(&other.instants.len())
            .then(other.lower_inc.cmp(&self.lower_inc))
            .then(self.upper_inc.cmp(&other.upper_inc))
            .then_with(|| cmp_by_count(&self.instants, &other.instants, TInstant::cmp))
            .then(self.interpolation.cmp(&other.interpolation))
    }
}

impl<T: BaseType> fmt::Display for TSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_srid_prefix(f, self.srid())?;
        write_interp_prefix::<T>(f, self.interpolation)?;
        self.write_body(f)
    }
}

impl<T: BaseType> FromStr for TSequence<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let sequence = de.next_tsequence::<T>()?;
        de.expect_end()?;
        Ok(sequence)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TSequence<T>);
