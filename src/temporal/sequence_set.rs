// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sets of sequences sharing one interpolation.

use super::{cmp_by_count, unify_srid, TInstant, TSequence, Temporal, TemporalDuration};
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

/// A non-empty, sorted set of sequences.
///
/// The set owns the interpolation: every member reports the same one, and
/// the text form carries it once as a set-level prefix.
///
/// # Examples
///
/// ```
/// use tempval::{Interpolation, TSequenceSet, Temporal};
///
/// let s: TSequenceSet<f64> =
///     "Interp=Stepwise;{[10@2012-01-01], [20@2012-01-02, 10@2012-01-03]}".parse().unwrap();
/// assert_eq!(s.interpolation(), Interpolation::Stepwise);
/// assert_eq!(s.num_sequences(), 2);
/// assert_eq!(s.num_instants(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TSequenceSet<T> {
    sequences: Vec<TSequence<T>>,
    interpolation: Interpolation,
}

impl<T: BaseType> TSequenceSet<T> {
    /// Build a set taking the interpolation from its members, which must
    /// agree on it.
    pub fn new<I>(sequences: I) -> Result<Self>
    where
        I: IntoIterator<Item = TSequence<T>>,
    {
        Self::build(sequences, None, SRID_DEFAULT)
    }

    /// Build a set under `interpolation`, converting every member to it.
    pub fn with_interpolation<I>(sequences: I, interpolation: Interpolation) -> Result<Self>
    where
        I: IntoIterator<Item = TSequence<T>>,
    {
        Self::build(sequences, Some(interpolation), SRID_DEFAULT)
    }

    /// Build a set whose members all share `srid`.
    pub fn with_srid<I>(sequences: I, srid: i32) -> Result<Self>
    where
        I: IntoIterator<Item = TSequence<T>>,
    {
        Self::build(sequences, None, srid)
    }

    pub(crate) fn build<I>(
        sequences: I,
        interpolation: Option<Interpolation>,
        srid: i32,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = TSequence<T>>,
    {
        let sequences: Vec<TSequence<T>> = sequences.into_iter().collect();
        let Some(first) = sequences.first() else {
            return Err(Error::Empty { what: "sequence set" });
        };
        let interpolation = match interpolation {
            Some(interpolation) => {
                tracing::trace!(%interpolation, "normalizing sequence set members");
                interpolation
            }
            None => {
                let interpolation = first.interpolation();
                if sequences.iter().any(|s| s.interpolation() != interpolation) {
                    return Err(Error::MixedInterpolation);
                }
                interpolation
            }
        };
        let srid = unify_srid(srid, sequences.iter().map(|s| s.srid()))?;
        let sequences = sequences
            .iter()
            .map(|s| s.with_interp(interpolation).map(|s| s.to_srid(srid)))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self {
            sequences: sequences.into_iter().collect(),
            interpolation,
        })
    }

    /// Members in ascending order.
    pub fn sequences(&self) -> &[TSequence<T>] {
        &self.sequences
    }

    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    pub fn start_sequence(&self) -> &TSequence<T> {
        &self.sequences[0]
    }

    pub fn end_sequence(&self) -> &TSequence<T> {
        &self.sequences[self.sequences.len() - 1]
    }

    /// The `n`-th member, zero-based.
    pub fn sequence_n(&self, n: usize) -> Result<&TSequence<T>> {
        self.sequences
            .get(n)
            .ok_or(Error::not_enough("sequence", n + 1))
    }

    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// The same set, members included, under another interpolation.
    pub fn with_interp(&self, interpolation: Interpolation) -> Result<Self> {
        Self::build(self.sequences.iter().cloned(), Some(interpolation), self.srid())
    }

    /// The same set with every value placed under `srid`.
    pub fn to_srid(&self, srid: i32) -> Self {
        Self {
            sequences: self.sequences.iter().map(|s| s.to_srid(srid)).collect(),
            interpolation: self.interpolation,
        }
    }
}

impl<T: BaseType> Temporal for TSequenceSet<T> {
    type Base = T;

    fn duration(&self) -> TemporalDuration {
        TemporalDuration::SequenceSet
    }

    fn instants(&self) -> Vec<TInstant<T>> {
        let instants: BTreeSet<TInstant<T>> = self
            .sequences
            .iter()
            .flat_map(|s| s.members().iter().cloned())
            .collect();
        instants.into_iter().collect()
    }

    fn get_values(&self) -> BTreeSet<Range<T>> {
        self.sequences.iter().flat_map(|s| s.get_values()).collect()
    }

    fn get_time(&self) -> PeriodSet {
        PeriodSet::new(self.sequences.iter().map(|s| s.period()))
            .unwrap_or_else(|_| PeriodSet::from_period(self.period()))
    }

    /// Closed envelope from the earliest to the latest member timestamp.
    ///
    /// Members sort by instant count first, so the extremes are taken over
    /// every member rather than from the first and last one.
    fn period(&self) -> Period {
        let timestamps = self.timestamps();
        match (timestamps.first(), timestamps.last()) {
            (Some(start), Some(end)) => Period::closed(*start, *end),
            _ => self.start_sequence().period(),
        }
    }

    /// Sum of the member timespans.
    fn timespan(&self) -> TimeDelta {
        self.sequences
            .iter()
            .fold(TimeDelta::zero(), |acc, s| acc + s.timespan())
    }

    fn timestamps(&self) -> BTreeSet<TimePoint> {
        self.sequences.iter().flat_map(|s| s.timestamps()).collect()
    }

    fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(Self {
            sequences: self
                .sequences
                .iter()
                .map(|s| s.shift(delta))
                .collect::<Result<_>>()?,
            interpolation: self.interpolation,
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
        self.start_sequence().srid()
    }
}

impl<T: BaseType> PartialEq for TSequenceSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: BaseType> Eq for TSequenceSet<T> {}

impl<T: BaseType> PartialOrd for TSequenceSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: BaseType> Ord for TSequenceSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_by_count(&self.sequences, &other.sequences, TSequence::cmp)
            .then(self.interpolation.cmp(&other.interpolation))
    }
}

impl<T: BaseType> fmt::Display for TSequenceSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_srid_prefix(f, self.srid())?;
        write_interp_prefix::<T>(f, self.interpolation)?;
        f.write_str("{")?;
        for (i, sequence) in self.sequences.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            sequence.write_body(f)?;
        }
        f.write_str("}")
    }
}

impl<T: BaseType> FromStr for TSequenceSet<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let set = de.next_tsequence_set::<T>()?;
        de.expect_end()?;
        Ok(set)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TSequenceSet<T>);
