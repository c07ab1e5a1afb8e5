// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Temporal values.
//!
//! A temporal value is a base value that changes over time. It comes in four
//! shapes, its *duration*:
//!
//! | Type | Text form |
//! |------|-----------|
//! | [`TInstant<T>`] | `10@2012-11-01T00:00:00+0000` |
//! | [`TInstantSet<T>`] | `{10@2012-11-01T00:00:00+0000, 12@2012-11-02T00:00:00+0000}` |
//! | [`TSequence<T>`] | `[10@2012-11-01T00:00:00+0000, 12@2012-11-02T00:00:00+0000)` |
//! | [`TSequenceSet<T>`] | `{[10@2012-11-01T00:00:00+0000], [12@2012-11-02T00:00:00+0000]}` |
//!
//! All four implement the [`Temporal`] capability trait. Accessors that only
//! depend on the ordered list of instants (`start_value`, `instant_n`,
//! `min_value`, ...) are provided once by the trait.
//!
//! [`TemporalValue<T>`] is the closed union of the four shapes, returned by
//! the text reader when the shape is not known in advance. Values of
//! different shapes never compare; see [`TemporalValue::try_cmp`].

mod instant;
mod instant_set;
mod sequence;
mod sequence_set;

pub use instant::TInstant;
pub use instant_set::TInstantSet;
pub use sequence::TSequence;
pub use sequence_set::TSequenceSet;

use crate::base::BaseType;
use crate::error::{Error, Result};
use crate::geom::{resolve_srid, SRID_DEFAULT};
use crate::io::Deserializer;
use crate::period::Period;
use crate::period_set::PeriodSet;
use crate::range::Range;
use crate::time::{TimeDelta, TimePoint};
use crate::timestamp_set::TimestampSet;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════
// Duration tag
// ═══════════════════════════════════════════════════════════════════════════

/// The shape of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemporalDuration {
    Instant,
    InstantSet,
    Sequence,
    SequenceSet,
}

impl fmt::Display for TemporalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemporalDuration::Instant => "Instant",
            TemporalDuration::InstantSet => "InstantSet",
            TemporalDuration::Sequence => "Sequence",
            TemporalDuration::SequenceSet => "SequenceSet",
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Capability trait
// ═══════════════════════════════════════════════════════════════════════════

/// Operations shared by every temporal shape.
pub trait Temporal {
    /// The value carried over time.
    type Base: BaseType;

    fn duration(&self) -> TemporalDuration;

    /// Every instant, in ascending order and without duplicates.
    fn instants(&self) -> Vec<TInstant<Self::Base>>;

    /// Value envelope, as one or more ranges.
    fn get_values(&self) -> BTreeSet<Range<Self::Base>>;

    /// Time covered, as a set of periods.
    fn get_time(&self) -> PeriodSet;

    /// Envelope period.
    fn period(&self) -> Period;

    fn timespan(&self) -> TimeDelta;

    fn timestamps(&self) -> BTreeSet<TimePoint>;

    /// The same value with every timestamp translated by `delta`.
    ///
    /// Fails with [`Error::TimeOverflow`] when a timestamp leaves the
    /// representable range.
    fn shift(&self, delta: TimeDelta) -> Result<Self>
    where
        Self: Sized;

    fn intersects_timestamp(&self, t: TimePoint) -> bool;

    fn intersects_period(&self, period: &Period) -> bool;

    fn intersects_timestamp_set(&self, set: &TimestampSet) -> bool {
        set.timestamps().iter().any(|t| self.intersects_timestamp(*t))
    }

    fn intersects_period_set(&self, set: &PeriodSet) -> bool {
        set.periods().iter().any(|p| self.intersects_period(p))
    }

    // ── instant accessors ───────────────────────────────────────────────

    fn num_instants(&self) -> usize {
        self.instants().len()
    }

    fn start_instant(&self) -> Result<TInstant<Self::Base>> {
        self.instant_n(0)
    }

    fn end_instant(&self) -> Result<TInstant<Self::Base>> {
        self.instants()
            .pop()
            .ok_or(Error::not_enough("instant", 1))
    }

    /// The `n`-th instant, zero-based.
    fn instant_n(&self, n: usize) -> Result<TInstant<Self::Base>> {
        self.instants()
            .into_iter()
            .nth(n)
            .ok_or(Error::not_enough("instant", n + 1))
    }

    // ── value accessors ─────────────────────────────────────────────────

    fn start_value(&self) -> Result<Self::Base> {
        Ok(self.start_instant()?.value().clone())
    }

    fn end_value(&self) -> Result<Self::Base> {
        Ok(self.end_instant()?.value().clone())
    }

    fn value_n(&self, n: usize) -> Result<Self::Base> {
        Ok(self.instant_n(n)?.value().clone())
    }

    /// Smallest lower bound across [`get_values`](Self::get_values).
    fn min_value(&self) -> Result<Self::Base> {
        self.get_values()
            .iter()
            .map(Range::lower)
            .min_by(|a, b| a.compare(b))
            .cloned()
            .ok_or(Error::not_enough("value", 1))
    }

    /// Largest upper bound across [`get_values`](Self::get_values).
    fn max_value(&self) -> Result<Self::Base> {
        self.get_values()
            .iter()
            .map(Range::upper)
            .max_by(|a, b| a.compare(b))
            .cloned()
            .ok_or(Error::not_enough("value", 1))
    }

    // ── timestamp accessors ─────────────────────────────────────────────

    fn num_timestamps(&self) -> usize {
        self.timestamps().len()
    }

    fn start_timestamp(&self) -> Result<TimePoint> {
        self.timestamp_n(0)
    }

    fn end_timestamp(&self) -> Result<TimePoint> {
        self.timestamps()
            .last()
            .copied()
            .ok_or(Error::not_enough("timestamp", 1))
    }

    fn timestamp_n(&self, n: usize) -> Result<TimePoint> {
        self.timestamps()
            .into_iter()
            .nth(n)
            .ok_or(Error::not_enough("timestamp", n + 1))
    }

    /// SRID shared by every value, [`SRID_DEFAULT`] for non-spatial types.
    fn srid(&self) -> i32 {
        self.instants()
            .first()
            .map_or(SRID_DEFAULT, TInstant::srid)
    }
}

/// Resolve the single SRID of a container from an explicit SRID and the
/// SRIDs of its members.
pub(crate) fn unify_srid<I>(explicit: i32, members: I) -> Result<i32>
where
    I: IntoIterator<Item = i32>,
{
    let srid = members
        .into_iter()
        .try_fold(explicit, |acc, found| resolve_srid(acc, found))?;
    if srid != explicit {
        tracing::debug!(srid, "adopting SRID found in members");
    }
    Ok(srid)
}

/// Lexicographic comparison of two slices under `cmp`, shorter first.
pub(crate) fn cmp_by_count<A, F>(lhs: &[A], rhs: &[A], mut cmp: F) -> Ordering
where
    F: FnMut(&A, &A) -> Ordering,
{
    lhs.len().cmp(&rhs.len()).then_with(|| {
        lhs.iter()
            .zip(rhs)
            .map(|(a, b)| cmp(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Closed union
// ═══════════════════════════════════════════════════════════════════════════

/// A temporal value of any shape.
#[derive(Debug, Clone)]
pub enum TemporalValue<T> {
    Instant(TInstant<T>),
    InstantSet(TInstantSet<T>),
    Sequence(TSequence<T>),
    SequenceSet(TSequenceSet<T>),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            TemporalValue::Instant($v) => $body,
            TemporalValue::InstantSet($v) => $body,
            TemporalValue::Sequence($v) => $body,
            TemporalValue::SequenceSet($v) => $body,
        }
    };
}

impl<T: BaseType> TemporalValue<T> {
    pub fn as_instant(&self) -> Option<&TInstant<T>> {
        match self {
            TemporalValue::Instant(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_instant_set(&self) -> Option<&TInstantSet<T>> {
        match self {
            TemporalValue::InstantSet(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&TSequence<T>> {
        match self {
            TemporalValue::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence_set(&self) -> Option<&TSequenceSet<T>> {
        match self {
            TemporalValue::SequenceSet(v) => Some(v),
            _ => None,
        }
    }

    /// Three-way comparison. Fails with [`Error::UnsupportedComparison`]
    /// when the shapes differ.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (TemporalValue::Instant(a), TemporalValue::Instant(b)) => Ok(a.cmp(b)),
            (TemporalValue::InstantSet(a), TemporalValue::InstantSet(b)) => Ok(a.cmp(b)),
            (TemporalValue::Sequence(a), TemporalValue::Sequence(b)) => Ok(a.cmp(b)),
            (TemporalValue::SequenceSet(a), TemporalValue::SequenceSet(b)) => Ok(a.cmp(b)),
            _ => Err(Error::UnsupportedComparison {
                lhs: self.duration(),
                rhs: other.duration(),
            }),
        }
    }
}

impl<T: BaseType> Temporal for TemporalValue<T> {
    type Base = T;

    fn duration(&self) -> TemporalDuration {
        dispatch!(self, v => v.duration())
    }

    fn instants(&self) -> Vec<TInstant<T>> {
        dispatch!(self, v => v.instants())
    }

    fn get_values(&self) -> BTreeSet<Range<T>> {
        dispatch!(self, v => v.get_values())
    }

    fn get_time(&self) -> PeriodSet {
        dispatch!(self, v => v.get_time())
    }

    fn period(&self) -> Period {
        dispatch!(self, v => v.period())
    }

    fn timespan(&self) -> TimeDelta {
        dispatch!(self, v => v.timespan())
    }

    fn timestamps(&self) -> BTreeSet<TimePoint> {
        dispatch!(self, v => v.timestamps())
    }

    fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(dispatch!(self, v => v.shift(delta)?.into()))
    }

    fn intersects_timestamp(&self, t: TimePoint) -> bool {
        dispatch!(self, v => v.intersects_timestamp(t))
    }

    fn intersects_period(&self, period: &Period) -> bool {
        dispatch!(self, v => v.intersects_period(period))
    }

    fn srid(&self) -> i32 {
        dispatch!(self, v => v.srid())
    }
}

impl<T: BaseType> PartialEq for TemporalValue<T> {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.try_cmp(other), Ok(Ordering::Equal))
    }
}

impl<T: BaseType> PartialOrd for TemporalValue<T> {
    /// `None` across shapes.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl<T> From<TInstant<T>> for TemporalValue<T> {
    fn from(v: TInstant<T>) -> Self {
        TemporalValue::Instant(v)
    }
}

impl<T> From<TInstantSet<T>> for TemporalValue<T> {
    fn from(v: TInstantSet<T>) -> Self {
        TemporalValue::InstantSet(v)
    }
}

impl<T> From<TSequence<T>> for TemporalValue<T> {
    fn from(v: TSequence<T>) -> Self {
        TemporalValue::Sequence(v)
    }
}

impl<T> From<TSequenceSet<T>> for TemporalValue<T> {
    fn from(v: TSequenceSet<T>) -> Self {
        TemporalValue::SequenceSet(v)
    }
}

impl<T: BaseType> fmt::Display for TemporalValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, v => fmt::Display::fmt(v, f))
    }
}

impl<T: BaseType> FromStr for TemporalValue<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let value = de.next_temporal::<T>()?;
        de.expect_end()?;
        Ok(value)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TemporalValue<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Interpolation;
    use crate::time::from_ymd;

    fn day(d: u32) -> TimePoint {
        from_ymd(2012, 11, d).unwrap()
    }

    fn inst(v: i32, d: u32) -> TInstant<i32> {
        TInstant::new(v, day(d))
    }

    #[test]
    fn test_cross_shape_comparison_fails() {
        let a: TemporalValue<i32> = inst(10, 1).into();
        let b: TemporalValue<i32> = TInstantSet::new([inst(10, 1)]).unwrap().into();
        assert_eq!(
            a.try_cmp(&b),
            Err(Error::UnsupportedComparison {
                lhs: TemporalDuration::Instant,
                rhs: TemporalDuration::InstantSet,
            })
        );
        assert_eq!(a.partial_cmp(&b), None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_shape_comparison() {
        let a: TemporalValue<i32> = inst(10, 1).into();
        let b: TemporalValue<i32> = inst(10, 2).into();
        assert_eq!(a.try_cmp(&b), Ok(Ordering::Less));
        assert!(a < b);
    }

    #[test]
    fn test_shape_accessors() {
        let v: TemporalValue<i32> = TInstantSet::new([inst(10, 1)]).unwrap().into();
        assert!(v.as_instant_set().is_some());
        assert!(v.as_sequence().is_none());
        assert!(v.as_instant().is_none());
        assert!(v.as_sequence_set().is_none());
        assert_eq!(v.duration(), TemporalDuration::InstantSet);
    }

    #[test]
    fn test_provided_accessors() {
        let seq = TSequence::new(
            [inst(10, 1), inst(30, 2), inst(20, 3)],
            true,
            false,
            Interpolation::Stepwise,
        )
        .unwrap();
        assert_eq!(seq.num_instants(), 3);
        assert_eq!(seq.start_value().unwrap(), 10);
        assert_eq!(seq.end_value().unwrap(), 20);
        assert_eq!(seq.value_n(1).unwrap(), 30);
        assert_eq!(seq.min_value().unwrap(), 10);
        assert_eq!(seq.max_value().unwrap(), 30);
        assert_eq!(seq.start_timestamp().unwrap(), day(1));
        assert_eq!(seq.end_timestamp().unwrap(), day(3));
        assert_eq!(seq.timestamp_n(1).unwrap(), day(2));
        assert_eq!(seq.num_timestamps(), 3);
        assert_eq!(seq.srid(), SRID_DEFAULT);
    }

    #[test]
    fn test_instant_n_out_of_range_message() {
        let v = inst(10, 1);
        let err = v.instant_n(2).unwrap_err();
        assert_eq!(err.to_string(), "At least 3 instant(s) expected");
        assert!(v.timestamp_n(1).is_err());
    }

    #[test]
    fn test_intersects_sets() {
        let seq =
            TSequence::new([inst(1, 2), inst(2, 4)], true, true, Interpolation::Stepwise).unwrap();
        let hit = TimestampSet::new([day(1), day(3)]).unwrap();
        let miss = TimestampSet::new([day(1), day(5)]).unwrap();
        assert!(seq.intersects_timestamp_set(&hit));
        assert!(!seq.intersects_timestamp_set(&miss));

        let periods = PeriodSet::new([Period::new(day(5), day(6), true, true).unwrap()]).unwrap();
        assert!(!seq.intersects_period_set(&periods));
        let periods = PeriodSet::new([Period::new(day(4), day(6), true, true).unwrap()]).unwrap();
        assert!(seq.intersects_period_set(&periods));
    }

    #[test]
    fn test_shift_keeps_shape() {
        let v: TemporalValue<i32> = TInstantSet::new([inst(10, 1), inst(11, 2)]).unwrap().into();
        let shifted = v.shift(TimeDelta::days(1)).unwrap();
        assert_eq!(shifted.duration(), TemporalDuration::InstantSet);
        assert_eq!(shifted.start_timestamp().unwrap(), day(2));
        assert_eq!(shifted.shift(TimeDelta::days(-1)).unwrap(), v);
        assert!(matches!(
            v.shift(TimeDelta::MAX),
            Err(Error::TimeOverflow { .. })
        ));
    }

    #[test]
    fn test_unify_srid() {
        assert_eq!(unify_srid(0, [0, 4326, 0]).unwrap(), 4326);
        assert_eq!(unify_srid(4326, [0, 0]).unwrap(), 4326);
        assert!(unify_srid(0, [4326, 3857]).is_err());
        assert!(unify_srid(3857, [4326]).is_err());
    }

    #[test]
    fn test_cmp_by_count() {
        assert_eq!(cmp_by_count(&[5], &[1, 2], |a: &i32, b| a.cmp(b)), Ordering::Less);
        assert_eq!(cmp_by_count(&[1, 3], &[1, 2], |a: &i32, b| a.cmp(b)), Ordering::Greater);
        assert_eq!(cmp_by_count(&[1, 2], &[1, 2], |a: &i32, b| a.cmp(b)), Ordering::Equal);
    }
}
