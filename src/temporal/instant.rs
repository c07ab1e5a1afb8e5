// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! A single value at a single time point.

use super::{Temporal, TemporalDuration};
use crate::base::BaseType;
use crate::error::{Error, Result};
use crate::geom::resolve_srid;
use crate::io::{write_srid_prefix, Deserializer};
use crate::period::Period;
use crate::period_set::PeriodSet;
use crate::range::Range;
use crate::time::{format_time, shift_time, truncate_to_millis, TimeDelta, TimePoint};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A value observed at one time point, e.g. `10@2012-11-01T00:00:00+0000`.
///
/// Instants order by timestamp first and value second. For points the value
/// order already includes the SRID.
///
/// # Examples
///
/// ```
/// use tempval::{TInstant, Temporal};
///
/// let i: TInstant<i32> = "10@2012-11-01".parse().unwrap();
/// assert_eq!(*i.value(), 10);
/// assert_eq!(i.to_string(), "10@2012-11-01T00:00:00+0000");
/// assert_eq!(i.num_instants(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TInstant<T> {
    value: T,
    timestamp: TimePoint,
}

impl<T: BaseType> TInstant<T> {
    pub fn new(value: T, timestamp: TimePoint) -> Self {
        Self {
            value,
            timestamp: truncate_to_millis(timestamp),
        }
    }

    /// Build an instant whose value is placed under `srid`.
    ///
    /// Fails when both `srid` and the value's own SRID are set and differ.
    pub fn with_srid(value: T, timestamp: TimePoint, srid: i32) -> Result<Self> {
        let srid = resolve_srid(srid, value.srid())?;
        Ok(Self::new(value.with_srid(srid), timestamp))
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn timestamp(&self) -> TimePoint {
        self.timestamp
    }

    #[inline]
    pub fn srid(&self) -> i32 {
        self.value.srid()
    }

    /// The same instant with its value placed under `srid`, unconditionally.
    pub fn to_srid(&self, srid: i32) -> Self {
        Self {
            value: self.value.clone().with_srid(srid),
            timestamp: self.timestamp,
        }
    }

    /// `value@timestamp`, without any prefix.
    pub(crate) fn write_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.value.write_value(), format_time(self.timestamp))
    }
}

impl<T: BaseType> Temporal for TInstant<T> {
    type Base = T;

    fn duration(&self) -> TemporalDuration {
        TemporalDuration::Instant
    }

    fn instants(&self) -> Vec<TInstant<T>> {
        vec![self.clone()]
    }

    fn get_values(&self) -> BTreeSet<Range<T>> {
        BTreeSet::from([Range::singleton(self.value.clone())])
    }

    fn get_time(&self) -> PeriodSet {
        PeriodSet::from_period(self.period())
    }

    fn period(&self) -> Period {
        Period::instant(self.timestamp)
    }

    fn timespan(&self) -> TimeDelta {
        TimeDelta::zero()
    }

    fn timestamps(&self) -> BTreeSet<TimePoint> {
        BTreeSet::from([self.timestamp])
    }

    fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(Self {
            value: self.value.clone(),
            timestamp: shift_time(self.timestamp, delta)?,
        })
    }

    fn intersects_timestamp(&self, t: TimePoint) -> bool {
        self.period().contains_timestamp(t)
    }

    fn intersects_period(&self, period: &Period) -> bool {
        period.contains_timestamp(self.timestamp)
    }

    fn srid(&self) -> i32 {
        self.value.srid()
    }
}

impl<T: BaseType> PartialEq for TInstant<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: BaseType> Eq for TInstant<T> {}

impl<T: BaseType> PartialOrd for TInstant<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: BaseType> Ord for TInstant<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.value.compare(&other.value))
    }
}

impl<T: BaseType> fmt::Display for TInstant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_srid_prefix(f, self.srid())?;
        self.write_body(f)
    }
}

impl<T: BaseType> FromStr for TInstant<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let instant = de.next_tinstant::<T>()?;
        de.expect_end()?;
        Ok(instant)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TInstant<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::GeomPoint;
    use crate::time::from_ymd;

    fn day(d: u32) -> TimePoint {
        from_ymd(2012, 11, d).unwrap()
    }

    #[test]
    fn test_instant_from_text() {
        let i: TInstant<i32> = "10@2012-11-01".parse().unwrap();
        assert_eq!(*i.value(), 10);
        assert_eq!(i.timestamp(), day(1));
        assert_eq!(i.to_string(), "10@2012-11-01T00:00:00+0000");
    }

    #[test]
    fn test_instant_each_base_type() {
        let b: TInstant<bool> = "TRUE@2012-11-01".parse().unwrap();
        assert_eq!(b.to_string(), "t@2012-11-01T00:00:00+0000");
        let f: TInstant<f64> = " 1.25@2012-11-01 00:00:00+01 ".parse().unwrap();
        assert_eq!(f.to_string(), "1.25@2012-10-31T23:00:00+0000");
        let s: TInstant<String> = "\"hi there\"@2012-11-01".parse().unwrap();
        assert_eq!(s.value(), "hi there");
        assert_eq!(s.to_string(), "\"hi there\"@2012-11-01T00:00:00+0000");
    }

    #[test]
    fn test_instant_period_is_degenerate() {
        let i = TInstant::new(1, day(1));
        assert_eq!(i.period(), Period::instant(day(1)));
        assert_eq!(i.timespan(), TimeDelta::zero());
        assert_eq!(i.get_time().num_periods(), 1);
        assert_eq!(i.get_values().len(), 1);
    }

    #[test]
    fn test_instant_intersects() {
        let i = TInstant::new(1, day(2));
        assert!(i.intersects_timestamp(day(2)));
        assert!(!i.intersects_timestamp(day(3)));
        assert!(i.intersects_period(&Period::new(day(1), day(2), true, true).unwrap()));
        assert!(!i.intersects_period(&Period::new(day(1), day(2), true, false).unwrap()));
    }

    #[test]
    fn test_instant_ordering() {
        assert!(TInstant::new(5, day(1)) < TInstant::new(1, day(2)));
        assert!(TInstant::new(1, day(1)) < TInstant::new(5, day(1)));
        assert_eq!(TInstant::new(1, day(1)), TInstant::new(1, day(1)));
    }

    #[test]
    fn test_instant_shift_roundtrip() {
        let i = TInstant::new(1.5, day(1));
        let shifted = i.shift(TimeDelta::hours(36)).unwrap();
        assert_eq!(shifted.timestamp(), day(2) + TimeDelta::hours(12));
        assert_eq!(shifted.shift(TimeDelta::hours(-36)).unwrap(), i);
    }

    #[test]
    fn test_instant_shift_out_of_range() {
        let i = TInstant::new(1, day(1));
        assert!(matches!(
            i.shift(TimeDelta::MAX),
            Err(Error::TimeOverflow { .. })
        ));
        assert!(i.shift(TimeDelta::MIN).is_err());
    }

    #[test]
    fn test_point_instant_srid() {
        let i: TInstant<GeomPoint> = "SRID=4326;POINT (20 30)@2012-11-01".parse().unwrap();
        assert_eq!(i.srid(), 4326);
        assert_eq!(i.to_string(), "SRID=4326;POINT (20 30)@2012-11-01T00:00:00+0000");

        let plain = TInstant::new(GeomPoint::new(20.0, 30.0), day(1));
        assert_eq!(plain.to_string(), "POINT (20 30)@2012-11-01T00:00:00+0000");
        assert_ne!(plain, i);
        assert!(plain < i);
        assert_eq!(plain.to_srid(4326), i);
    }

    #[test]
    fn test_point_instant_srid_conflict() {
        let p = GeomPoint::new(1.0, 2.0).with_srid(3857);
        assert!(matches!(
            TInstant::with_srid(p, day(1), 4326),
            Err(Error::ConflictingSrid { .. })
        ));
        assert_eq!(TInstant::with_srid(p, day(1), 0).unwrap().srid(), 3857);
        let q = GeomPoint::new(1.0, 2.0);
        assert_eq!(TInstant::with_srid(q, day(1), 4326).unwrap().srid(), 4326);
    }

    #[test]
    fn test_instant_parse_errors() {
        assert!("10 2012-11-01".parse::<TInstant<i32>>().is_err());
        assert!("10@".parse::<TInstant<i32>>().is_err());
        assert!("x@2012-11-01".parse::<TInstant<i32>>().is_err());
        assert!("10@2012-11-01 extra".parse::<TInstant<i32>>().is_err());
    }
}
