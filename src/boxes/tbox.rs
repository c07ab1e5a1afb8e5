// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use super::{check_axis, cmp_max, cmp_min, Coord};
use crate::error::{Error, Result};
use crate::io::Deserializer;
use crate::time::{format_time, parse_time, truncate_to_millis, TimePoint};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A value extent and a time extent, either of which may be unset.
///
/// # Examples
///
/// ```
/// use tempval::TBox;
///
/// let text = "TBOX((1, 2012-01-01T00:00:00+0000), (2, 2012-01-02T00:00:00+0000))";
/// let b: TBox = text.parse().unwrap();
/// assert_eq!(b.xmin(), Some(1.0));
/// assert_eq!(b.to_string(), text);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TBox {
    x: Option<(f64, f64)>,
    t: Option<(TimePoint, TimePoint)>,
}

impl TBox {
    /// A box with both extents set.
    pub fn new(xmin: f64, tmin: TimePoint, xmax: f64, tmax: TimePoint) -> Result<Self> {
        Self::from_extents(Some((xmin, xmax)), Some((tmin, tmax)))
    }

    /// A box with only a value extent.
    pub fn from_values(xmin: f64, xmax: f64) -> Result<Self> {
        Self::from_extents(Some((xmin, xmax)), None)
    }

    /// A box with only a time extent.
    pub fn from_times(tmin: TimePoint, tmax: TimePoint) -> Result<Self> {
        Self::from_extents(None, Some((tmin, tmax)))
    }

    /// A box with both extents, times given as ISO-8601 literals.
    pub fn from_strings(xmin: f64, tmin: &str, xmax: f64, tmax: &str) -> Result<Self> {
        Self::new(xmin, parse_time(tmin)?, xmax, parse_time(tmax)?)
    }

    /// The box with no extent, written `TBOX()`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_extents(
        x: Option<(f64, f64)>,
        t: Option<(TimePoint, TimePoint)>,
    ) -> Result<Self> {
        check_axis(x.as_ref(), "the xmin must be less than or equal to the xmax")?;
        check_axis(t.as_ref(), "the tmin must be less than or equal to the tmax")?;
        Ok(Self {
            x,
            t: t.map(|(min, max)| (truncate_to_millis(min), truncate_to_millis(max))),
        })
    }

    pub fn xmin(&self) -> Option<f64> {
        self.x.map(|x| x.0)
    }

    pub fn xmax(&self) -> Option<f64> {
        self.x.map(|x| x.1)
    }

    pub fn tmin(&self) -> Option<TimePoint> {
        self.t.map(|t| t.0)
    }

    pub fn tmax(&self) -> Option<TimePoint> {
        self.t.map(|t| t.1)
    }

    /// Whether the value extent is set.
    pub fn xset(&self) -> bool {
        self.x.is_some()
    }

    /// Whether the time extent is set.
    pub fn tset(&self) -> bool {
        self.t.is_some()
    }
}

impl PartialEq for TBox {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TBox {}

impl PartialOrd for TBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TBox {
    /// `tmin`, `xmin`, `tmax`, then `xmax`.
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_min(self.tmin(), other.tmin(), TimePoint::cmp)
            .then_with(|| cmp_min(self.xmin(), other.xmin(), f64::total_cmp))
            .then_with(|| cmp_max(self.tmax(), other.tmax(), TimePoint::cmp))
            .then_with(|| cmp_max(self.xmax(), other.xmax(), f64::total_cmp))
    }
}

impl fmt::Display for TBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TBOX(")?;
        match (self.x, self.t) {
            (Some((xmin, xmax)), Some((tmin, tmax))) => write!(
                f,
                "({}, {}), ({}, {})",
                Coord(xmin),
                format_time(tmin),
                Coord(xmax),
                format_time(tmax)
            )?,
            (Some((xmin, xmax)), None) => write!(f, "({},), ({},)", Coord(xmin), Coord(xmax))?,
            (None, Some((tmin, tmax))) => {
                write!(f, "(, {}), (, {})", format_time(tmin), format_time(tmax))?
            }
            (None, None) => {}
        }
        f.write_str(")")
    }
}

impl FromStr for TBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let tbox = de.next_tbox()?;
        de.expect_end()?;
        Ok(tbox)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(TBox);
