// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time period implementation.
//!
//! A [`Period`] is a bounded time interval whose ends are each either
//! inclusive or exclusive:
//!
//! ```text
//! [2012-01-01T00:00:00+0000, 2012-04-01T00:00:00+0000)
//! ```
//!
//! Construction enforces `lower <= upper`, and a single-instant period must
//! be closed on both sides.

use crate::error::{Error, Result};
use crate::io::Deserializer;
use crate::time::{format_time, parse_time, shift_time, truncate_to_millis, TimeDelta, TimePoint};
use qtty::{Day, Days, Seconds};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A bounded time interval with inclusive or exclusive ends.
///
/// # Examples
///
/// ```
/// use tempval::Period;
///
/// let p: Period = "[2012-01-01, 2012-04-01)".parse().unwrap();
/// assert!(p.lower_inc());
/// assert!(!p.upper_inc());
/// assert_eq!(p.to_string(), "[2012-01-01T00:00:00+0000, 2012-04-01T00:00:00+0000)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    lower: TimePoint,
    upper: TimePoint,
    lower_inc: bool,
    upper_inc: bool,
}

impl Period {
    /// Creates a new period.
    ///
    /// Fails with [`Error::InvalidBounds`] when `lower > upper`, or when
    /// `lower == upper` and either bound is exclusive.
    pub fn new(
        lower: TimePoint,
        upper: TimePoint,
        lower_inc: bool,
        upper_inc: bool,
    ) -> Result<Self> {
        let period = Period {
            lower: truncate_to_millis(lower),
            upper: truncate_to_millis(upper),
            lower_inc,
            upper_inc,
        };
        period.validate()?;
        Ok(period)
    }

    /// Creates a period from two ISO-8601 literals.
    pub fn from_strings(
        lower: &str,
        upper: &str,
        lower_inc: bool,
        upper_inc: bool,
    ) -> Result<Self> {
        Self::new(parse_time(lower)?, parse_time(upper)?, lower_inc, upper_inc)
    }

    /// A closed single-instant period `[t, t]`.
    pub fn instant(t: TimePoint) -> Self {
        let t = truncate_to_millis(t);
        Period {
            lower: t,
            upper: t,
            lower_inc: true,
            upper_inc: true,
        }
    }

    /// The closed period between two time points, in either order.
    pub fn closed(a: TimePoint, b: TimePoint) -> Self {
        Period {
            lower: truncate_to_millis(a.min(b)),
            upper: truncate_to_millis(a.max(b)),
            lower_inc: true,
            upper_inc: true,
        }
    }

    /// Smallest period covering all of `periods`, gaps included.
    ///
    /// Each end takes the flag of the period that reaches furthest; at equal
    /// values an inclusive bound wins.
    pub fn envelope<'a, I>(periods: I) -> Option<Period>
    where
        I: IntoIterator<Item = &'a Period>,
    {
        periods.into_iter().fold(None, |acc: Option<Period>, p| {
            Some(match acc {
                None => *p,
                Some(env) => {
                    let (lower, lower_inc) = match p.lower.cmp(&env.lower) {
                        Ordering::Less => (p.lower, p.lower_inc),
                        Ordering::Greater => (env.lower, env.lower_inc),
                        Ordering::Equal => (env.lower, env.lower_inc || p.lower_inc),
                    };
                    let (upper, upper_inc) = match p.upper.cmp(&env.upper) {
                        Ordering::Greater => (p.upper, p.upper_inc),
                        Ordering::Less => (env.upper, env.upper_inc),
                        Ordering::Equal => (env.upper, env.upper_inc || p.upper_inc),
                    };
                    Period {
                        lower,
                        upper,
                        lower_inc,
                        upper_inc,
                    }
                }
            })
        })
    }

    fn validate(&self) -> Result<()> {
        if self.lower > self.upper {
            return Err(Error::InvalidBounds {
                reason: "the lower bound must be less than or equal to the upper bound",
            });
        }
        if self.lower == self.upper && !(self.lower_inc && self.upper_inc) {
            return Err(Error::InvalidBounds {
                reason: "the lower and upper bounds must be inclusive for an instant period",
            });
        }
        Ok(())
    }

    #[inline]
    pub fn lower(&self) -> TimePoint {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> TimePoint {
        self.upper
    }

    #[inline]
    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    #[inline]
    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    /// Length of the period, `upper - lower`.
    pub fn timespan(&self) -> TimeDelta {
        self.upper - self.lower
    }

    /// Length of the period in days.
    pub fn duration_days(&self) -> Days {
        let millis = self.timespan().num_milliseconds();
        Seconds::new(millis as f64 / 1000.0).to::<Day>()
    }

    /// The same period translated by `delta`. Bound flags are preserved.
    ///
    /// Fails with [`Error::TimeOverflow`] when a bound leaves chrono's range.
    pub fn shift(&self, delta: TimeDelta) -> Result<Self> {
        Ok(Period {
            lower: shift_time(self.lower, delta)?,
            upper: shift_time(self.upper, delta)?,
            ..*self
        })
    }

    /// Whether the two periods share at least one instant.
    ///
    /// When the periods only touch, the touching bounds must both be
    /// inclusive.
    pub fn overlap(&self, other: &Period) -> bool {
        let min_upper = self.upper.min(other.upper);
        let max_lower = self.lower.max(other.lower);
        match min_upper.cmp(&max_lower) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                if self.lower < other.lower {
                    self.upper_inc && other.lower_inc
                } else {
                    other.upper_inc && self.lower_inc
                }
            }
        }
    }

    /// Whether `t` lies strictly inside the period or on an inclusive bound.
    pub fn contains_timestamp(&self, t: TimePoint) -> bool {
        (self.lower < t && t < self.upper)
            || (self.lower_inc && self.lower == t)
            || (self.upper_inc && self.upper == t)
    }

    /// The common sub-period, if any.
    ///
    /// At an equal bound, the result is inclusive only when both inputs are.
    pub fn intersection(&self, other: &Period) -> Option<Period> {
        let (lower, lower_inc) = match self.lower.cmp(&other.lower) {
            Ordering::Greater => (self.lower, self.lower_inc),
            Ordering::Less => (other.lower, other.lower_inc),
            Ordering::Equal => (self.lower, self.lower_inc && other.lower_inc),
        };
        let (upper, upper_inc) = match self.upper.cmp(&other.upper) {
            Ordering::Less => (self.upper, self.upper_inc),
            Ordering::Greater => (other.upper, other.upper_inc),
            Ordering::Equal => (self.upper, self.upper_inc && other.upper_inc),
        };
        Period::new(lower, upper, lower_inc, upper_inc).ok()
    }
}

// ── Ordering ────────────────────────────────────────────────────────────

impl Ord for Period {
    /// Lower bound, then upper bound. At equal values an inclusive bound
    /// sorts first, at either end.
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower
            .cmp(&other.lower)
            .then(self.upper.cmp(&other.upper))
            .then(other.lower_inc.cmp(&self.lower_inc))
            .then(other.upper_inc.cmp(&self.upper_inc))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Text form ───────────────────────────────────────────────────────────

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower_inc { '[' } else { '(' },
            format_time(self.lower),
            format_time(self.upper),
            if self.upper_inc { ']' } else { ')' },
        )
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let period = de.next_period()?;
        de.expect_end()?;
        Ok(period)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(Period);
