// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Generic value ranges.
//!
//! [`Range<T>`] is the value counterpart of [`Period`](crate::Period): two
//! bounds of any [`BaseType`] with inclusive or exclusive ends. Temporal
//! values report their value envelope as a set of ranges.
//!
//! Unlike `Period`, [`Range::new`] does not check bound ordering, so a range
//! can describe envelopes such as `(5, 5)` as they are computed. Use
//! [`Range::try_new`] or the text parser to get a validated range.

use crate::base::BaseType;
use crate::error::{Error, Result};
use crate::io::Deserializer;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A bounded interval over a base value type.
#[derive(Debug, Clone)]
pub struct Range<T> {
    lower: T,
    upper: T,
    lower_inc: bool,
    upper_inc: bool,
}

impl<T: BaseType> Range<T> {
    /// Build a range without checking the bounds.
    pub fn new(lower: T, upper: T, lower_inc: bool, upper_inc: bool) -> Self {
        Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        }
    }

    /// Build a range, failing when `lower > upper`.
    pub fn try_new(lower: T, upper: T, lower_inc: bool, upper_inc: bool) -> Result<Self> {
        if lower.compare(&upper) == Ordering::Greater {
            return Err(Error::InvalidBounds {
                reason: "the lower bound must be less than or equal to the upper bound",
            });
        }
        Ok(Self::new(lower, upper, lower_inc, upper_inc))
    }

    /// The closed single-value range `[v, v]`.
    pub fn singleton(value: T) -> Self {
        Self::new(value.clone(), value, true, true)
    }

    #[inline]
    pub fn lower(&self) -> &T {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &T {
        &self.upper
    }

    #[inline]
    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    #[inline]
    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    /// Whether the two ranges share a value. Touching ranges overlap only
    /// when both touching bounds are inclusive.
    pub fn overlap(&self, other: &Range<T>) -> bool {
        let min_upper = if self.upper.compare(&other.upper) == Ordering::Less {
            &self.upper
        } else {
            &other.upper
        };
        let max_lower = if self.lower.compare(&other.lower) == Ordering::Greater {
            &self.lower
        } else {
            &other.lower
        };
        match min_upper.compare(max_lower) {
            Ordering::Equal => {
                if self.lower.compare(&other.lower) == Ordering::Less {
                    self.upper_inc && other.lower_inc
                } else {
                    other.upper_inc && self.lower_inc
                }
            }
            ord => ord == Ordering::Greater,
        }
    }

    /// Whether `value` lies strictly inside the range or on an inclusive bound.
    pub fn contains(&self, value: &T) -> bool {
        let above_lower = self.lower.compare(value);
        let below_upper = value.compare(&self.upper);
        (above_lower == Ordering::Less && below_upper == Ordering::Less)
            || (self.lower_inc && above_lower == Ordering::Equal)
            || (self.upper_inc && below_upper == Ordering::Equal)
    }
}

impl<T: BaseType + Add<Output = T>> Range<T> {
    /// Translate both bounds by `offset`.
    pub fn shift(&self, offset: T) -> Self {
        Self {
            lower: self.lower.clone() + offset.clone(),
            upper: self.upper.clone() + offset,
            lower_inc: self.lower_inc,
            upper_inc: self.upper_inc,
        }
    }
}

impl<T: BaseType> PartialEq for Range<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: BaseType> Eq for Range<T> {}

impl<T: BaseType> PartialOrd for Range<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: BaseType> Ord for Range<T> {
    /// Same tie-break as [`Period`](crate::Period): inclusive bounds sort
    /// first at equal values.
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower
            .compare(&other.lower)
            .then_with(|| self.upper.compare(&other.upper))
            .then(other.lower_inc.cmp(&self.lower_inc))
            .then(other.upper_inc.cmp(&self.upper_inc))
    }
}

impl<T: BaseType> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower_inc { '[' } else { '(' },
            self.lower.write_value(),
            self.upper.write_value(),
            if self.upper_inc { ']' } else { ')' },
        )
    }
}

impl<T: BaseType> FromStr for Range<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let range = de.next_range::<T>()?;
        de.expect_end()?;
        Ok(range)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(Range<T>);
