// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Bounding boxes.
//!
//! - [`TBox`]: a value extent and a time extent, each optional.
//! - [`STBox`]: spatial (x/y, optionally z) and time extents, each optional,
//!   with a geodetic flag and an SRID.
//!
//! Both order their fields the way their text form lists them: time first,
//! then the spatial or value axes, lower corner before upper corner. An
//! unset lower bound sorts before any value and an unset upper bound after.

mod stbox;
mod tbox;

pub use stbox::STBox;
pub use tbox::TBox;

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// Order lower bounds, unset first.
fn cmp_min<V: Copy>(a: Option<V>, b: Option<V>, cmp: fn(&V, &V) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// Order upper bounds, unset last.
fn cmp_max<V: Copy>(a: Option<V>, b: Option<V>, cmp: fn(&V, &V) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (a, b) => b.is_some().cmp(&a.is_some()),
    }
}

/// Check `min <= max` on one axis.
fn check_axis<V: PartialOrd>(axis: Option<&(V, V)>, reason: &'static str) -> Result<()> {
    match axis {
        Some((min, max)) if min > max => Err(Error::InvalidBounds { reason }),
        _ => Ok(()),
    }
}

/// Box coordinate in text form.
///
/// Plain decimal for exponents in `-4..6`, otherwise scientific notation
/// with a signed exponent of at least two digits (`1e+06`, `2.5e-07`). The
/// mantissa keeps every digit needed to read the same `f64` back.
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v == 0.0 || !v.is_finite() {
            return write!(f, "{v}");
        }
        let sci = format!("{v:e}");
        let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        if (-4..6).contains(&exp) {
            write!(f, "{v}")
        } else {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
    }
}
