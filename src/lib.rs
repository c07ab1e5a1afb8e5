// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Temporal values
//!
//! This crate models values that change over time: a reading of `10` at one
//! instant, a float that ramps between samples, a point that moves. Values
//! are typed by their base type and by their shape, and they read and write
//! a MobilityDB-compatible text form.
//!
//! # Core types
//!
//! - [`TimePoint`]: a UTC instant with millisecond resolution.
//! - [`Period`]: a time interval with inclusive or exclusive bounds.
//! - [`PeriodSet`], [`TimestampSet`]: sorted, de-duplicated sets of periods
//!   and of time points.
//! - [`Range<T>`]: a value interval over any [`BaseType`].
//! - [`TInstant<T>`], [`TInstantSet<T>`], [`TSequence<T>`], [`TSequenceSet<T>`]:
//!   the four temporal shapes, all implementing [`Temporal`].
//! - [`TemporalValue<T>`]: any of the four shapes, as read by
//!   [`Deserializer::next_temporal`].
//! - [`TBox`], [`STBox`]: value/time and space/time bounding boxes.
//!
//! # Base types
//!
//! | Type | Interpolation | Example |
//! |------|---------------|---------|
//! | `bool` | `Stepwise` | `t@2012-01-01` |
//! | `i32`, `i64` | `Stepwise` | `10@2012-01-01` |
//! | `f64` | `Linear` | `1.5@2012-01-01` |
//! | `String` | `Stepwise` | `"text"@2012-01-01` |
//! | [`GeomPoint`] | `Linear` | `SRID=4326;POINT (1 2)@2012-01-01` |
//!
//! # Text form
//!
//! Every value type implements [`Display`](std::fmt::Display) and
//! [`FromStr`](std::str::FromStr); the written form is canonical, so reading
//! it back yields an equal value:
//!
//! ```
//! use tempval::{Interpolation, TSequence, Temporal, TimeDelta};
//!
//! let s: TSequence<f64> = "Interp=Stepwise;[1@2012-01-01, 2@2012-01-02)".parse().unwrap();
//! assert_eq!(s.interpolation(), Interpolation::Stepwise);
//! let later = s.shift(TimeDelta::days(1)).unwrap();
//! assert_eq!(
//!     later.to_string(),
//!     "Interp=Stepwise;[1@2012-01-02T00:00:00+0000, 2@2012-01-03T00:00:00+0000)"
//! );
//! assert_eq!(later.to_string().parse::<TSequence<f64>>().unwrap(), later);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for every value type, through its
//!   canonical text form.

mod base;
mod boxes;
mod error;
mod geom;
mod io;
mod period;
mod period_set;
mod range;
mod temporal;
pub mod time;
mod timestamp_set;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use base::{BaseType, Interpolation};
pub use boxes::{STBox, TBox};
pub use error::{Error, ParseError, Result};
pub use geom::{resolve_srid, GeomPoint, SRID_DEFAULT};
pub use io::Deserializer;
pub use period::Period;
pub use period_set::PeriodSet;
pub use range::Range;
pub use temporal::{
    TInstant, TInstantSet, TSequence, TSequenceSet, Temporal, TemporalDuration, TemporalValue,
};
pub use time::{TimeDelta, TimePoint};
pub use timestamp_set::TimestampSet;
