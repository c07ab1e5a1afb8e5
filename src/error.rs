// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. The variants
//! follow four kinds of failure:
//!
//! - structural-invariant violations raised by constructors
//!   ([`Error::InvalidBounds`], [`Error::DiscreteInterpolation`],
//!   [`Error::MixedInterpolation`], [`Error::ConflictingSrid`], [`Error::Empty`]);
//! - text-codec failures ([`Error::Parse`]);
//! - accessor preconditions ([`Error::NotEnough`]);
//! - comparisons across duration variants ([`Error::UnsupportedComparison`]).

use crate::temporal::TemporalDuration;
use crate::time::TimeDelta;
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Interval bounds are out of order, or a degenerate interval is not closed.
    #[error("invalid bounds: {reason}")]
    InvalidBounds { reason: &'static str },

    /// `Linear` interpolation requested on a discrete base type.
    #[error("cannot assign linear interpolation to a discrete base type")]
    DiscreteInterpolation,

    /// Members of a sequence set disagree on interpolation.
    #[error("all sequences should have the same interpolation")]
    MixedInterpolation,

    /// Two different, non-default SRIDs were supplied for one value.
    #[error("conflicting SRIDs provided. Given: {given}, while value contains: {found}")]
    ConflictingSrid { given: i32, found: i32 },

    /// A time point moved outside the representable range.
    #[error("time point out of range after shifting by {delta}")]
    TimeOverflow { delta: TimeDelta },

    /// A container was built without any member.
    #[error("a {what} should have at least one member")]
    Empty { what: &'static str },

    /// An accessor needs more elements than the value holds.
    #[error("At least {expected} {what}(s) expected")]
    NotEnough { what: &'static str, expected: usize },

    /// Temporal values of different duration variants are not comparable.
    #[error("unsupported comparison between {lhs} and {rhs}")]
    UnsupportedComparison {
        lhs: TemporalDuration,
        rhs: TemporalDuration,
    },

    /// The text input does not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Deserialization failure with the offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    expected: Option<String>,
    position: usize,
}

impl ParseError {
    /// A free-form failure at `position`.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            expected: None,
            position,
        }
    }

    /// A failure caused by a missing token.
    pub fn expected(token: impl Into<String>, found: Option<char>, position: usize) -> Self {
        let token = token.into();
        let message = match found {
            Some(c) => format!("Expected {token}, got '{c}'"),
            None => format!("Expected {token}, reached end of input"),
        };
        Self {
            message,
            expected: Some(token),
            position,
        }
    }

    /// Human-readable description, without the position.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The token the reader was looking for, when known.
    pub fn expected_token(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    /// Byte offset into the input where the failure was detected.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

impl Error {
    /// Shorthand for [`Error::NotEnough`].
    pub(crate) fn not_enough(what: &'static str, expected: usize) -> Self {
        Error::NotEnough { what, expected }
    }

    /// The wrapped parse error, if this is a codec failure.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}
