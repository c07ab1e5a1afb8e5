// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time points and the ISO-8601 time-literal grammar.
//!
//! A [`TimePoint`] is a UTC instant with millisecond resolution. Values
//! entering the crate through constructors are truncated to whole
//! milliseconds so that equality and ordering never depend on sub-millisecond
//! noise.
//!
//! # Text form
//!
//! Input literals are flexible:
//!
//! | Input | Meaning |
//! |-------|---------|
//! | `2012-11-01` | midnight UTC |
//! | `2012-11-01 10:15` / `2012-11-01T10:15` | seconds default to zero |
//! | `2012-11-01 10:15:30.25` | one to three fraction digits |
//! | `...Z`, `...+01`, `...-0130`, `...+01:30` | explicit offset |
//!
//! Every literal is normalized to the fixed shape
//! `YYYY-MM-DD HH:MM:SS[.mmm]±HHMM` before the fields are extracted (see
//! [`normalize_iso8601`]). Output is always `YYYY-MM-DDTHH:MM:SS[.mmm]+0000`,
//! with the fraction omitted when it is exactly zero.

use crate::error::{Error, ParseError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use std::fmt::Write;

pub use chrono::TimeDelta;

/// A UTC instant with millisecond resolution.
pub type TimePoint = DateTime<Utc>;

const NANOS_PER_MILLI: u32 = 1_000_000;

// ═══════════════════════════════════════════════════════════════════════════
// Construction helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Drop everything below the millisecond.
#[inline]
pub fn truncate_to_millis(t: TimePoint) -> TimePoint {
    let nanos = (t.nanosecond() / NANOS_PER_MILLI) * NANOS_PER_MILLI;
    t.with_nanosecond(nanos).unwrap_or(t)
}

/// Milliseconds since the Unix epoch.
#[inline]
pub fn to_millis(t: TimePoint) -> i64 {
    t.timestamp_millis()
}

/// Build a time point from milliseconds since the Unix epoch.
///
/// Returns `None` outside chrono's representable range.
#[inline]
pub fn from_millis(millis: i64) -> Option<TimePoint> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// `t + delta`, failing instead of overflowing chrono's range.
#[inline]
pub fn shift_time(t: TimePoint, delta: TimeDelta) -> Result<TimePoint> {
    t.checked_add_signed(delta)
        .ok_or(Error::TimeOverflow { delta })
}

/// Midnight UTC of the given calendar day.
pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<TimePoint> {
    from_ymd_hms(year, month, day, 0, 0, 0)
}

/// A UTC wall-clock time on the given calendar day.
pub fn from_ymd_hms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<TimePoint> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}

// ═══════════════════════════════════════════════════════════════════════════
// ISO-8601 normalization
// ═══════════════════════════════════════════════════════════════════════════

/// Length of the canonical shape without a fraction.
const CANONICAL_LEN: usize = 24;
/// Length of the canonical shape with a `.mmm` fraction.
const CANONICAL_LEN_MILLIS: usize = 28;

/// Rewrite an ISO-8601 literal into `YYYY-MM-DD HH:MM:SS[.mmm]±HHMM`.
///
/// `position` is only used to locate errors inside a larger input.
pub fn normalize_iso8601(input: &str, position: usize) -> Result<String> {
    let s = input.trim();
    let fail = |message: &str| ParseError::new(format!("{message}: '{s}'"), position);

    if !s.is_ascii() || s.len() < 10 {
        let msg = "Empty or unexpected length for the provided ISO 8601 date/time string";
        return Err(fail(msg).into());
    }

    let date = &s[..10];
    let mut rest = &s[10..];

    let (mut hh, mut mm, mut ss) = ("00", "00", "00");
    let mut fraction = String::new();

    if !rest.is_empty() && !rest.starts_with(['Z', '+', '-']) {
        if !rest.starts_with(['T', ' ']) {
            return Err(fail("Expected either a space or a 'T' after day").into());
        }
        rest = &rest[1..];

        match (rest.get(..2), rest.get(2..3), rest.get(3..5)) {
            (Some(h), Some(":"), Some(m)) => {
                hh = h;
                mm = m;
                rest = &rest[5..];
            }
            _ => return Err(fail("Expected time in hh:mm format").into()),
        }

        if let Some(tail) = rest.strip_prefix(':') {
            ss = tail
                .get(..2)
                .ok_or_else(|| fail("Expected time in hh:mm:ss format"))?;
            rest = &tail[2..];
        }

        if let Some(tail) = rest.strip_prefix('.') {
            let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return Err(fail("Expected fraction digits after '.'").into());
            }
            // Sub-millisecond digits are dropped.
            let mut millis: String = tail[..digits].chars().take(3).collect();
            while millis.len() < 3 {
                millis.push('0');
            }
            fraction = format!(".{millis}");
            rest = &tail[digits..];
        }
    }

    let offset = match rest {
        "" | "Z" => "+0000".to_string(),
        _ if rest.starts_with(['+', '-']) => {
            let sign = &rest[..1];
            let digits: String = rest[1..].chars().filter(|c| *c != ':').collect();
            match digits.len() {
                2 => format!("{sign}{digits}00"),
                4 => format!("{sign}{digits}"),
                _ => return Err(fail("Expected timezone offset as ±HH or ±HHMM").into()),
            }
        }
        _ => return Err(fail("Expected either a '+' or a '-' after time").into()),
    };

    let normalized = format!("{date} {hh}:{mm}:{ss}{fraction}{offset}");
    validate_iso8601(&normalized, position)?;
    Ok(normalized)
}

/// Check the separators of a normalized literal.
fn validate_iso8601(s: &str, position: usize) -> Result<()> {
    let b = s.as_bytes();
    let fail = |message: &str| Err(ParseError::new(format!("{message}: '{s}'"), position).into());

    if b.len() != CANONICAL_LEN && b.len() != CANONICAL_LEN_MILLIS {
        return fail("Unexpected length for a normalized ISO 8601 string");
    }
    if b[4] != b'-' || b[7] != b'-' {
        return fail("Expected date in YYYY-MM-DD format");
    }
    if b[10] != b' ' {
        return fail("Expected either a space or a 'T' after day");
    }
    if b[13] != b':' {
        return fail("Expected time in hh:mm format");
    }
    if b[16] != b':' {
        return fail("Expected time in hh:mm:ss format");
    }
    let sign_at = if b.len() == CANONICAL_LEN_MILLIS {
        if b[19] != b'.' {
            return fail("Expected '.' before milliseconds");
        }
        23
    } else {
        19
    };
    if b[sign_at] != b'+' && b[sign_at] != b'-' {
        return fail("Expected either a '+' or a '-' after time");
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

/// Parse one ISO-8601 literal.
pub fn parse_time(input: &str) -> Result<TimePoint> {
    parse_time_at(input, 0)
}

/// Parse one ISO-8601 literal located at `position` in a larger input.
pub(crate) fn parse_time_at(input: &str, position: usize) -> Result<TimePoint> {
    let s = normalize_iso8601(input, position)?;
    let fail = |message: &str| ParseError::new(format!("{message}: '{s}'"), position);

    let number = |range: std::ops::Range<usize>| -> Result<u32> {
        s[range]
            .parse::<u32>()
            .map_err(|_| fail("Expected decimal digits in time literal").into())
    };

    let year = number(0..4)? as i32;
    let month = number(5..7)?;
    let day = number(8..10)?;
    let hour = number(11..13)?;
    let minute = number(14..16)?;
    let second = number(17..19)?;
    let (millis, sign_at) = if s.len() == CANONICAL_LEN_MILLIS {
        (number(20..23)?, 23)
    } else {
        (0, 19)
    };
    let sign: i64 = if &s[sign_at..sign_at + 1] == "+" { 1 } else { -1 };
    let offset_hours = i64::from(number(sign_at + 1..sign_at + 3)?);
    let offset_minutes = i64::from(number(sign_at + 3..sign_at + 5)?);

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| fail("Invalid calendar date"))?
        .and_hms_milli_opt(hour, minute, second, millis)
        .ok_or_else(|| fail("Invalid time of day"))?;

    let tz_offset_secs = sign * (offset_hours * 60 + offset_minutes) * 60;
    let offset = TimeDelta::try_seconds(tz_offset_secs)
        .ok_or_else(|| fail("Timezone offset out of range"))?;

    Utc.from_utc_datetime(&naive)
        .checked_sub_signed(offset)
        .ok_or_else(|| fail("Time literal out of range").into())
}

// ═══════════════════════════════════════════════════════════════════════════
// Formatting
// ═══════════════════════════════════════════════════════════════════════════

/// Canonical text form: `YYYY-MM-DDTHH:MM:SS[.mmm]+0000`.
pub fn format_time(t: TimePoint) -> String {
    let mut out = t.format("%Y-%m-%dT%H:%M:%S").to_string();
    let millis = t.timestamp_subsec_millis();
    if millis > 0 {
        // Writing into a String cannot fail.
        let _ = write!(out, ".{millis:03}");
    }
    out.push_str("+0000");
    out
}
