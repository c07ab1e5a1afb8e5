// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Base value types.
//!
//! A temporal value is generic over the value it carries. The [`BaseType`]
//! trait captures everything the temporal layer needs to know about that
//! value:
//!
//! | Type | Discrete | Default interpolation | Text form |
//! |------|----------|-----------------------|-----------|
//! | `bool` | yes | `Stepwise` | `t`, `f`, `true`, `false` (any case) |
//! | `i32`, `i64` | yes | `Stepwise` | optional sign and digits |
//! | `f64` | no | `Linear` | decimal literal with optional exponent |
//! | `String` | yes | `Stepwise` | `"quoted"` or unquoted up to `@` |
//! | [`GeomPoint`] | no | `Linear` | `[SRID=n;]POINT (x y)` or (E)WKB hex |

use crate::error::{Error, ParseError, Result};
use crate::geom::{parse_wkt_at, resolve_srid, GeomPoint, SRID_DEFAULT};
use crate::io::Deserializer;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════
// Interpolation
// ═══════════════════════════════════════════════════════════════════════════

/// How a sequence evaluates between two consecutive instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Interpolation {
    /// The value holds until the next instant.
    Stepwise,
    /// The value varies linearly towards the next instant.
    Linear,
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Stepwise => f.write_str("Stepwise"),
            Interpolation::Linear => f.write_str("Linear"),
        }
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("Stepwise") => Ok(Interpolation::Stepwise),
            t if t.eq_ignore_ascii_case("Linear") => Ok(Interpolation::Linear),
            other => Err(ParseError::new(
                format!("Unsupported interpolation '{other}', expected Stepwise or Linear"),
                0,
            )
            .into()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BaseType
// ═══════════════════════════════════════════════════════════════════════════

/// A value that temporal types can carry.
pub trait BaseType: Clone + fmt::Debug + Sized + 'static {
    /// Whether values change only by jumps. Discrete types cannot be
    /// interpolated linearly.
    const DISCRETE: bool;

    /// Whether values carry a spatial reference identifier.
    const SPATIAL: bool = false;

    /// Interpolation assumed when the text form does not name one.
    fn default_interpolation() -> Interpolation {
        if Self::DISCRETE {
            Interpolation::Stepwise
        } else {
            Interpolation::Linear
        }
    }

    /// Total order over values.
    fn compare(&self, other: &Self) -> Ordering;

    /// Read one value at the current reader position.
    fn read(de: &mut Deserializer<'_>) -> Result<Self>;

    /// Canonical text of the value as it appears inside temporal values.
    fn write_value(&self) -> String;

    /// SRID of the value, [`SRID_DEFAULT`] for non-spatial types.
    fn srid(&self) -> i32 {
        SRID_DEFAULT
    }

    /// The same value under another SRID. A no-op for non-spatial types.
    fn with_srid(self, _srid: i32) -> Self {
        self
    }
}

// ── bool ─────────────────────────────────────────────────────────────────

impl BaseType for bool {
    const DISCRETE: bool = true;

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn read(de: &mut Deserializer<'_>) -> Result<Self> {
        de.skip_whitespace();
        let start = de.position();
        let token = de.read_until_one_of(" \t\n@,)]}");
        match token.to_ascii_lowercase().as_str() {
            "t" | "true" => Ok(true),
            "f" | "false" => Ok(false),
            _ => Err(ParseError::new(
                format!("Boolean value can only be one of (t, f, true, false), but got: '{token}'"),
                start,
            )
            .into()),
        }
    }

    fn write_value(&self) -> String {
        if *self { "t" } else { "f" }.to_string()
    }
}

// ── integers ─────────────────────────────────────────────────────────────

/// Length of the integer literal at the start of `s`, sign included.
fn scan_integer(s: &str) -> usize {
    let b = s.as_bytes();
    let sign = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let digits = b[sign..].iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        0
    } else {
        sign + digits
    }
}

macro_rules! impl_integer_base {
    ($($t:ty),*) => {$(
        impl BaseType for $t {
            const DISCRETE: bool = true;

            fn compare(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn read(de: &mut Deserializer<'_>) -> Result<Self> {
                de.skip_whitespace();
                let start = de.position();
                let len = scan_integer(de.remaining());
                if len == 0 {
                    let msg = "Could not parse integer: invalid argument";
                    return Err(ParseError::new(msg, start).into());
                }
                let value = de.remaining()[..len]
                    .parse::<$t>()
                    .map_err(|_| ParseError::new("Could not parse integer: out of range", start))?;
                de.advance(len);
                Ok(value)
            }

            fn write_value(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

impl_integer_base!(i32, i64);

// ── f64 ──────────────────────────────────────────────────────────────────

/// Length of the floating-point literal at the start of `s`.
fn scan_float(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let int_digits = b[i..].iter().take_while(|c| c.is_ascii_digit()).count();
    i += int_digits;
    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        frac_digits = b[i + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
        i += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = b[j.min(b.len())..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    i
}

impl BaseType for f64 {
    const DISCRETE: bool = false;

    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn read(de: &mut Deserializer<'_>) -> Result<Self> {
        de.skip_whitespace();
        let start = de.position();
        let len = scan_float(de.remaining());
        if len == 0 {
            return Err(ParseError::new("Could not parse float: invalid argument", start).into());
        }
        let value = de.remaining()[..len]
            .parse::<f64>()
            .map_err(|_| ParseError::new("Could not parse float: invalid argument", start))?;
        de.advance(len);
        Ok(value)
    }

    fn write_value(&self) -> String {
        self.to_string()
    }
}

// ── String ───────────────────────────────────────────────────────────────

impl BaseType for String {
    const DISCRETE: bool = true;

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn read(de: &mut Deserializer<'_>) -> Result<Self> {
        de.skip_whitespace();
        let start = de.position();
        if de.peek(0) == Some('"') {
            let end = start + de.remaining().len();
            let close = closing_quote(de.remaining())
                .ok_or_else(|| ParseError::expected("closing '\"'", None, end))?;
            let value = de.remaining()[1..close].to_string();
            de.advance(close + 1);
            return Ok(value);
        }
        let value = de.read_until_one_of("@");
        if value.is_empty() {
            let msg = "Could not parse text: empty, unquoted value";
            return Err(ParseError::new(msg, start).into());
        }
        Ok(value.to_string())
    }

    fn write_value(&self) -> String {
        format!("\"{self}\"")
    }
}

/// Byte offset of the quote closing the text literal that opens `s`.
///
/// Inside a temporal value the literal runs up to the next `@`, so inner
/// quotes are kept. Without an `@` ahead (a range bound), the literal ends at
/// the first quote followed by a delimiter or the end of the input.
fn closing_quote(s: &str) -> Option<usize> {
    if let Some(at) = s.find('@') {
        let head = s[..at].trim_end();
        if head.len() > 1 && head.ends_with('"') {
            return Some(head.len() - 1);
        }
    }
    s.match_indices('"').skip(1).map(|(i, _)| i).find(|&i| {
        let after = s[i + 1..].trim_start();
        after.is_empty() || after.starts_with([',', ')', ']', '}'])
    })
}

// ── GeomPoint ────────────────────────────────────────────────────────────

impl BaseType for GeomPoint {
    const DISCRETE: bool = false;
    const SPATIAL: bool = true;

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn read(de: &mut Deserializer<'_>) -> Result<Self> {
        de.skip_whitespace();
        let srid = de.next_srid_prefix()?.unwrap_or(SRID_DEFAULT);
        de.skip_whitespace();

        let start = de.position();
        let rest = de.remaining();
        let ident_len = rest
            .bytes()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
        let after_ident = rest[ident_len..].trim_start();

        let point = if after_ident.starts_with('(') {
            // WKT: the identifier is the geometry type, coordinates follow in
            // balanced parentheses.
            let open = rest.len() - after_ident.len();
            let mut depth = 0usize;
            let mut close = None;
            for (i, c) in rest[open..].char_indices() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            close = Some(open + i);
                            break;
                        }
                    }
                    _ => {}
                }
            }
            let close = close.ok_or_else(|| ParseError::expected("')'", None, start + rest.len()))?;
            let point = parse_wkt_at(&rest[..=close], start)?;
            de.advance(close + 1);
            point
        } else {
            if ident_len == 0 {
                let msg = "Could not parse point: expected WKT or WKB hex";
                return Err(ParseError::new(msg, start).into());
            }
            let point = GeomPoint::from_hex(&rest[..ident_len])
                .map_err(|e| Deserializer::relocate(e, start))?;
            de.advance(ident_len);
            point
        };

        let srid = resolve_srid(srid, point.srid())?;
        Ok(point.with_srid(srid))
    }

    fn write_value(&self) -> String {
        self.to_wkt()
    }

    fn srid(&self) -> i32 {
        GeomPoint::srid(self)
    }

    fn with_srid(self, srid: i32) -> Self {
        GeomPoint::with_srid(self, srid)
    }
}
