// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! 2D point values and spatial reference identifiers.
//!
//! [`GeomPoint`] is a plain value: two coordinates and an SRID. It knows how
//! to encode and decode itself as WKT (`POINT (x y)`, optionally prefixed by
//! `SRID=n;`) and as (E)WKB, raw or hex encoded. No geometric operation
//! beyond coordinate addition is provided.
//!
//! ```
//! use tempval::GeomPoint;
//!
//! let p: GeomPoint = "SRID=4326;POINT (20 30)".parse().unwrap();
//! assert_eq!((p.x(), p.y(), p.srid()), (20.0, 30.0, 4326));
//! assert_eq!(p.to_wkt(), "POINT (20 30)");
//! assert_eq!(GeomPoint::from_hex(&p.to_hex(true)).unwrap(), p);
//! ```

use crate::error::{Error, ParseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// SRID of values that carry no spatial reference.
pub const SRID_DEFAULT: i32 = 0;

/// Reconcile an explicitly supplied SRID with the one found in a value.
///
/// Two different non-default SRIDs conflict. Otherwise the non-default one
/// is kept.
pub fn resolve_srid(explicit: i32, embedded: i32) -> Result<i32> {
    match (explicit, embedded) {
        (SRID_DEFAULT, found) => Ok(found),
        (given, SRID_DEFAULT) => Ok(given),
        (given, found) if given == found => Ok(given),
        (given, found) => Err(Error::ConflictingSrid { given, found }),
    }
}

// ── WKB layout ──────────────────────────────────────────────────────────

const WKB_POINT: u32 = 1;
const EWKB_SRID_FLAG: u32 = 0x2000_0000;
const EWKB_Z_FLAG: u32 = 0x8000_0000;
const EWKB_M_FLAG: u32 = 0x4000_0000;
const WKT_PRECISION: usize = 8;

/// A two-dimensional point with a spatial reference identifier.
///
/// Points order by `x`, then `y`, then SRID. Coordinates compare with IEEE
/// total ordering, so the order is total even in the presence of NaN.
#[derive(Debug, Clone, Copy)]
pub struct GeomPoint {
    x: f64,
    y: f64,
    srid: i32,
}

impl GeomPoint {
    /// A point without spatial reference.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            srid: SRID_DEFAULT,
        }
    }

    /// The same coordinates under another SRID.
    pub const fn with_srid(self, srid: i32) -> Self {
        Self { srid, ..self }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn srid(&self) -> i32 {
        self.srid
    }

    // ── WKT ─────────────────────────────────────────────────────────────

    /// `POINT (x y)` with up to eight decimals and trailing zeros trimmed.
    pub fn to_wkt(&self) -> String {
        format!("POINT ({} {})", format_coord(self.x), format_coord(self.y))
    }

    /// [`to_wkt`](Self::to_wkt) with an `SRID=n;` prefix when the SRID is set.
    pub fn to_ewkt(&self) -> String {
        if self.srid == SRID_DEFAULT {
            self.to_wkt()
        } else {
            format!("SRID={};{}", self.srid, self.to_wkt())
        }
    }

    /// Parse `[SRID=n;]POINT (x y)`. The keyword is case-insensitive.
    pub fn from_wkt(text: &str) -> Result<Self> {
        parse_wkt_at(text, 0)
    }

    // ── WKB ─────────────────────────────────────────────────────────────

    /// Little-endian WKB. With `extended`, the SRID is embedded (EWKB) when set.
    pub fn to_wkb(&self, extended: bool) -> Vec<u8> {
        let with_srid = extended && self.srid != SRID_DEFAULT;
        let mut out = Vec::with_capacity(if with_srid { 25 } else { 21 });
        out.push(1u8);
        let kind = if with_srid {
            WKB_POINT | EWKB_SRID_FLAG
        } else {
            WKB_POINT
        };
        out.extend_from_slice(&kind.to_le_bytes());
        if with_srid {
            out.extend_from_slice(&self.srid.to_le_bytes());
        }
        out.extend_from_slice(&self.x.to_le_bytes());
        out.extend_from_slice(&self.y.to_le_bytes());
        out
    }

    /// Decode WKB or EWKB of either byte order.
    pub fn from_wkb(bytes: &[u8]) -> Result<Self> {
        let mut reader = WkbReader::new(bytes)?;
        let kind = reader.u32()?;
        if kind & (EWKB_Z_FLAG | EWKB_M_FLAG) != 0 || kind & 0xFFFF != WKB_POINT {
            return Err(wkb_error("Only 2D POINT geometry supported"));
        }
        let srid = if kind & EWKB_SRID_FLAG != 0 {
            reader.u32()? as i32
        } else {
            SRID_DEFAULT
        };
        let x = reader.f64()?;
        let y = reader.f64()?;
        if !reader.is_exhausted() {
            return Err(wkb_error("Trailing bytes after POINT"));
        }
        Ok(Self { x, y, srid })
    }

    /// Upper-case hex of [`to_wkb`](Self::to_wkb).
    pub fn to_hex(&self, extended: bool) -> String {
        self.to_wkb(extended)
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect()
    }

    /// Decode hex-encoded WKB or EWKB. Either letter case is accepted.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.len() % 2 != 0 {
            return Err(wkb_error("Odd number of hex digits"));
        }
        let bytes = hex
            .as_bytes()
            .chunks(2)
            .map(|pair| match (hex_digit(pair[0]), hex_digit(pair[1])) {
                (Some(hi), Some(lo)) => Ok(hi << 4 | lo),
                _ => Err(wkb_error("Invalid hex digit")),
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::from_wkb(&bytes)
    }
}

/// Parse WKT located at `position` inside a larger input.
pub(crate) fn parse_wkt_at(text: &str, position: usize) -> Result<GeomPoint> {
    let fail = |message: &str| -> Error { ParseError::new(message, position).into() };
    let mut rest = text.trim();

    let mut srid = SRID_DEFAULT;
    if has_prefix_ignore_case(rest, "SRID=") {
        let end = rest.find(';').ok_or_else(|| fail("Expected ';' after SRID"))?;
        srid = rest[5..end]
            .trim()
            .parse()
            .map_err(|_| fail("Could not parse SRID"))?;
        rest = rest[end + 1..].trim_start();
    }

    if !has_prefix_ignore_case(rest, "POINT") {
        return Err(fail("Only POINT geometry supported"));
    }
    let body = rest[5..].trim();
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| fail("Could not parse WKT: expected '(x y)'"))?;

    let mut coords = inner.split_whitespace().map(str::parse::<f64>);
    match (coords.next(), coords.next(), coords.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Ok(GeomPoint { x, y, srid }),
        _ => Err(fail("Could not parse WKT: expected two coordinates")),
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn format_coord(v: f64) -> String {
    let s = format!("{:.*}", WKT_PRECISION, v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

fn wkb_error(message: &str) -> Error {
    ParseError::new(format!("Could not parse WKB: {message}"), 0).into()
}

struct WkbReader<'a> {
    bytes: &'a [u8],
    little_endian: bool,
}

impl<'a> WkbReader<'a> {
    fn new(bytes: &'a [u8]) -> Result<Self> {
        match bytes.split_first() {
            Some((0, rest)) => Ok(Self {
                bytes: rest,
                little_endian: false,
            }),
            Some((1, rest)) => Ok(Self {
                bytes: rest,
                little_endian: true,
            }),
            _ => Err(wkb_error("Invalid byte order marker")),
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        if self.bytes.len() < N {
            return Err(wkb_error("Unexpected end of buffer"));
        }
        let (head, rest) = self.bytes.split_at(N);
        self.bytes = rest;
        let mut out = [0u8; N];
        out.copy_from_slice(head);
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32> {
        let raw = self.take::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn f64(&mut self) -> Result<f64> {
        let raw = self.take::<8>()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }

    fn is_exhausted(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ── Ordering ────────────────────────────────────────────────────────────

impl PartialEq for GeomPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GeomPoint {}

impl PartialOrd for GeomPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GeomPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.srid.cmp(&other.srid))
    }
}

// ── Arithmetic ──────────────────────────────────────────────────────────

impl Add for GeomPoint {
    type Output = GeomPoint;

    /// Coordinate-wise sum. The result has no SRID.
    fn add(self, rhs: GeomPoint) -> GeomPoint {
        GeomPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GeomPoint {
    type Output = GeomPoint;

    fn sub(self, rhs: GeomPoint) -> GeomPoint {
        GeomPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for GeomPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ewkt())
    }
}

impl FromStr for GeomPoint {
    type Err = Error;

    /// Accepts EWKT or hex-encoded (E)WKB.
    fn from_str(s: &str) -> Result<Self> {
        let mut de = crate::io::Deserializer::new(s);
        let point = de.next_value::<GeomPoint>()?;
        de.expect_end()?;
        Ok(point)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(GeomPoint);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_srid() {
        assert_eq!(resolve_srid(0, 0).unwrap(), 0);
        assert_eq!(resolve_srid(4326, 0).unwrap(), 4326);
        assert_eq!(resolve_srid(0, 4326).unwrap(), 4326);
        assert_eq!(resolve_srid(4326, 4326).unwrap(), 4326);
        assert_eq!(
            resolve_srid(4326, 3857),
            Err(Error::ConflictingSrid {
                given: 4326,
                found: 3857
            })
        );
    }

    #[test]
    fn test_wkt_formatting_trims_zeros() {
        assert_eq!(GeomPoint::new(20.0, 30.0).to_wkt(), "POINT (20 30)");
        assert_eq!(GeomPoint::new(1.5, -0.25).to_wkt(), "POINT (1.5 -0.25)");
        assert_eq!(
            GeomPoint::new(1.0 / 3.0, 0.0).to_wkt(),
            "POINT (0.33333333 0)"
        );
        assert_eq!(GeomPoint::new(-0.0, 2.0).to_wkt(), "POINT (0 2)");
    }

    #[test]
    fn test_ewkt_prefix_only_when_srid_set() {
        let p = GeomPoint::new(1.0, 2.0);
        assert_eq!(p.to_ewkt(), "POINT (1 2)");
        assert_eq!(p.with_srid(4326).to_ewkt(), "SRID=4326;POINT (1 2)");
    }

    #[test]
    fn test_from_wkt_variants() {
        let p = GeomPoint::from_wkt("point(1 2)").unwrap();
        assert_eq!(p, GeomPoint::new(1.0, 2.0));
        let p = GeomPoint::from_wkt("SRID=3857;POINT (  -1.5   2e1 )").unwrap();
        assert_eq!(p, GeomPoint::new(-1.5, 20.0).with_srid(3857));
        assert!(GeomPoint::from_wkt("LINESTRING (0 0, 1 1)").is_err());
        assert!(GeomPoint::from_wkt("POINT (1)").is_err());
        assert!(GeomPoint::from_wkt("POINT (1 2 3)").is_err());
    }

    #[test]
    fn test_wkb_layout() {
        let hex = GeomPoint::new(1.0, 2.0).to_hex(false);
        assert_eq!(
            hex,
            "0101000000000000000000F03F0000000000000040"
        );
        let ehex = GeomPoint::new(1.0, 2.0).with_srid(4326).to_hex(true);
        assert_eq!(
            ehex,
            "0101000020E6100000000000000000F03F0000000000000040"
        );
    }

    #[test]
    fn test_wkb_decode_both_byte_orders() {
        let le = GeomPoint::from_hex("0101000000000000000000F03F0000000000000040").unwrap();
        let be = GeomPoint::from_hex("00000000013FF00000000000004000000000000000").unwrap();
        assert_eq!(le, be);
        assert_eq!(le, GeomPoint::new(1.0, 2.0));
    }

    #[test]
    fn test_ewkb_roundtrip_keeps_srid() {
        let p = GeomPoint::new(-73.5, 45.25).with_srid(4326);
        assert_eq!(GeomPoint::from_hex(&p.to_hex(true)).unwrap(), p);
        assert_eq!(GeomPoint::from_hex(&p.to_hex(false)).unwrap().srid(), 0);
    }

    #[test]
    fn test_wkb_rejects_garbage() {
        assert!(GeomPoint::from_hex("01").is_err());
        assert!(GeomPoint::from_hex("0G").is_err());
        assert!(GeomPoint::from_hex("020100000000").is_err());
        // LINESTRING type code
        assert!(GeomPoint::from_hex("010200000000000000").is_err());
    }

    #[test]
    fn test_ordering_x_then_y_then_srid() {
        let a = GeomPoint::new(1.0, 5.0);
        let b = GeomPoint::new(2.0, 0.0);
        let c = GeomPoint::new(2.0, 1.0);
        assert!(a < b && b < c);
        assert!(c < c.with_srid(1));
        assert_ne!(c, c.with_srid(1));
    }

    #[test]
    fn test_add_sub() {
        let p = GeomPoint::new(1.0, 2.0) + GeomPoint::new(0.5, 0.5);
        assert_eq!(p, GeomPoint::new(1.5, 2.5));
        assert_eq!(p - GeomPoint::new(1.5, 2.5), GeomPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_from_str_accepts_wkt_and_hex() {
        let from_wkt: GeomPoint = "SRID=4326;POINT (20 30)".parse().unwrap();
        let from_hex: GeomPoint = from_wkt.to_hex(true).parse().unwrap();
        assert_eq!(from_wkt, from_hex);
        assert_eq!(from_wkt.to_string(), "SRID=4326;POINT (20 30)");
    }
}
