// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use super::{check_axis, cmp_max, cmp_min, Coord};
use crate::error::{Error, Result};
use crate::geom::SRID_DEFAULT;
use crate::io::{write_srid_prefix, Deserializer};
use crate::time::{format_time, truncate_to_millis, TimePoint};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

type Extent = (f64, f64);

/// A spatio-temporal bounding box.
///
/// The x/y extent, the z extent and the time extent are each optional; z
/// is only allowed together with x/y. A geodetic box with a spatial extent
/// always carries z.
///
/// | Extents | Text form |
/// |---------|-----------|
/// | x, y, z, t | `STBOX ZT((x, y, z, t), (x, y, z, t))` |
/// | x, y, z | `STBOX Z((x, y, z), (x, y, z))` |
/// | x, y, t | `STBOX T((x, y, t), (x, y, t))` |
/// | x, y | `STBOX((x, y), (x, y))` |
/// | t | `STBOX T(( , , t), ( , , t))` |
/// | none | `STBOX()` |
///
/// Geodetic boxes are written `GEODSTBOX T(...)` or `GEODSTBOX(...)`. A
/// non-default SRID is written as an `SRID=n;` prefix.
///
/// # Examples
///
/// ```
/// use tempval::STBox;
///
/// let b = STBox::from_xy(1.0, 2.0, 3.0, 4.0).unwrap().with_srid(4326);
/// assert_eq!(b.to_string(), "SRID=4326;STBOX((1, 2), (3, 4))");
/// assert_eq!(b.to_string().parse::<STBox>().unwrap(), b);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct STBox {
    x: Option<Extent>,
    y: Option<Extent>,
    z: Option<Extent>,
    t: Option<(TimePoint, TimePoint)>,
    geodetic: bool,
    srid: i32,
}

impl STBox {
    pub fn from_xy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        Self::from_extents(Some(((xmin, xmax), (ymin, ymax))), None, None, false, SRID_DEFAULT)
    }

    pub fn from_xyz(
        xmin: f64,
        ymin: f64,
        zmin: f64,
        xmax: f64,
        ymax: f64,
        zmax: f64,
        geodetic: bool,
    ) -> Result<Self> {
        Self::from_extents(
            Some(((xmin, xmax), (ymin, ymax))),
            Some((zmin, zmax)),
            None,
            geodetic,
            SRID_DEFAULT,
        )
    }

    pub fn from_xyt(
        xmin: f64,
        ymin: f64,
        tmin: TimePoint,
        xmax: f64,
        ymax: f64,
        tmax: TimePoint,
    ) -> Result<Self> {
        Self::from_extents(
            Some(((xmin, xmax), (ymin, ymax))),
            None,
            Some((tmin, tmax)),
            false,
            SRID_DEFAULT,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_xyzt(
        xmin: f64,
        ymin: f64,
        zmin: f64,
        tmin: TimePoint,
        xmax: f64,
        ymax: f64,
        zmax: f64,
        tmax: TimePoint,
        geodetic: bool,
    ) -> Result<Self> {
        Self::from_extents(
            Some(((xmin, xmax), (ymin, ymax))),
            Some((zmin, zmax)),
            Some((tmin, tmax)),
            geodetic,
            SRID_DEFAULT,
        )
    }

    /// A box with only a time extent.
    pub fn from_times(tmin: TimePoint, tmax: TimePoint, geodetic: bool) -> Result<Self> {
        Self::from_extents(None, None, Some((tmin, tmax)), geodetic, SRID_DEFAULT)
    }

    /// The box with no extent, written `STBOX()`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The same box under `srid`.
    pub fn with_srid(self, srid: i32) -> Self {
        Self { srid, ..self }
    }

    pub(crate) fn from_extents(
        xy: Option<(Extent, Extent)>,
        z: Option<Extent>,
        t: Option<(TimePoint, TimePoint)>,
        geodetic: bool,
        srid: i32,
    ) -> Result<Self> {
        let (x, y) = match xy {
            Some((x, y)) => (Some(x), Some(y)),
            None => (None, None),
        };
        check_axis(x.as_ref(), "the xmin must be less than or equal to the xmax")?;
        check_axis(y.as_ref(), "the ymin must be less than or equal to the ymax")?;
        check_axis(z.as_ref(), "the zmin must be less than or equal to the zmax")?;
        check_axis(t.as_ref(), "the tmin must be less than or equal to the tmax")?;
        if z.is_some() && xy.is_none() {
            return Err(Error::InvalidBounds {
                reason: "a z extent needs an x/y extent",
            });
        }
        if geodetic && xy.is_some() && z.is_none() {
            return Err(Error::InvalidBounds {
                reason: "a geodetic box with an x/y extent needs a z extent",
            });
        }
        Ok(Self {
            x,
            y,
            z,
            t: t.map(|(min, max)| (truncate_to_millis(min), truncate_to_millis(max))),
            geodetic,
            srid,
        })
    }

    pub fn xmin(&self) -> Option<f64> {
        self.x.map(|e| e.0)
    }

    pub fn ymin(&self) -> Option<f64> {
        self.y.map(|e| e.0)
    }

    pub fn zmin(&self) -> Option<f64> {
        self.z.map(|e| e.0)
    }

    pub fn tmin(&self) -> Option<TimePoint> {
        self.t.map(|e| e.0)
    }

    pub fn xmax(&self) -> Option<f64> {
        self.x.map(|e| e.1)
    }

    pub fn ymax(&self) -> Option<f64> {
        self.y.map(|e| e.1)
    }

    pub fn zmax(&self) -> Option<f64> {
        self.z.map(|e| e.1)
    }

    pub fn tmax(&self) -> Option<TimePoint> {
        self.t.map(|e| e.1)
    }

    /// Whether the x/y extent is set.
    pub fn xset(&self) -> bool {
        self.x.is_some()
    }

    pub fn zset(&self) -> bool {
        self.z.is_some()
    }

    pub fn tset(&self) -> bool {
        self.t.is_some()
    }

    pub fn geodetic(&self) -> bool {
        self.geodetic
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }
}

impl PartialEq for STBox {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for STBox {}

impl PartialOrd for STBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for STBox {
    /// Lower corner (`t`, `x`, `y`, `z`), then upper corner in the same
    /// order, then the geodetic flag and the SRID.
    fn cmp(&self, other: &Self) -> Ordering {
        let f = f64::total_cmp;
        cmp_min(self.tmin(), other.tmin(), TimePoint::cmp)
            .then_with(|| cmp_min(self.xmin(), other.xmin(), f))
            .then_with(|| cmp_min(self.ymin(), other.ymin(), f))
            .then_with(|| cmp_min(self.zmin(), other.zmin(), f))
            .then_with(|| cmp_max(self.tmax(), other.tmax(), TimePoint::cmp))
            .then_with(|| cmp_max(self.xmax(), other.xmax(), f))
            .then_with(|| cmp_max(self.ymax(), other.ymax(), f))
            .then_with(|| cmp_max(self.zmax(), other.zmax(), f))
            .then(self.geodetic.cmp(&other.geodetic))
            .then(self.srid.cmp(&other.srid))
    }
}

/// Write one corner: the set coordinates separated by `", "`.
fn write_corner(
    f: &mut fmt::Formatter<'_>,
    xy: Option<(f64, f64)>,
    z: Option<f64>,
    t: Option<TimePoint>,
) -> fmt::Result {
    f.write_str("(")?;
    match xy {
        Some((x, y)) => {
            write!(f, "{}, {}", Coord(x), Coord(y))?;
            if let Some(z) = z {
                write!(f, ", {}", Coord(z))?;
            }
            if let Some(t) = t {
                write!(f, ", {}", format_time(t))?;
            }
        }
        None => {
            if let Some(t) = t {
                write!(f, " , , {}", format_time(t))?;
            }
        }
    }
    f.write_str(")")
}

impl fmt::Display for STBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_srid_prefix(f, self.srid)?;
        let keyword = if self.geodetic { "GEODSTBOX" } else { "STBOX" };
        let flags = match (self.geodetic, self.zset(), self.tset()) {
            (true, _, true) => " T",
            (true, _, false) => "",
            (false, true, true) => " ZT",
            (false, true, false) => " Z",
            (false, false, true) => " T",
            (false, false, false) => "",
        };
        write!(f, "{keyword}{flags}(")?;
        if self.xset() || self.tset() {
            let lower_xy = self.xmin().zip(self.ymin());
            let upper_xy = self.xmax().zip(self.ymax());
            write_corner(f, lower_xy, self.zmin(), self.tmin())?;
            f.write_str(", ")?;
            write_corner(f, upper_xy, self.zmax(), self.tmax())?;
        }
        f.write_str(")")
    }
}

impl FromStr for STBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut de = Deserializer::new(s);
        let stbox = de.next_stbox()?;
        de.expect_end()?;
        Ok(stbox)
    }
}

#[cfg(feature = "serde")]
crate::io::serde_via_string!(STBox);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_ymd;

    fn day(d: u32) -> TimePoint {
        from_ymd(2000, 1, d).unwrap()
    }

    #[test]
    fn test_stbox_text_forms() {
        let cases = [
            "STBOX ZT((11, 12, 13, 2000-01-01T00:00:00+0000), \
             (21, 22, 23, 2000-01-02T00:00:00+0000))",
            "STBOX Z((11, 12, 13), (21, 22, 23))",
            "STBOX T((11, 12, 2000-01-01T00:00:00+0000), (21, 22, 2000-01-02T00:00:00+0000))",
            "STBOX((11.5, 12), (21, 22.25))",
            "STBOX T(( , , 2000-01-01T00:00:00+0000), ( , , 2000-01-02T00:00:00+0000))",
            "STBOX()",
            "GEODSTBOX T((11, 12, 13, 2000-01-01T00:00:00+0000), \
             (21, 22, 23, 2000-01-02T00:00:00+0000))",
            "GEODSTBOX T(( , , 2000-01-01T00:00:00+0000), ( , , 2000-01-02T00:00:00+0000))",
            "GEODSTBOX((11, 12, 13), (21, 22, 23))",
            "SRID=4326;GEODSTBOX((11, 12, 13), (21, 22, 23))",
        ];
        for text in cases {
            let stbox: STBox = text.parse().unwrap();
            assert_eq!(stbox.to_string(), text);
        }
    }

    #[test]
    fn test_stbox_extreme_magnitudes() {
        let stbox = STBox::from_xyz(-1e7, 2.5e-5, 0.0, 6378137.0, 1.0, 1e21, false).unwrap();
        let text = stbox.to_string();
        assert_eq!(text, "STBOX Z((-1e+07, 2.5e-05, 0), (6.378137e+06, 1, 1e+21))");
        assert_eq!(text.parse::<STBox>().unwrap(), stbox);
    }

    #[test]
    fn test_stbox_constructors_match_text() {
        assert_eq!(
            STBox::from_xyzt(11.0, 12.0, 13.0, day(1), 21.0, 22.0, 23.0, day(2), false)
                .unwrap()
                .to_string(),
            "STBOX ZT((11, 12, 13, 2000-01-01T00:00:00+0000), \
             (21, 22, 23, 2000-01-02T00:00:00+0000))"
        );
        assert_eq!(
            STBox::from_xyz(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, true).unwrap().to_string(),
            "GEODSTBOX((1, 2, 3), (4, 5, 6))"
        );
        assert_eq!(
            STBox::from_xyt(1.0, 2.0, day(1), 3.0, 4.0, day(2)).unwrap().to_string(),
            "STBOX T((1, 2, 2000-01-01T00:00:00+0000), (3, 4, 2000-01-02T00:00:00+0000))"
        );
        assert_eq!(
            STBox::from_times(day(1), day(2), true).unwrap().to_string(),
            "GEODSTBOX T(( , , 2000-01-01T00:00:00+0000), ( , , 2000-01-02T00:00:00+0000))"
        );
        assert_eq!(STBox::empty().to_string(), "STBOX()");
    }

    #[test]
    fn test_stbox_validation() {
        assert!(matches!(
            STBox::from_xy(3.0, 0.0, 1.0, 0.0),
            Err(Error::InvalidBounds { .. })
        ));
        assert!(STBox::from_xy(0.0, 3.0, 1.0, 1.0).is_err());
        assert!(STBox::from_xyz(0.0, 0.0, 5.0, 1.0, 1.0, 4.0, false).is_err());
        assert!(STBox::from_times(day(2), day(1), false).is_err());
        assert!(STBox::from_extents(None, Some((0.0, 1.0)), None, false, 0).is_err());
        assert!(STBox::from_extents(Some(((0.0, 1.0), (0.0, 1.0))), None, None, true, 0).is_err());
    }

    #[test]
    fn test_stbox_accessors() {
        let b = STBox::from_xyzt(1.0, 2.0, 3.0, day(1), 4.0, 5.0, 6.0, day(2), false).unwrap();
        assert_eq!((b.xmin(), b.ymin(), b.zmin()), (Some(1.0), Some(2.0), Some(3.0)));
        assert_eq!((b.xmax(), b.ymax(), b.zmax()), (Some(4.0), Some(5.0), Some(6.0)));
        assert_eq!((b.tmin(), b.tmax()), (Some(day(1)), Some(day(2))));
        assert!(b.xset() && b.zset() && b.tset());
        assert!(!b.geodetic());
        assert_eq!(b.srid(), SRID_DEFAULT);
        assert_eq!(b.with_srid(3857).srid(), 3857);
    }

    #[test]
    fn test_stbox_ordering() {
        let early = STBox::from_xyt(9.0, 9.0, day(1), 10.0, 10.0, day(2)).unwrap();
        let late = STBox::from_xyt(0.0, 0.0, day(2), 1.0, 1.0, day(3)).unwrap();
        assert!(early < late);
        let xy = STBox::from_xy(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(xy < early);
        assert!(xy < xy.with_srid(4326));
        assert_eq!(xy, STBox::from_xy(0.0, 0.0, 1.0, 1.0).unwrap());
    }

    #[test]
    fn test_stbox_parse_errors() {
        assert!("STBOX((1, 2), (3))".parse::<STBox>().is_err());
        assert!("STBOX T((1, 2), (3, 4))".parse::<STBox>().is_err());
        assert!("STBOX((3, 2), (1, 4))".parse::<STBox>().is_err());
        assert!("STBOX((1, 2), (3, 4)) extra".parse::<STBox>().is_err());
    }
}
