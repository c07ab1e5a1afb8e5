// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Shared pieces of the canonical text form.

use crate::base::{BaseType, Interpolation};
use crate::geom::SRID_DEFAULT;
use std::fmt;

/// `SRID=n;`, omitted for the default SRID.
pub(crate) fn write_srid_prefix(f: &mut fmt::Formatter<'_>, srid: i32) -> fmt::Result {
    if srid == SRID_DEFAULT {
        return Ok(());
    }
    write!(f, "SRID={srid};")
}

/// `Interp=X;`, omitted when `interpolation` is the default for `T`.
pub(crate) fn write_interp_prefix<T: BaseType>(
    f: &mut fmt::Formatter<'_>,
    interpolation: Interpolation,
) -> fmt::Result {
    if interpolation == T::default_interpolation() {
        return Ok(());
    }
    write!(f, "Interp={interpolation};")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Prefixes<T> {
        srid: i32,
        interpolation: Interpolation,
        marker: std::marker::PhantomData<T>,
    }

    impl<T: BaseType> fmt::Display for Prefixes<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_srid_prefix(f, self.srid)?;
            write_interp_prefix::<T>(f, self.interpolation)
        }
    }

    fn prefixes<T: BaseType>(srid: i32, interpolation: Interpolation) -> String {
        Prefixes::<T> {
            srid,
            interpolation,
            marker: std::marker::PhantomData,
        }
        .to_string()
    }

    #[test]
    fn test_prefixes_only_when_non_default() {
        assert_eq!(prefixes::<f64>(0, Interpolation::Linear), "");
        assert_eq!(prefixes::<f64>(0, Interpolation::Stepwise), "Interp=Stepwise;");
        assert_eq!(prefixes::<i32>(0, Interpolation::Stepwise), "");
        assert_eq!(prefixes::<i32>(4326, Interpolation::Linear), "SRID=4326;Interp=Linear;");
    }
}
