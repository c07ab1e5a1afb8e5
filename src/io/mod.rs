// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Text codec.
//!
//! Every value type writes its canonical text through [`Display`](std::fmt::Display)
//! and reads it back through [`FromStr`](std::str::FromStr). Both directions
//! share the grammar implemented by [`Deserializer`], which can also read
//! values embedded in a larger input:
//!
//! ```
//! use tempval::{Deserializer, Temporal};
//!
//! let mut de = Deserializer::new("10@2012-11-01, [1.5@2012-11-01, 2@2012-11-02)");
//! let a = de.next_tinstant::<i32>().unwrap();
//! de.consume_char(',').unwrap();
//! let b = de.next_tsequence::<f64>().unwrap();
//! assert!(!de.has_next());
//! assert_eq!(a.num_instants() + b.num_instants(), 3);
//! ```

mod deserializer;
mod serializer;

pub use deserializer::Deserializer;
pub(crate) use serializer::{write_interp_prefix, write_srid_prefix};

/// Implement `Serialize`/`Deserialize` through the canonical text form.
#[cfg(feature = "serde")]
macro_rules! serde_via_string {
    ($name:ident < $param:ident >) => {
        impl<$param: $crate::base::BaseType> serde::Serialize for $name<$param> {
            fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
            where
                Ser: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de, $param: $crate::base::BaseType> serde::Deserialize<'de> for $name<$param> {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
    ($name:ty) => {
        impl serde::Serialize for $name {
            fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
            where
                Ser: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(feature = "serde")]
pub(crate) use serde_via_string;
