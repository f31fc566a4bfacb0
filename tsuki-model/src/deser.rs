use std::fmt;

use serde::{
    de::{Error, IgnoredAny, MapAccess, Visitor},
    Deserializer,
};

/// Github sends licenses as `{ "key": ..., "name": ..., ... }` or `null`.
/// Only the name is of interest.
pub(super) mod option_license_name {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Box<str>>, D::Error> {
        d.deserialize_option(MaybeLicense)
    }

    struct MaybeLicense;

    impl<'de> Visitor<'de> for MaybeLicense {
        type Value = Option<Box<str>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional license object")
        }

        #[inline]
        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_map(self)
        }

        #[inline]
        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            self.visit_unit()
        }

        #[inline]
        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut name = None;

            while let Some(key) = map.next_key::<String>()? {
                if key == "name" {
                    name = map.next_value::<Option<Box<str>>>()?;
                } else {
                    let _: IgnoredAny = map.next_value()?;
                }
            }

            Ok(name)
        }
    }
}

/// Treats empty strings the same as `null`.
pub(super) mod option_non_empty_str {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Box<str>>, D::Error> {
        d.deserialize_option(MaybeNonEmpty)
    }

    struct MaybeNonEmpty;

    impl<'de> Visitor<'de> for MaybeNonEmpty {
        type Value = Option<Box<str>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional string")
        }

        #[inline]
        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_str(self)
        }

        #[inline]
        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            self.visit_unit()
        }

        #[inline]
        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        #[inline]
        fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok((!v.is_empty()).then(|| Box::from(v)))
        }
    }
}
