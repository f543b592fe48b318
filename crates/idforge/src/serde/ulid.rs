use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Ulid;

impl Serialize for Ulid {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(self.encode().as_str())
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Base32Visitor;

        impl de::Visitor<'_> for Base32Visitor {
            type Value = Ulid;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a Crockford base32 encoded ULID")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ulid::decode(v).map_err(E::custom)
            }
        }

        d.deserialize_str(Base32Visitor)
    }
}

/// Serializes a [`Ulid`] as its native `u128`, for formats with 128-bit
/// integers.
pub mod as_native_ulid {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::Ulid;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Ulid, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<Ulid, D::Error>
    where
        D: Deserializer<'de>,
    {
        u128::deserialize(d).map(Ulid::from_raw)
    }
}
