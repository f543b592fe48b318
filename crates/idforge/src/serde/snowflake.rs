use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::SnowflakeId;

impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        checked(u64::deserialize(d)?)
    }
}

fn checked<E: de::Error>(raw: u64) -> Result<SnowflakeId, E> {
    SnowflakeId::from_i64(raw as i64)
        .ok_or_else(|| E::custom(format_args!("snowflake id {raw} sets the sign bit")))
}

/// Serializes a [`SnowflakeId`] as a decimal string.
///
/// JavaScript numbers lose precision past `2^53`, so IDs bound for browsers
/// are usually sent as strings.
///
/// ```
/// use idforge::SnowflakeId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Message {
///     #[serde(with = "idforge::as_string_snowflake")]
///     id: SnowflakeId,
/// }
///
/// let json = serde_json::to_string(&Message { id: SnowflakeId::from_raw(7) })?;
/// assert_eq!(json, r#"{"id":"7"}"#);
/// # Ok::<(), serde_json::Error>(())
/// ```
pub mod as_string_snowflake {
    use super::{Deserializer, Serializer, checked, de, fmt};
    use crate::SnowflakeId;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// # Errors
    ///
    /// Returns an error if the input is not a decimal string, or if the value
    /// sets the sign bit.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a decimal snowflake id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let raw = v.parse::<u64>().map_err(E::custom)?;
                checked(raw)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}
