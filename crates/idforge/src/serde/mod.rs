//! Serde support, behind the `serde` feature.
//!
//! By default a [`SnowflakeId`] serializes as its integer value and a
//! [`Ulid`] as its 26-character string. The `as_*` modules select an
//! alternative representation with `#[serde(with = "...")]`.
//!
//! [`SnowflakeId`]: crate::SnowflakeId
//! [`Ulid`]: crate::Ulid

mod snowflake;
mod ulid;

pub use snowflake::*;
pub use ulid::*;
