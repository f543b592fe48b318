#![cfg_attr(docsrs, feature(doc_cfg))]
//! Unique identifier generators.
//!
//! Three independent generators live in this crate:
//!
//! - [`SnowflakeGenerator`]: 64-bit `(timestamp, datacenter, worker,
//!   sequence)` IDs with a configurable [`SnowflakeLayout`].
//! - [`UlidGenerator`] and [`MonoUlidGenerator`]: 128-bit [`Ulid`]s rendered
//!   as 26-character Crockford base32 strings.
//! - [`NanoIdGenerator`]: fixed-length random strings over a custom
//!   [`Alphabet`].
//!
//! Every generator takes its clock ([`TimeSource`]) and randomness
//! ([`RandSource`], [`RandBytes`]) by injection, so tests can drive them with
//! fixed or adversarial inputs.
//!
//! ```
//! use idforge::{IdGenerator, SnowflakeConfig, SnowflakeGenerator, SystemClock};
//!
//! let generator = SnowflakeGenerator::new(SnowflakeConfig::new(1, 1), SystemClock)?;
//! let a = generator.generate()?;
//! let b = generator.generate()?;
//! assert!(a < b);
//! # Ok::<(), idforge::Error>(())
//! ```

mod base32;
mod error;
mod generator;
mod id;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::base32::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
