#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::IdGenerator,
    id::Ulid,
    rand::RandSource,
    time::TimeSource,
};

/// A stateless ULID generator.
///
/// Every call pairs the current timestamp with 80 fresh random bits. IDs from
/// different milliseconds sort chronologically; IDs from the same millisecond
/// sort randomly. Use [`MonoUlidGenerator`] when strict ordering within a
/// millisecond matters.
///
/// Holding no state, it never contends and never fails except when the clock
/// reads beyond the 48-bit timestamp range.
///
/// ```
/// use idforge::{SystemClock, ThreadRandom, UlidGenerator};
///
/// let generator = UlidGenerator::new(SystemClock, ThreadRandom);
/// let id = generator.generate()?;
/// assert_eq!(id.encode().as_str().len(), 26);
/// # Ok::<(), idforge::Error>(())
/// ```
///
/// [`MonoUlidGenerator`]: crate::generator::MonoUlidGenerator
#[derive(Clone, Debug)]
pub struct UlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    time: T,
    rng: R,
}

impl<T, R> UlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    pub fn new(time: T, rng: R) -> Self {
        Self { time, rng }
    }

    /// Generates a new ULID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if the clock reads past
    /// `2^48 - 1` milliseconds.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<Ulid> {
        let now = checked_timestamp(self.time.current_millis())?;
        Ok(Ulid::from_timestamp_and_rand(now, &self.rng))
    }
}

impl<T, R> IdGenerator for UlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    type Id = Ulid;

    fn generate(&self) -> Result<Ulid> {
        Self::generate(self)
    }
}

pub(crate) fn checked_timestamp(now: u64) -> Result<u64> {
    let max = Ulid::max_timestamp();
    if now > max {
        return Err(Error::TimestampOverflow {
            timestamp: now,
            max,
        });
    }
    Ok(now)
}
