#[cfg(feature = "tracing")]
use tracing::instrument;

use super::basic::checked_timestamp;
use crate::{
    error::{Error, Result},
    generator::{IdGenerator, Mutex, lock},
    id::Ulid,
    rand::RandSource,
    time::TimeSource,
};

/// What a [`MonoUlidGenerator`] does when the random component of the current
/// millisecond is exhausted.
///
/// 2^80 IDs per millisecond is never reached in practice, so this only
/// matters for adversarial random sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Fail with [`Error::RandomExhausted`].
    #[default]
    Fail,
    /// Borrow the next millisecond: issue `last_timestamp + 1` with fresh
    /// randomness, keeping the ordering guarantee.
    AdvanceTimestamp,
}

/// A lock-based *monotonic* ULID generator safe to share between threads.
///
/// The last issued ULID is kept behind a mutex. Calls within the same
/// millisecond increment its 80-bit random component by one, so every ID is
/// strictly greater than the previous one, both as an integer and as its
/// encoded string.
///
/// If the clock steps backwards the generator keeps issuing from the last
/// timestamp rather than emit a smaller ID. Ordering holds only among IDs from
/// the same instance.
///
/// ```
/// use idforge::{MonoUlidGenerator, SystemClock, ThreadRandom};
///
/// let generator = MonoUlidGenerator::new(SystemClock, ThreadRandom);
/// let a = generator.generate()?;
/// let b = generator.generate()?;
/// assert!(a.encode().as_str() < b.encode().as_str());
/// # Ok::<(), idforge::Error>(())
/// ```
#[derive(Debug)]
pub struct MonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    state: Mutex<Option<Ulid>>,
    policy: OverflowPolicy,
    time: T,
    rng: R,
}

impl<T, R> MonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    /// Creates a generator with [`OverflowPolicy::Fail`].
    pub fn new(time: T, rng: R) -> Self {
        Self::with_policy(time, rng, OverflowPolicy::default())
    }

    pub fn with_policy(time: T, rng: R, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(None),
            policy,
            time,
            rng,
        }
    }

    /// Creates a generator that resumes after `last`, as if it had just
    /// issued it.
    pub fn from_last(last: Ulid, time: T, rng: R, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(Some(last)),
            policy,
            time,
            rng,
        }
    }

    #[must_use]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Generates a ULID strictly greater than every ULID this instance issued
    /// before.
    ///
    /// # Errors
    ///
    /// - [`Error::RandomExhausted`] if the random component overflows under
    ///   [`OverflowPolicy::Fail`].
    /// - [`Error::TimestampOverflow`] if the clock (or an advanced timestamp)
    ///   passes `2^48 - 1`.
    /// - [`Error::LockPoisoned`] if another thread panicked mid-generation
    ///   (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<Ulid> {
        let now = checked_timestamp(self.time.current_millis())?;
        let mut state = lock(&self.state)?;

        let next = match *state {
            Some(last) if now <= last.timestamp() => match last.increment_random() {
                Some(next) => next,
                None => self.cold_random_exhausted(last)?,
            },
            _ => Ulid::from_timestamp_and_rand(now, &self.rng),
        };

        *state = Some(next);
        Ok(next)
    }

    #[cold]
    #[inline(never)]
    fn cold_random_exhausted(&self, last: Ulid) -> Result<Ulid> {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            timestamp = last.timestamp(),
            policy = ?self.policy,
            "ulid random component exhausted"
        );
        match self.policy {
            OverflowPolicy::Fail => Err(Error::RandomExhausted {
                timestamp: last.timestamp(),
            }),
            OverflowPolicy::AdvanceTimestamp => {
                let advanced = checked_timestamp(last.timestamp().saturating_add(1))?;
                Ok(Ulid::from_timestamp_and_rand(advanced, &self.rng))
            }
        }
    }
}

impl<T, R> IdGenerator for MonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    type Id = Ulid;

    fn generate(&self) -> Result<Ulid> {
        Self::generate(self)
    }
}
