use core::{cmp::Ordering, time::Duration};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{IdGenerator, Mutex, Poll, SnowflakeConfig, lock},
    id::{SnowflakeId, SnowflakeLayout, SnowflakeParts},
    time::TimeSource,
};

#[derive(Clone, Copy, Debug, Default)]
struct State {
    /// Clock reading (ms since UNIX epoch) of the last issued ID.
    last_timestamp: Option<u64>,
    sequence: u64,
}

/// A lock-based Snowflake ID generator safe to share between threads.
///
/// Each call takes the lock, reads the clock, and updates the
/// `(last_timestamp, sequence)` pair before releasing it:
///
/// - a newer millisecond resets the sequence to zero,
/// - the same millisecond increments the sequence, or reports
///   [`Poll::Pending`] once it is exhausted,
/// - an older millisecond is a clock rollback: [`Poll::Pending`] while within
///   the configured tolerance, [`Error::ClockMovedBackwards`] beyond it.
///
/// The lock is never held while waiting; [`Self::generate`] releases it,
/// yields the thread, and polls again.
///
/// Share one instance per `(datacenter id, worker id)` pair, e.g. behind an
/// [`Arc`](std::sync::Arc).
///
/// ```
/// use std::sync::Arc;
/// use idforge::{SnowflakeConfig, SnowflakeGenerator, SystemClock};
///
/// let generator = Arc::new(SnowflakeGenerator::new(SnowflakeConfig::new(1, 2), SystemClock)?);
/// let id = generator.generate()?;
/// let parts = generator.decompose(id);
/// assert_eq!((parts.datacenter_id, parts.worker_id), (1, 2));
/// # Ok::<(), idforge::Error>(())
/// ```
#[derive(Debug)]
pub struct SnowflakeGenerator<T>
where
    T: TimeSource,
{
    state: Mutex<State>,
    config: SnowflakeConfig,
    epoch_ms: u64,
    tolerance_ms: u64,
    time: T,
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for the node described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the datacenter or worker id does
    /// not fit its field.
    pub fn new(config: SnowflakeConfig, time: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(State::default()),
            epoch_ms: config.epoch_millis(),
            tolerance_ms: config.tolerance_millis(),
            config,
            time,
        })
    }

    /// Creates a generator whose last issued ID had the given clock reading
    /// (ms since UNIX epoch) and sequence.
    ///
    /// This is primarily useful for resuming after a restart without reusing
    /// timestamps, or for driving the generator to a specific state in tests.
    /// Prefer [`Self::new`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the config is invalid or
    /// `sequence` does not fit the layout.
    pub fn from_components(
        config: SnowflakeConfig,
        last_timestamp: u64,
        sequence: u64,
        time: T,
    ) -> Result<Self> {
        if sequence > config.layout.max_sequence() {
            return Err(Error::config(format!(
                "sequence {sequence} exceeds the layout maximum {}",
                config.layout.max_sequence()
            )));
        }
        let generator = Self::new(config, time)?;
        *lock(&generator.state)? = State {
            last_timestamp: Some(last_timestamp),
            sequence,
        };
        Ok(generator)
    }

    #[must_use]
    pub fn config(&self) -> &SnowflakeConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> SnowflakeLayout {
        self.config.layout
    }

    /// Generates a new ID, yielding the thread while the generator is
    /// throttled.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if the clock falls behind the last
    ///   issued timestamp by more than the configured tolerance.
    /// - [`Error::ClockBeforeEpoch`] / [`Error::TimestampOverflow`] if the
    ///   clock reading cannot be encoded.
    /// - [`Error::LockPoisoned`] if another thread panicked mid-generation
    ///   (std mutex only).
    pub fn generate(&self) -> Result<SnowflakeId> {
        self.generate_with(|_| std::thread::yield_now())
    }

    /// Generates a new ID, calling `backoff` with the suggested wait (in
    /// milliseconds) each time the generator is throttled.
    ///
    /// ```
    /// use core::time::Duration;
    /// use idforge::{SnowflakeConfig, SnowflakeGenerator, SystemClock};
    ///
    /// let generator = SnowflakeGenerator::new(SnowflakeConfig::default(), SystemClock)?;
    /// let id = generator.generate_with(|ms| std::thread::sleep(Duration::from_millis(ms)))?;
    /// # let _ = id;
    /// # Ok::<(), idforge::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub fn generate_with(&self, mut backoff: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => backoff(yield_for),
            }
        }
    }

    /// Generates a new ID in its decimal string form.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub fn generate_string(&self) -> Result<String> {
        self.generate().map(|id| id.to_string())
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new ID is available
    /// - `Ok(Poll::Pending { yield_for })`: the milliseconds to wait before
    ///   trying again
    /// - `Err(e)`: the clock is unusable or the lock was poisoned
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<Poll<SnowflakeId>> {
        let mut state = lock(&self.state)?;
        // Read under the lock so readings are ordered like the issued IDs
        let now = self.time.current_millis();

        let Some(last) = state.last_timestamp else {
            return self.rollover_to(&mut state, now);
        };

        match now.cmp(&last) {
            Ordering::Equal => {
                if state.sequence < self.config.layout.max_sequence() {
                    state.sequence += 1;
                    let elapsed = self.elapsed_since_epoch(now)?;
                    Ok(Poll::Ready {
                        id: self.compose(elapsed, state.sequence),
                    })
                } else {
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => self.rollover_to(&mut state, now),
            Ordering::Less => self.cold_clock_behind(now, last),
        }
    }

    /// Splits an ID minted by this generator's layout into its fields.
    #[must_use]
    pub fn decompose(&self, id: SnowflakeId) -> SnowflakeParts {
        self.config.layout.decompose(id)
    }

    /// Returns the wall-clock time at which `id` was generated.
    #[must_use]
    pub fn generated_at(&self, id: SnowflakeId) -> SystemTime {
        UNIX_EPOCH + self.config.epoch + Duration::from_millis(self.decompose(id).timestamp)
    }

    fn rollover_to(&self, state: &mut State, now: u64) -> Result<Poll<SnowflakeId>> {
        let elapsed = self.elapsed_since_epoch(now)?;
        state.last_timestamp = Some(now);
        state.sequence = 0;
        Ok(Poll::Ready {
            id: self.compose(elapsed, 0),
        })
    }

    fn elapsed_since_epoch(&self, now: u64) -> Result<u64> {
        let elapsed = now.checked_sub(self.epoch_ms).ok_or(Error::ClockBeforeEpoch {
            now,
            epoch: self.epoch_ms,
        })?;
        let max = self.config.layout.max_timestamp();
        if elapsed > max {
            return Err(Error::TimestampOverflow {
                timestamp: elapsed,
                max,
            });
        }
        Ok(elapsed)
    }

    fn compose(&self, elapsed: u64, sequence: u64) -> SnowflakeId {
        self.config.layout.compose(SnowflakeParts {
            timestamp: elapsed,
            datacenter_id: self.config.datacenter_id,
            worker_id: self.config.worker_id,
            sequence,
        })
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: u64, last: u64) -> Result<Poll<SnowflakeId>> {
        let drift = last - now;
        if drift <= self.tolerance_ms {
            return Ok(Poll::Pending { yield_for: drift });
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            last,
            now,
            drift,
            tolerance = self.tolerance_ms,
            "clock moved backwards, refusing to generate"
        );
        Err(Error::ClockMovedBackwards { last, now })
    }
}

impl<T> IdGenerator for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    type Id = SnowflakeId;

    fn generate(&self) -> Result<SnowflakeId> {
        Self::generate(self)
    }
}
