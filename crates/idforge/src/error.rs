use crate::base32::Base32Error;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `idforge` can produce.
///
/// Configuration errors surface at construction. Clock and exhaustion errors
/// surface from `generate` and never leave a partially built ID behind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A generator was constructed with an invalid layout, datacenter id, or
    /// worker id.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A NanoId was requested with an unusable alphabet or size.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The clock reported a time earlier than the last issued timestamp by
    /// more than the configured tolerance.
    #[error("clock moved backwards: last issued {last} ms, clock reads {now} ms")]
    ClockMovedBackwards { last: u64, now: u64 },

    /// The clock reported a time earlier than the generator's epoch.
    #[error("clock reads {now} ms, which is before the epoch at {epoch} ms")]
    ClockBeforeEpoch { now: u64, epoch: u64 },

    /// The timestamp no longer fits in the ID's timestamp field.
    #[error("timestamp {timestamp} exceeds the maximum of {max}")]
    TimestampOverflow { timestamp: u64, max: u64 },

    /// Every random value for this millisecond has already been issued by a
    /// monotonic ULID generator.
    #[error("random component exhausted at timestamp {timestamp}")]
    RandomExhausted { timestamp: u64 },

    /// A thread panicked while holding a generator lock.
    ///
    /// `parking_lot` mutexes do not poison, so this variant is absent when the
    /// `parking-lot` feature is enabled.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A ULID string failed to decode.
    #[error(transparent)]
    Base32(#[from] Base32Error),
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
