use core::time::Duration;
use std::{rc::Rc, sync::Arc};

/// 2025-01-01T00:00:00Z, a recent epoch for new deployments.
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// 2010-11-04T01:42:54.657Z, the epoch of Twitter Snowflake IDs.
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// 2015-01-01T00:00:00Z, the epoch of Discord IDs.
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// 1970-01-01T00:00:00Z. Timestamps then equal the raw clock reading.
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// The clock every time-based generator reads.
///
/// Generators take it by value, so production code passes [`SystemClock`] or
/// [`MonotonicClock`] and tests pass a fixed or scripted clock.
///
/// The unit is **milliseconds since the UNIX epoch**. Generators subtract
/// their own epoch where the ID format calls for one.
///
/// # Example
///
/// ```
/// use idforge::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`SystemClock`]: crate::SystemClock
/// [`MonotonicClock`]: crate::MonotonicClock
pub trait TimeSource {
    /// Returns the current time in milliseconds since the UNIX epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Rc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
