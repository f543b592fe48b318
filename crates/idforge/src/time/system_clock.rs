use std::time::{SystemTime, UNIX_EPOCH};

use crate::time::TimeSource;

/// A [`TimeSource`] that reads the operating system's wall clock on every
/// call.
///
/// The wall clock may be stepped backwards by NTP or an operator. Generators
/// that depend on ordering detect this and report it rather than reusing an
/// old timestamp. Use [`MonotonicClock`] when that should never happen.
///
/// A clock reading before 1970 is reported as `0`.
///
/// [`MonotonicClock`]: crate::time::MonotonicClock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_wall_time() {
        let expected = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let ts = SystemClock.current_millis();
        assert!(ts >= expected);
        assert!(ts - expected < 1_000);
    }
}
