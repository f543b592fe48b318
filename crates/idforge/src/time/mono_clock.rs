use core::time::Duration;
use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use crate::time::TimeSource;

/// A monotonic time source anchored to the wall clock at construction.
///
/// The clock captures `SystemTime::now()` once and from then on advances by
/// the elapsed [`Instant`] time, so NTP steps and manual clock changes never
/// make it go backward. A background thread publishes the elapsed milliseconds
/// to an atomic once per tick, keeping syscalls off the hot path. The thread
/// exits once every clone of the clock has been dropped.
///
/// Clones share the same ticker.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    elapsed_ms: Arc<AtomicU64>,
    wall_anchor_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a new clock and its ticker thread.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use idforge::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let before = clock.current_millis();
    /// std::thread::sleep(Duration::from_millis(5));
    /// assert!(clock.current_millis() >= before);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let started = Instant::now();
        let wall_anchor_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, saturating_millis);

        let elapsed_ms = Arc::new(AtomicU64::new(0));
        let ticker = Ticker {
            target: Arc::downgrade(&elapsed_ms),
            started,
        };
        // Detached: the thread notices the last clone going away on its own
        thread::spawn(move || ticker.run());

        Self {
            elapsed_ms,
            wall_anchor_ms,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.wall_anchor_ms
            .saturating_add(self.elapsed_ms.load(Ordering::Relaxed))
    }
}

fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Background half of a [`MonotonicClock`]; holds only a weak handle so it
/// never keeps the clock alive.
struct Ticker {
    target: Weak<AtomicU64>,
    started: Instant,
}

impl Ticker {
    fn run(self) {
        let mut published = 0;
        loop {
            // Sleep until the next whole millisecond after the last one published
            let deadline = self.started + Duration::from_millis(published + 1);
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }

            published = saturating_millis(self.started.elapsed());
            match self.target.upgrade() {
                Some(elapsed) => elapsed.store(published, Ordering::Relaxed),
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn monotonic_clock_advances_with_elapsed_time() {
        let clock = MonotonicClock::new();
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > before);
    }

    #[test]
    fn clones_share_the_ticker() {
        let clock = MonotonicClock::new();
        let clone = clock.clone();
        assert!(Arc::ptr_eq(&clock.elapsed_ms, &clone.elapsed_ms));
        assert_eq!(clock.wall_anchor_ms, clone.wall_anchor_ms);
    }

    #[test]
    fn ticker_releases_the_clock_after_last_clone_drops() {
        let clock = MonotonicClock::new();
        let clone = clock.clone();
        let shared = Arc::downgrade(&clock.elapsed_ms);
        drop(clock);
        drop(clone);

        let deadline = Instant::now() + Duration::from_secs(1);
        while shared.strong_count() > 0 {
            assert!(Instant::now() < deadline, "ticker still holds the clock");
            thread::sleep(Duration::from_millis(1));
        }
    }
}
