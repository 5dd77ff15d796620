use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::time::TimeSource;

/// A wall-anchored monotonic time source.
///
/// Captures `SystemTime::now()` and `Instant::now()` once at construction and
/// afterwards reports the anchor plus the monotonic time elapsed since. Wall
/// clock adjustments after construction are ignored, so a generator driven by
/// this clock never observes a regression inside the process. The trade-off
/// is drift: readings slowly diverge from the system clock if it is being
/// slewed, and a restarted process re-anchors to whatever the wall clock says.
///
/// Cloning shares the anchor.
///
/// # Example
///
/// ```
/// use seqflake::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// let b = clock.current_millis();
/// assert!(b >= a);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    anchor_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock at the current system time.
    pub fn new() -> Self {
        let start = Instant::now();
        let anchor_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self {
            start,
            anchor_millis,
        }
    }

    /// Unix millisecond the clock was anchored at.
    pub fn anchor_millis(&self) -> u64 {
        self.anchor_millis
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor_millis + self.start.elapsed().as_millis() as u64
    }
}
