use std::time::{SystemTime, UNIX_EPOCH};

use crate::time::TimeSource;

/// The system wall clock.
///
/// Reads [`SystemTime::now`] on every call. The wall clock may step backward
/// (NTP corrections, manual changes, VM migration); generators surface that as
/// [`Error::ClockRegression`](crate::Error::ClockRegression) rather than
/// correcting it. Use [`MonotonicClock`](crate::MonotonicClock) if that is not
/// acceptable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock before 1970 reads as zero and is rejected against the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.current_millis() > 1_577_836_800_000);
    }
}
