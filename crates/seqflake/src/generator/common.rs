//! Pieces shared by the lock and atomic generators.

use core::time::Duration;

use portable_atomic::{AtomicBool, Ordering};
#[cfg(feature = "tracing")]
use tracing::{debug, error, warn};

use crate::{ConfigError, Error, GeneratorConfig, Result, SnowflakeId, TimeSource};

/// Validated, immutable generator parameters.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) data_center_id: u64,
    pub(crate) worker_id: u64,
    pub(crate) epoch: u64,
    pub(crate) headroom: Headroom,
}

impl Settings {
    /// Validates `config` against the clock's current reading.
    pub(crate) fn resolve<T: TimeSource>(config: &GeneratorConfig, clock: &T) -> Result<Self> {
        config.validate()?;

        let epoch = config.resolved_epoch();
        let now = clock.current_millis();
        if epoch > now {
            return Err(ConfigError::EpochAfterNow { epoch, now }.into());
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            data_center_id = config.data_center_id,
            worker_id = config.worker_id,
            epoch,
            "sequence generator created"
        );

        Ok(Self {
            data_center_id: config.data_center_id,
            worker_id: config.worker_id,
            epoch,
            headroom: Headroom::new(config.overflow_warning),
        })
    }

    /// Milliseconds between the epoch and `now`, checked against the 41-bit
    /// timestamp field.
    pub(crate) fn elapsed(&self, now: u64) -> Result<u64> {
        let Some(elapsed) = now.checked_sub(self.epoch) else {
            return Err(cold_before_epoch(self.epoch, now));
        };
        if elapsed > SnowflakeId::max_timestamp() {
            return Err(cold_overflow(elapsed));
        }
        self.headroom.observe(elapsed);
        Ok(elapsed)
    }

    pub(crate) fn pack(&self, elapsed: u64, sequence: u64) -> SnowflakeId {
        SnowflakeId::from_components(elapsed, self.data_center_id, self.worker_id, sequence)
    }
}

/// Warns once when the timestamp field is close to running out.
#[derive(Debug)]
pub(crate) struct Headroom {
    warn_at: u64,
    warned: AtomicBool,
}

impl Headroom {
    pub(crate) fn new(threshold: Duration) -> Self {
        let warn_at = if threshold.is_zero() {
            u64::MAX
        } else {
            let threshold = u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX);
            SnowflakeId::max_timestamp().saturating_sub(threshold)
        };
        Self {
            warn_at,
            warned: AtomicBool::new(false),
        }
    }

    pub(crate) fn observe(&self, elapsed: u64) {
        if elapsed < self.warn_at || self.warned.swap(true, Ordering::Relaxed) {
            return;
        }
        #[cfg(feature = "tracing")]
        warn!(
            elapsed,
            remaining_ms = SnowflakeId::max_timestamp() - elapsed,
            "timestamp space nearly exhausted; choose a newer epoch before it runs out"
        );
    }

    #[cfg(test)]
    pub(crate) fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }
}

/// Spins until the clock moves past `last` and returns the new reading.
///
/// Called with the sequence for `last` exhausted; time must advance before
/// another ID can be issued.
#[cold]
#[inline(never)]
pub(crate) fn wait_for_next_millis<T: TimeSource>(clock: &T, last: u64) -> u64 {
    let mut spins: u64 = 0;
    loop {
        let now = clock.current_millis();
        if now > last {
            #[cfg(feature = "tracing")]
            debug!(last, now, spins, "sequence exhausted, waited for next millisecond");
            #[cfg(not(feature = "tracing"))]
            let _ = spins;
            return now;
        }
        spins += 1;
        core::hint::spin_loop();
    }
}

#[cold]
#[inline(never)]
pub(crate) fn cold_clock_behind(last: u64, now: u64) -> Error {
    #[cfg(feature = "tracing")]
    warn!(last, now, "clock moved backwards, refusing to generate id");
    Error::ClockRegression { last, now }
}

#[cold]
#[inline(never)]
fn cold_before_epoch(epoch: u64, now: u64) -> Error {
    #[cfg(feature = "tracing")]
    warn!(epoch, now, "clock is before the epoch, refusing to generate id");
    Error::ClockBeforeEpoch { epoch, now }
}

#[cold]
#[inline(never)]
fn cold_overflow(elapsed: u64) -> Error {
    let max = SnowflakeId::max_timestamp();
    #[cfg(feature = "tracing")]
    error!(elapsed, max, "timestamp overflow, epoch exhausted");
    Error::TimestampOverflow { elapsed, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headroom_warns_once_inside_threshold() {
        let headroom = Headroom::new(Duration::from_millis(10));
        headroom.observe(SnowflakeId::max_timestamp() - 11);
        assert!(!headroom.has_warned());
        headroom.observe(SnowflakeId::max_timestamp() - 10);
        assert!(headroom.has_warned());
        headroom.observe(SnowflakeId::max_timestamp());
        assert!(headroom.has_warned());
    }

    #[test]
    fn zero_headroom_never_warns() {
        let headroom = Headroom::new(Duration::ZERO);
        headroom.observe(SnowflakeId::max_timestamp());
        assert!(!headroom.has_warned());
    }

    #[test]
    fn elapsed_checks_both_ends() {
        let settings = Settings {
            data_center_id: 0,
            worker_id: 0,
            epoch: 1_000,
            headroom: Headroom::new(Duration::ZERO),
        };
        assert_eq!(settings.elapsed(1_000), Ok(0));
        assert_eq!(
            settings.elapsed(999),
            Err(Error::ClockBeforeEpoch {
                epoch: 1_000,
                now: 999
            })
        );
        let max = SnowflakeId::max_timestamp();
        assert_eq!(settings.elapsed(1_000 + max), Ok(max));
        assert_eq!(
            settings.elapsed(1_001 + max),
            Err(Error::TimestampOverflow {
                elapsed: max + 1,
                max
            })
        );
    }
}
