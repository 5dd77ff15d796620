use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    GeneratorConfig, Result, SnowflakeId, TimeSource,
    generator::{
        SequenceGenerator,
        common::{Settings, cold_clock_behind, wait_for_next_millis},
    },
};

/// State marker for "nothing issued yet". Sets the reserved sign bit, which no
/// packed ID ever does.
const NEVER_ISSUED: u64 = u64::MAX;

/// A lock-free Snowflake ID generator built on a compare-and-swap loop.
///
/// The last issued ID is kept in a single [`AtomicU64`]; its timestamp and
/// sequence fields double as the generator's `(last timestamp, sequence)`
/// state, so both advance in one atomic step and a partial update is never
/// observable. Callers that lose a race simply retry with the fresh state.
///
/// When the sequence for the current millisecond is exhausted the caller
/// spins until the clock advances, without blocking other callers from
/// re-reading the state.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Lock-free
/// - ⚠️ No fairness guarantees under heavy contention
///
/// ## See Also
/// - [`LockSequenceGenerator`]
///
/// [`LockSequenceGenerator`]: crate::LockSequenceGenerator
#[derive(Debug)]
pub struct AtomicSequenceGenerator<T>
where
    T: TimeSource,
{
    state: AtomicU64,
    pub(crate) settings: Settings,
    clock: T,
}

impl<T> AtomicSequenceGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator from an explicit configuration and time source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if an ID is out of range or the
    /// epoch lies after the clock's current reading.
    ///
    /// # Example
    ///
    /// ```
    /// use seqflake::{AtomicSequenceGenerator, GeneratorConfig, SystemClock};
    ///
    /// let generator =
    ///     AtomicSequenceGenerator::with_config(GeneratorConfig::new(0, 9), SystemClock).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.worker_id(), 9);
    /// ```
    ///
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn with_config(config: GeneratorConfig, clock: T) -> Result<Self> {
        let settings = Settings::resolve(&config, &clock)?;
        Ok(Self {
            state: AtomicU64::new(NEVER_ISSUED),
            settings,
            clock,
        })
    }

    /// Generates the next ID.
    ///
    /// See [`SequenceGenerator::next_id`] for the error contract.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        loop {
            // Load before reading the clock: any timestamp already stored was
            // read from the clock earlier, so it cannot be ahead of `now`
            // unless the clock itself regressed.
            let current_raw = self.state.load(Ordering::Acquire);
            let now = self.clock.current_millis();

            let next_id = if current_raw == NEVER_ISSUED {
                self.settings.pack(self.settings.elapsed(now)?, 0)
            } else {
                let current = SnowflakeId::from_raw(current_raw);
                let last = current.unix_millis(self.settings.epoch);

                match now.cmp(&last) {
                    cmp::Ordering::Less => return Err(cold_clock_behind(last, now)),
                    cmp::Ordering::Equal if current.has_sequence_room() => {
                        current.increment_sequence()
                    }
                    cmp::Ordering::Equal => {
                        let now = wait_for_next_millis(&self.clock, last);
                        current.rollover_to_timestamp(self.settings.elapsed(now)?)
                    }
                    cmp::Ordering::Greater => {
                        current.rollover_to_timestamp(self.settings.elapsed(now)?)
                    }
                }
            };

            if self
                .state
                .compare_exchange(
                    current_raw,
                    next_id.to_raw(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return Ok(next_id);
            }

            // Another caller won the race; retry against its state.
            core::hint::spin_loop();
        }
    }
}

impl<T> SequenceGenerator for AtomicSequenceGenerator<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn data_center_id(&self) -> u64 {
        self.settings.data_center_id
    }

    fn worker_id(&self) -> u64 {
        self.settings.worker_id
    }

    fn epoch(&self) -> u64 {
        self.settings.epoch
    }
}
