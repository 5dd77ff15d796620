use crate::{Result, SnowflakeId};

/// A minimal interface for generating Snowflake IDs.
///
/// Implementations are safe to call from any number of threads at once. Each
/// successful call is one generation event; the `next_*` helpers only differ
/// in how that single ID is rendered, so text and integer forms of one call
/// always agree.
pub trait SequenceGenerator {
    /// Generates the next ID, blocking briefly if the current millisecond's
    /// sequence space is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued timestamp
    /// - [`Error::ClockBeforeEpoch`] if the clock reads earlier than the epoch
    /// - [`Error::TimestampOverflow`] if the 41-bit timestamp is exhausted
    ///
    /// No state changes when an error is returned.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::ClockBeforeEpoch`]: crate::Error::ClockBeforeEpoch
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    fn next_id(&self) -> Result<SnowflakeId>;

    /// The data-center ID encoded into every ID.
    fn data_center_id(&self) -> u64;

    /// The worker ID encoded into every ID.
    fn worker_id(&self) -> u64;

    /// The epoch, in Unix milliseconds, timestamps are measured from.
    fn epoch(&self) -> u64;

    /// Generates the next ID as its raw 64-bit value.
    fn next_raw(&self) -> Result<u64> {
        self.next_id().map(|id| id.to_raw())
    }

    /// Generates the next ID rendered as a base-10 string.
    fn next_string(&self) -> Result<String> {
        self.next_id().map(|id| id.to_string())
    }

    /// Generates one ID and returns both its raw value and base-10 string.
    fn next_raw_and_string(&self) -> Result<(u64, String)> {
        let id = self.next_id()?;
        Ok((id.to_raw(), id.to_string()))
    }
}
