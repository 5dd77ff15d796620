//! Error types for configuring generators and producing IDs.
//!
//! Every error is reported synchronously to the caller. No partial ID is ever
//! returned and, apart from the sequence-exhaustion wait (which is not an
//! error), nothing is retried internally.

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `seqflake` can emit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The generator could not be constructed from the given configuration.
    ///
    /// Not retryable without correcting the input.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// Generator state is left untouched; the caller may retry once the clock
    /// catches up.
    #[error(
        "clock moved backwards: refusing to generate id, last timestamp is {last}ms, now is {now}ms"
    )]
    ClockRegression {
        /// Last Unix millisecond an ID was issued for.
        last: u64,
        /// Unix millisecond observed by this call.
        now: u64,
    },

    /// The clock reported a time earlier than the configured epoch, before any
    /// ID was issued.
    #[error("clock is before the epoch: epoch is {epoch}ms, now is {now}ms")]
    ClockBeforeEpoch {
        /// Configured epoch in Unix milliseconds.
        epoch: u64,
        /// Unix millisecond observed by this call.
        now: u64,
    },

    /// Elapsed time since the epoch no longer fits in the 41-bit timestamp.
    ///
    /// Unrecoverable without choosing a new epoch and redeploying.
    #[error("timestamp overflow: {elapsed}ms since epoch exceeds the maximum of {max}ms")]
    TimestampOverflow {
        /// Milliseconds elapsed since the epoch.
        elapsed: u64,
        /// Largest encodable timestamp.
        max: u64,
    },

    /// The state lock was poisoned by a panic in another thread.
    ///
    /// Only reachable with the std mutex; `parking_lot` mutexes do not poison.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator state lock was poisoned")]
    LockPoisoned,
}

/// Reasons a [`GeneratorConfig`](crate::GeneratorConfig) is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An id field does not fit its bit width.
    #[error("{field} should be between 0 and {max}, got {value}")]
    IdOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The epoch lies after the clock's current reading.
    #[error("epoch {epoch}ms is after the current time {now}ms")]
    EpochAfterNow {
        /// Configured epoch in Unix milliseconds.
        epoch: u64,
        /// Clock reading at construction.
        now: u64,
    },
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
