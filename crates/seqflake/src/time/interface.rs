use std::sync::Arc;

/// A source of wall-clock time in **milliseconds since the Unix epoch**.
///
/// Generators read the clock once per ID (and repeatedly while waiting out an
/// exhausted sequence), then subtract their own epoch. Plugging in a mock
/// source makes clock regressions and sequence exhaustion reproducible.
///
/// # Example
///
/// ```
/// use seqflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
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
