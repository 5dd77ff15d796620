//! Epoch helpers.
//!
//! Generated IDs encode milliseconds elapsed since an epoch. Unless a
//! generator is configured with an explicit epoch, it uses midnight UTC on
//! January 1 of the year the process started in. That value is computed once
//! per process by [`process_epoch`] and shared by every generator, so all
//! default-configured generators in a process agree on it.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::time::{SystemClock, TimeSource};

/// Returns midnight UTC, January 1 of `year`, in Unix milliseconds.
///
/// Returns `None` for years before 1970 or outside chrono's range.
///
/// ```
/// assert_eq!(seqflake::epoch_for_year(2025), Some(1_735_689_600_000));
/// assert_eq!(seqflake::epoch_for_year(1969), None);
/// ```
pub fn epoch_for_year(year: i32) -> Option<u64> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    u64::try_from(start.timestamp_millis()).ok()
}

/// Returns the start of the UTC year containing `unix_millis`.
pub fn year_epoch_of(unix_millis: u64) -> Option<u64> {
    let millis = i64::try_from(unix_millis).ok()?;
    let at = DateTime::<Utc>::from_timestamp_millis(millis)?;
    epoch_for_year(at.year())
}

/// The process-wide default epoch: start of the current UTC year, fixed the
/// first time it is requested.
pub fn process_epoch() -> u64 {
    static EPOCH: OnceLock<u64> = OnceLock::new();
    *EPOCH.get_or_init(|| year_epoch_of(SystemClock.current_millis()).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_year_starts() {
        assert_eq!(epoch_for_year(1970), Some(0));
        assert_eq!(epoch_for_year(2024), Some(1_704_067_200_000));
        assert_eq!(epoch_for_year(2025), Some(1_735_689_600_000));
    }

    #[test]
    fn year_epoch_rounds_down_to_january_first() {
        assert_eq!(year_epoch_of(1_735_689_600_000), Some(1_735_689_600_000));
        assert_eq!(year_epoch_of(1_735_689_599_999), Some(1_704_067_200_000));
        // 2025-10-09
        assert_eq!(year_epoch_of(1_760_000_000_000), Some(1_735_689_600_000));
    }

    #[test]
    fn process_epoch_is_stable_and_in_the_past() {
        let first = process_epoch();
        assert_eq!(process_epoch(), first);
        assert!(first <= SystemClock.current_millis());
        assert_eq!(year_epoch_of(first), Some(first));
    }
}
