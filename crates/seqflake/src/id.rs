use core::{fmt, num::ParseIntError, str::FromStr};

/// A 64-bit Snowflake ID with separate data-center and worker fields.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits data-center ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21              17 16          12 11             0
///              +--------------+----------------+------------------+--------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | data center (5)  | worker (5)   | sequence (12) |
///              +--------------+----------------+------------------+--------------+---------------+
///              |<------------------- MSB ---------- 64 bits ---------- LSB ---------------------->|
/// ```
///
/// IDs order by their raw value, which orders them by timestamp first and
/// sequence last.
///
/// # Example
///
/// ```
/// use seqflake::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 3, 7, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.data_center_id(), 3);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_string().parse::<SnowflakeId>().unwrap(), id);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 5-bit data-center ID field. Occupies bits 17 through 21.
    pub const DATA_CENTER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for the 5-bit worker ID field. Occupies bits 12 through 16.
    pub const WORKER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    pub const TIMESTAMP_SHIFT: u64 = 22;
    pub const DATA_CENTER_ID_SHIFT: u64 = 17;
    pub const WORKER_ID_SHIFT: u64 = 12;
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the four fields, masking each to its width.
    pub const fn from(timestamp: u64, data_center_id: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let data_center_id =
            (data_center_id & Self::DATA_CENTER_ID_MASK) << Self::DATA_CENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | data_center_id | worker_id | sequence,
        }
    }

    /// Packs the four fields. Debug builds panic if a field overflows its
    /// width; release builds mask it.
    pub fn from_components(
        timestamp: u64,
        data_center_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(
            data_center_id <= Self::DATA_CENTER_ID_MASK,
            "data_center_id overflow"
        );
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, data_center_id, worker_id, sequence)
    }

    /// Milliseconds since the epoch.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    pub const fn data_center_id(&self) -> u64 {
        (self.id >> Self::DATA_CENTER_ID_SHIFT) & Self::DATA_CENTER_ID_MASK
    }

    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_data_center_id() -> u64 {
        Self::DATA_CENTER_ID_MASK
    }

    pub const fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the Unix millisecond this ID was issued at, given the epoch of
    /// the generator that produced it.
    pub const fn unix_millis(&self, epoch: u64) -> u64 {
        epoch + self.timestamp()
    }

    /// Returns `true` if the sequence can be incremented without wrapping.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::SEQUENCE_MASK
    }

    /// Returns the same ID with the sequence incremented by one.
    pub fn increment_sequence(&self) -> Self {
        Self::from_components(
            self.timestamp(),
            self.data_center_id(),
            self.worker_id(),
            self.sequence() + 1,
        )
    }

    /// Returns an ID for a newer timestamp with the sequence reset to zero.
    pub fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.data_center_id(), self.worker_id(), 0)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("raw", &format_args!("0x{:016x} ({})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("data_center_id", &self.data_center_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for SnowflakeId {
    type Err = ParseIntError;

    /// Parses the base-10 form produced by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_and_bounds() {
        let ts = SnowflakeId::max_timestamp();
        let dc = SnowflakeId::max_data_center_id();
        let worker = SnowflakeId::max_worker_id();
        let seq = SnowflakeId::max_sequence();

        let id = SnowflakeId::from(ts, dc, worker, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.data_center_id(), dc);
        assert_eq!(id.worker_id(), worker);
        assert_eq!(id.sequence(), seq);
        assert_eq!(SnowflakeId::from_components(ts, dc, worker, seq), id);
        // The reserved sign bit stays clear even with every field saturated.
        assert_eq!(id.to_raw() >> 63, 0);
        assert_eq!(id.to_raw(), u64::MAX >> 1);
    }

    #[test]
    fn packs_fields_at_fixed_offsets() {
        let id = SnowflakeId::from_components(5, 1, 2, 3);
        assert_eq!(id.to_raw(), (5 << 22) | (1 << 17) | (2 << 12) | 3);
        assert_eq!((id.to_raw() >> 22) & ((1 << 41) - 1), 5);
        assert_eq!((id.to_raw() >> 17) & 0x1F, 1);
        assert_eq!((id.to_raw() >> 12) & 0x1F, 2);
        assert_eq!(id.to_raw() & 0xFFF, 3);
    }

    #[test]
    fn worker_fields_are_disjoint() {
        let a = SnowflakeId::from_components(42, 1, 2, 7);
        let b = SnowflakeId::from_components(42, 1, 3, 7);
        assert_ne!(a, b);
        assert_eq!(a.to_raw() ^ b.to_raw(), 1 << SnowflakeId::WORKER_ID_SHIFT);
    }

    #[test]
    fn orders_by_timestamp_then_sequence() {
        let earlier = SnowflakeId::from_components(10, 31, 31, 4095);
        let later = SnowflakeId::from_components(11, 0, 0, 0);
        assert!(earlier < later);

        let first = SnowflakeId::from_components(10, 1, 1, 0);
        assert!(first < first.increment_sequence());
    }

    #[test]
    fn rollover_resets_sequence_and_keeps_ids() {
        let id = SnowflakeId::from_components(10, 4, 9, 4095);
        assert!(!id.has_sequence_room());

        let next = id.rollover_to_timestamp(11);
        assert_eq!(next.timestamp(), 11);
        assert_eq!(next.sequence(), 0);
        assert_eq!(next.data_center_id(), 4);
        assert_eq!(next.worker_id(), 9);
    }

    #[test]
    fn display_is_plain_decimal() {
        let id = SnowflakeId::from_components(1, 0, 0, 0);
        assert_eq!(id.to_string(), "4194304");
        assert_eq!(SnowflakeId::from_raw(0).to_string(), "0");
        assert_eq!("4194304".parse::<SnowflakeId>().unwrap(), id);
        assert!("-1".parse::<SnowflakeId>().is_err());
        assert!("4_194_304".parse::<SnowflakeId>().is_err());
    }

    #[test]
    fn unix_millis_adds_epoch() {
        let id = SnowflakeId::from_components(250, 0, 0, 0);
        assert_eq!(id.unix_millis(1_000), 1_250);
    }

    #[test]
    fn debug_lists_every_field() {
        let dbg = format!("{:?}", SnowflakeId::from_components(1, 2, 3, 4));
        for field in ["timestamp: 1", "data_center_id: 2", "worker_id: 3", "sequence: 4"] {
            assert!(dbg.contains(field), "{dbg}");
        }
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let ts = SnowflakeId::max_timestamp() + 1;
        SnowflakeId::from_components(ts, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "data_center_id overflow")]
    fn data_center_id_overflow_panics() {
        SnowflakeId::from_components(0, 32, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        SnowflakeId::from_components(0, 0, 32, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let seq = SnowflakeId::max_sequence() + 1;
        SnowflakeId::from_components(0, 0, 0, seq);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_raw_integer() {
        let id = SnowflakeId::from_components(3, 1, 1, 9);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
