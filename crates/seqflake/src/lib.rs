//! # seqflake
//!
//! Coordinator-free, roughly time-sortable 64-bit IDs in the Snowflake layout:
//!
//! ```text
//! [ 1 reserved ][ 41 timestamp ][ 5 data center ][ 5 worker ][ 12 sequence ]
//! ```
//!
//! Each generator owns one `(data_center_id, worker_id)` pair and a
//! per-millisecond sequence. Distinct pairs occupy disjoint bit ranges, so
//! independently deployed generators never collide. Within one generator IDs
//! are unique and strictly increasing as long as the clock does not move
//! backward; if it does, generation is refused with
//! [`Error::ClockRegression`] instead of risking a duplicate.
//!
//! ```
//! use seqflake::{LockSequenceGenerator, SequenceGenerator};
//!
//! let generator = LockSequenceGenerator::new(1, 2)?;
//!
//! let id = generator.next_id()?;
//! assert_eq!(id.data_center_id(), 1);
//! assert_eq!(id.worker_id(), 2);
//!
//! let (raw, text) = generator.next_raw_and_string()?;
//! assert_eq!(text, raw.to_string());
//! # Ok::<(), seqflake::Error>(())
//! ```
//!
//! ## Generators
//!
//! - [`LockSequenceGenerator`]: one mutex per instance; an exhausted sequence
//!   makes the caller spin inside the lock until the next millisecond.
//! - [`AtomicSequenceGenerator`]: the same contract implemented with a
//!   compare-and-swap loop over the last issued ID.
//!
//! ## Clocks
//!
//! Generators read a [`TimeSource`] returning Unix milliseconds.
//! [`SystemClock`] is the wall clock and can regress under NTP steps;
//! [`MonotonicClock`] is anchored to the wall clock once and then only moves
//! forward. Timestamps are stored relative to an epoch, by default midnight UTC
//! on January 1 of the current year ([`process_epoch`]), which leaves roughly
//! 69 years of timestamp space.
//!
//! ## Features
//!
//! - `tracing` (default): spans on ID generation and warnings on clock
//!   regressions and approaching timestamp exhaustion.
//! - `parking-lot`: use `parking_lot::Mutex`, which cannot be poisoned.
//! - `serde`: (de)serialize [`SnowflakeId`] and [`GeneratorConfig`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod generator;
mod id;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
