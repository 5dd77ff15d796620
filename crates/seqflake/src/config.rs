//! Generator configuration.
//!
//! A [`GeneratorConfig`] carries the caller-assigned data-center and worker
//! IDs plus optional overrides. Assigning unique `(data_center_id, worker_id)`
//! pairs across a deployment is the caller's responsibility.
//!
//! With the `serde` feature enabled the config can be deserialized from any
//! serde format; missing fields take their defaults and negative IDs are
//! rejected by the deserializer.

use core::time::Duration;

use crate::{ConfigError, SnowflakeId, process_epoch};

/// Default headroom before the 41-bit timestamp runs out at which generators
/// start warning.
pub const DEFAULT_OVERFLOW_WARNING: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Construction parameters for a sequence generator.
///
/// # Example
///
/// ```
/// use seqflake::GeneratorConfig;
///
/// let config = GeneratorConfig::new(1, 2).with_epoch(1_735_689_600_000);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.resolved_epoch(), 1_735_689_600_000);
///
/// assert!(GeneratorConfig::new(32, 0).validate().is_err());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Data-center ID, `0..=31`.
    pub data_center_id: u64,

    /// Worker ID, `0..=31`.
    pub worker_id: u64,

    /// Epoch in Unix milliseconds. `None` uses [`process_epoch`].
    pub epoch: Option<u64>,

    /// Warn once when fewer than this many milliseconds of timestamp space
    /// remain. Zero disables the warning.
    #[cfg_attr(feature = "serde", serde(with = "duration_millis"))]
    pub overflow_warning: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            data_center_id: 0,
            worker_id: 0,
            epoch: None,
            overflow_warning: DEFAULT_OVERFLOW_WARNING,
        }
    }
}

impl GeneratorConfig {
    pub fn new(data_center_id: u64, worker_id: u64) -> Self {
        Self {
            data_center_id,
            worker_id,
            ..Self::default()
        }
    }

    /// Pins the epoch instead of using the process default.
    ///
    /// Changing the epoch of a deployment after IDs have been issued breaks
    /// ordering and may reintroduce previously issued values.
    #[must_use]
    pub fn with_epoch(mut self, epoch_millis: u64) -> Self {
        self.epoch = Some(epoch_millis);
        self
    }

    #[must_use]
    pub fn with_overflow_warning(mut self, headroom: Duration) -> Self {
        self.overflow_warning = headroom;
        self
    }

    /// Checks that both IDs fit their 5-bit fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IdOutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "data_center_id",
            self.data_center_id,
            SnowflakeId::max_data_center_id(),
        )?;
        check_range("worker_id", self.worker_id, SnowflakeId::max_worker_id())
    }

    /// The epoch generators built from this config will use.
    pub fn resolved_epoch(&self) -> u64 {
        self.epoch.unwrap_or_else(process_epoch)
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::IdOutOfRange { field, value, max });
    }
    Ok(())
}

#[cfg(feature = "serde")]
mod duration_millis {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_ids_are_accepted() {
        assert!(GeneratorConfig::new(0, 0).validate().is_ok());
        assert!(GeneratorConfig::new(31, 31).validate().is_ok());
    }

    #[test]
    fn out_of_range_ids_name_the_field() {
        assert_eq!(
            GeneratorConfig::new(32, 0).validate(),
            Err(ConfigError::IdOutOfRange {
                field: "data_center_id",
                value: 32,
                max: 31
            })
        );
        assert_eq!(
            GeneratorConfig::new(0, 32).validate(),
            Err(ConfigError::IdOutOfRange {
                field: "worker_id",
                value: 32,
                max: 31
            })
        );
        assert!(matches!(
            GeneratorConfig::new(u64::MAX, u64::MAX).validate(),
            Err(ConfigError::IdOutOfRange {
                field: "data_center_id",
                ..
            })
        ));
    }

    #[test]
    fn epoch_defaults_to_process_epoch() {
        let config = GeneratorConfig::default();
        assert_eq!(config.epoch, None);
        assert_eq!(config.resolved_epoch(), process_epoch());
        assert_eq!(config.with_epoch(7).resolved_epoch(), 7);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"data_center_id": 3, "worker_id": 4}"#).unwrap();
        assert_eq!(config, GeneratorConfig::new(3, 4));

        let config: GeneratorConfig = serde_json::from_str(
            r#"{"worker_id": 1, "epoch": 1000, "overflow_warning": 60000}"#,
        )
        .unwrap();
        assert_eq!(config.data_center_id, 0);
        assert_eq!(config.epoch, Some(1000));
        assert_eq!(config.overflow_warning, Duration::from_secs(60));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn negative_ids_fail_to_deserialize() {
        assert!(serde_json::from_str::<GeneratorConfig>(r#"{"data_center_id": -1}"#).is_err());
        assert!(serde_json::from_str::<GeneratorConfig>(r#"{"worker_id": -1}"#).is_err());
    }
}
