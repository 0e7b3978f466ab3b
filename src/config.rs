//! Daemon configuration.
//!
//! Built once at startup from environment variables and passed by value
//! into the monitor. Nothing reads the environment after startup, and
//! nothing mutates the configuration afterwards.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::calibration::CalibrationProfile;
use crate::error::{Error, Result};
use crate::notify::slack::DEFAULT_DELIVERY_TIMEOUT;

/// Default delay between measurement cycles: 30 minutes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Default warning threshold as a moisture percentage.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 30.0;

/// Which sensor adapter the daemon drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorSelection {
    /// Deterministic simulated sensor; no hardware required.
    Simulated,
    /// One channel of a Linux IIO ADC device.
    Iio {
        /// Device directory, e.g. `/sys/bus/iio/devices/iio:device0`.
        device_dir: PathBuf,
        /// Input channel number.
        channel: u8,
    },
}

/// Immutable runtime configuration for the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Slack incoming-webhook URL. Unset means every delivery
    /// short-circuits and alerts appear in the log only.
    pub webhook_url: Option<String>,
    /// Fixed delay between measurement cycles.
    pub poll_interval: Duration,
    /// Calibration endpoints for the connected probe.
    pub calibration: CalibrationProfile,
    /// Moisture percentage below which a warning is sent.
    pub warning_threshold: f64,
    /// Upper bound on a single delivery attempt.
    pub delivery_timeout: Duration,
    /// Sensor adapter selection.
    pub sensor: SensorSelection,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            calibration: CalibrationProfile::DEFAULT,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            sensor: SensorSelection::Simulated,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default   |
    /// |----------------------------------|-----------|
    /// | `SOILWATCH_WEBHOOK_URL`          | unset     |
    /// | `SOILWATCH_POLL_INTERVAL_SECS`   | `1800`    |
    /// | `SOILWATCH_DRY_RAW`              | `26000`   |
    /// | `SOILWATCH_WET_RAW`              | `13000`   |
    /// | `SOILWATCH_WARN_THRESHOLD`       | `30`      |
    /// | `SOILWATCH_DELIVERY_TIMEOUT_SECS`| `10`      |
    /// | `SOILWATCH_SENSOR`               | `sim`     |
    /// | `SOILWATCH_IIO_DEVICE`           | unset     |
    /// | `SOILWATCH_IIO_CHANNEL`          | `0`       |
    ///
    /// `SOILWATCH_SENSOR` accepts `sim` or `iio`; the latter requires
    /// `SOILWATCH_IIO_DEVICE` to point at the IIO device directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a variable fails to parse or
    /// a startup invariant is violated.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let webhook_url = env_string("SOILWATCH_WEBHOOK_URL")?;

        let poll_interval = env_parse::<u64>("SOILWATCH_POLL_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        let calibration = CalibrationProfile::new(
            env_parse("SOILWATCH_DRY_RAW")?.unwrap_or(defaults.calibration.dry_raw),
            env_parse("SOILWATCH_WET_RAW")?.unwrap_or(defaults.calibration.wet_raw),
        );

        let warning_threshold =
            env_parse("SOILWATCH_WARN_THRESHOLD")?.unwrap_or(defaults.warning_threshold);

        let delivery_timeout = env_parse::<u64>("SOILWATCH_DELIVERY_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.delivery_timeout);

        let sensor = match env_string("SOILWATCH_SENSOR")?.as_deref() {
            None | Some("sim") => SensorSelection::Simulated,
            Some("iio") => {
                let device_dir = env_string("SOILWATCH_IIO_DEVICE")?.ok_or_else(|| {
                    Error::Configuration {
                        reason: "SOILWATCH_SENSOR=iio requires SOILWATCH_IIO_DEVICE".to_string(),
                    }
                })?;
                let channel = env_parse("SOILWATCH_IIO_CHANNEL")?.unwrap_or(0);
                SensorSelection::Iio {
                    device_dir: PathBuf::from(device_dir),
                    channel,
                }
            }
            Some(other) => {
                return Err(Error::Configuration {
                    reason: format!("SOILWATCH_SENSOR must be `sim` or `iio`, got {other:?}"),
                })
            }
        };

        let config = Self {
            webhook_url,
            poll_interval,
            calibration,
            warning_threshold,
            delivery_timeout,
            sensor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check startup invariants.
    ///
    /// A configuration that fails here must never reach the monitor: the
    /// calibration span check in particular turns a would-be per-cycle
    /// failure into a startup-fatal one.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::Configuration {
                reason: "poll interval must be positive".to_string(),
            });
        }
        if self.delivery_timeout.is_zero() {
            return Err(Error::Configuration {
                reason: "delivery timeout must be positive".to_string(),
            });
        }
        if !self.warning_threshold.is_finite() {
            return Err(Error::Configuration {
                reason: "warning threshold must be a finite number".to_string(),
            });
        }
        self.calibration.validate()
    }
}

/// Read an environment variable as a trimmed string, `None` when unset
/// or empty.
fn env_string(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(raw) => {
            let trimmed = raw.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(Error::Configuration {
            reason: format!("{name} is not valid UTF-8"),
        }),
    }
}

/// Read and parse an environment variable, `None` when unset.
fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env_string(name)? {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| Error::Configuration {
            reason: format!("invalid value for {name}: {raw:?}"),
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that
    // touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_soilwatch_env() {
        for (key, _) in std::env::vars() {
            if key.starts_with("SOILWATCH_") {
                std::env::remove_var(&key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();

        assert_eq!(config.poll_interval, Duration::from_secs(1800));
        assert_eq!(config.warning_threshold, 30.0);
        assert_eq!(config.delivery_timeout, Duration::from_secs(10));
        assert_eq!(config.calibration, CalibrationProfile::new(26_000, 13_000));
        assert_eq!(config.sensor, SensorSelection::Simulated);
        assert!(config.webhook_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_with_no_variables_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_soilwatch_env();

        let config = MonitorConfig::from_env().unwrap();
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_from_env_reads_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_soilwatch_env();

        std::env::set_var("SOILWATCH_WEBHOOK_URL", "https://hooks.example/x");
        std::env::set_var("SOILWATCH_POLL_INTERVAL_SECS", "60");
        std::env::set_var("SOILWATCH_DRY_RAW", "24000");
        std::env::set_var("SOILWATCH_WET_RAW", "11000");
        std::env::set_var("SOILWATCH_WARN_THRESHOLD", "25.5");
        std::env::set_var("SOILWATCH_SENSOR", "iio");
        std::env::set_var("SOILWATCH_IIO_DEVICE", "/sys/bus/iio/devices/iio:device0");
        std::env::set_var("SOILWATCH_IIO_CHANNEL", "2");

        let config = MonitorConfig::from_env().unwrap();
        clear_soilwatch_env();

        assert_eq!(config.webhook_url.as_deref(), Some("https://hooks.example/x"));
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.calibration, CalibrationProfile::new(24_000, 11_000));
        assert_eq!(config.warning_threshold, 25.5);
        assert_eq!(
            config.sensor,
            SensorSelection::Iio {
                device_dir: PathBuf::from("/sys/bus/iio/devices/iio:device0"),
                channel: 2,
            }
        );
    }

    #[test]
    fn test_from_env_rejects_unparseable_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_soilwatch_env();

        std::env::set_var("SOILWATCH_POLL_INTERVAL_SECS", "half an hour");
        let err = MonitorConfig::from_env().unwrap_err();
        clear_soilwatch_env();

        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_from_env_rejects_unknown_sensor() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_soilwatch_env();

        std::env::set_var("SOILWATCH_SENSOR", "gpio");
        let err = MonitorConfig::from_env().unwrap_err();
        clear_soilwatch_env();

        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = MonitorConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_equal_calibration_endpoints() {
        let config = MonitorConfig {
            calibration: CalibrationProfile::new(20_000, 20_000),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
