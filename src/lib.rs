//! # soilwatch
//!
//! An always-on soil moisture monitor for a single capacitive probe,
//! with Slack webhook alerting.
//!
//! The monitor samples the sensor on a fixed schedule, normalizes the
//! raw converter counts into a moisture percentage via a two-point
//! calibration, and pushes a human-readable status message every cycle,
//! plus a warning when the soil drops below the configured threshold.
//! Acquisition failures are reported and retried on the next cycle;
//! delivery failures are logged locally and never re-escalated.
//!
//! ## Features
//!
//! - **Two-point calibration**: map raw ADC counts to a clamped 0–100%
//!   moisture scale from dry/wet reference measurements
//! - **Fixed-interval polling**: one measurement cycle every 30 minutes
//!   by default, with bounded-latency shutdown
//! - **Threshold warnings**: an extra alert whenever moisture falls
//!   below the warning threshold
//! - **Typed failure handling**: startup, acquisition, delivery, and
//!   unexpected failures each follow their own containment policy
//! - **Pluggable gateways**: sensors and notifiers are traits; a Linux
//!   IIO ADC adapter, a Slack webhook adapter, and a simulated sensor
//!   ship in the box
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soilwatch::{Monitor, MonitorConfig, Result, SimulatedSensor, SlackNotifier};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = MonitorConfig::default();
//!     let sensor = SimulatedSensor::new(config.calibration);
//!     let notifier = SlackNotifier::new(config.webhook_url.clone());
//!
//!     let cancel = CancellationToken::new();
//!     let handle = cancel.clone();
//!     tokio::spawn(async move {
//!         tokio::signal::ctrl_c().await.ok();
//!         handle.cancel();
//!     });
//!
//!     Monitor::new(config, sensor, notifier).run(cancel).await
//! }
//! ```
//!
//! ## Hardware Notes
//!
//! The shipped [`IioAdcSensor`] reads an ADS1015 (or any IIO-exposed
//! ADC) through `/sys/bus/iio/devices/iio:deviceN`. Load the kernel
//! `ti-ads1015` driver and point `SOILWATCH_IIO_DEVICE` at the device
//! directory; any other acquisition path is a [`SoilSensor`]
//! implementation away.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod alert;
pub mod calibration;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod sensor;

// Re-exports for convenience
pub use alert::AlertEvent;
pub use calibration::{CalibrationProfile, MoistureReading};
pub use config::{MonitorConfig, SensorSelection};
pub use error::{AcquisitionError, DeliveryError, Error, Result};
pub use monitor::{Monitor, MonitorState};
pub use notify::{Notifier, SlackNotifier};
pub use sensor::{IioAdcSensor, RawReading, SimulatedSensor, SoilSensor};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that key types are exported
        let _ = std::any::TypeId::of::<CalibrationProfile>();
        let _ = std::any::TypeId::of::<MoistureReading>();
        let _ = std::any::TypeId::of::<MonitorConfig>();
        let _ = std::any::TypeId::of::<MonitorState>();
        let _ = std::any::TypeId::of::<AlertEvent>();
        let _ = std::any::TypeId::of::<Error>();
    }

    #[test]
    fn test_default_profile_normalizes_midpoint() {
        let profile = CalibrationProfile::default();
        let raw = RawReading {
            value: 19_500,
            voltage: 2.44,
        };
        assert_eq!(profile.normalize(&raw).unwrap().percent, 50.0);
    }
}
