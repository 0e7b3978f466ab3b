//! Alert events and the per-cycle decision policy.
//!
//! [`AlertEvent`] is the full taxonomy of messages the monitor can emit.
//! [`decide`] turns one successful measurement into the ordered event
//! sequence for that cycle; the remaining variants are produced directly
//! by the monitor's failure handling.

use chrono::{DateTime, Local};

use crate::calibration::MoistureReading;

/// Timestamp format used in outbound messages.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Everything the monitor can report.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    /// Routine per-cycle measurement report. Sent every successful cycle
    /// with no deduplication, doubling as a liveness signal.
    Status {
        /// The normalized measurement.
        reading: MoistureReading,
        /// When the measurement was taken.
        timestamp: DateTime<Local>,
    },

    /// The moisture percentage is below the warning threshold.
    Warning {
        /// The normalized measurement.
        reading: MoistureReading,
        /// When the measurement was taken.
        timestamp: DateTime<Local>,
    },

    /// A sensor read failed this cycle.
    AcquisitionFailure {
        /// When the failed cycle ran.
        timestamp: DateTime<Local>,
        /// Description of the failure.
        cause: String,
    },

    /// A delivery attempt failed. Reported on the log stream only; never
    /// itself delivered, which would recurse.
    NotificationFailure {
        /// Description of the failure.
        cause: String,
    },

    /// The sensor could not be opened at startup.
    StartupFailure {
        /// Description of the failure.
        cause: String,
    },

    /// The monitor is shutting down cleanly.
    ShutdownNotice,

    /// An error escaped per-cycle classification.
    UnexpectedFailure {
        /// Description of the failure.
        cause: String,
    },
}

impl AlertEvent {
    /// Render the human-readable message sent to the notification channel.
    pub fn message(&self) -> String {
        match self {
            Self::Status { reading, timestamp } => format!(
                "🌱 Soil moisture: {:.1}% ({})",
                reading.display_percent(),
                timestamp.format(TIMESTAMP_FORMAT)
            ),
            Self::Warning { reading, .. } => format!(
                "⚠️ Soil is drying out ({:.1}%) - consider watering",
                reading.display_percent()
            ),
            Self::AcquisitionFailure { timestamp, cause } => format!(
                "🚨 Error: sensor read failed ({}): {}",
                timestamp.format(TIMESTAMP_FORMAT),
                cause
            ),
            Self::NotificationFailure { cause } => {
                format!("notification delivery failed: {cause}")
            }
            Self::StartupFailure { cause } => format!(
                "🚨 Error: sensor initialization failed, monitor exiting: {cause}"
            ),
            Self::ShutdownNotice => "🛑 Soil moisture monitor stopped".to_string(),
            Self::UnexpectedFailure { cause } => format!("🚨 System error: {cause}"),
        }
    }
}

/// Decide which events one successful measurement produces.
///
/// Always one [`AlertEvent::Status`]; additionally one
/// [`AlertEvent::Warning`] when the unrounded percentage is strictly
/// below `threshold`. Order is stable (status first, then warning) so a
/// reader of the channel sees the measurement before the nag.
pub fn decide(
    reading: &MoistureReading,
    threshold: f64,
    timestamp: DateTime<Local>,
) -> Vec<AlertEvent> {
    let mut events = vec![AlertEvent::Status {
        reading: *reading,
        timestamp,
    }];

    if reading.percent < threshold {
        events.push(AlertEvent::Warning {
            reading: *reading,
            timestamp,
        });
    }

    events
}
