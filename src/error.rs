//! Error types for the soilwatch crate.
//!
//! Every fallible boundary (sensor acquisition, notification delivery)
//! returns its own discriminated error; [`Error`] is the crate-level type
//! the monitor dispatches on. Configuration errors are fatal at startup,
//! acquisition and delivery errors are contained per cycle, and anything
//! that does not fit those classes is [`Error::Internal`] and stops the
//! monitor.

use thiserror::Error;

/// Failure modes of the sensor acquisition boundary.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The sensor backing store could not be read.
    #[error("sensor I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sensor handle has not been opened yet.
    #[error("sensor not ready")]
    NotReady,

    /// The sensor produced data that could not be interpreted.
    #[error("invalid sensor data: {context}")]
    InvalidData {
        /// Description of what was invalid about the data.
        context: String,
    },

    /// The underlying bus or converter reported an error.
    #[error("sensor bus error: {reason}")]
    Bus {
        /// Description of the bus-level failure.
        reason: String,
    },
}

/// Failure modes of the notification delivery boundary.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// No notification endpoint is configured; delivery short-circuits
    /// without a network attempt.
    #[error("notification endpoint not configured")]
    EndpointNotConfigured,

    /// The HTTP request failed (connect, DNS, timeout).
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("notification endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration. Fatal; only produced before the monitor
    /// enters its measurement loop.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// A sensor read failed. Recoverable: reported and retried on the
    /// next scheduled cycle.
    #[error("acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// A notification could not be delivered. Recoverable: logged
    /// locally, never re-escalated.
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    /// Anything that does not match the other classes. Fatal.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_error_display() {
        let err = AcquisitionError::Bus {
            reason: "i2c transfer failed".to_string(),
        };
        assert_eq!(err.to_string(), "sensor bus error: i2c transfer failed");
        assert_eq!(AcquisitionError::NotReady.to_string(), "sensor not ready");
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::HttpStatus(502);
        assert_eq!(err.to_string(), "notification endpoint returned HTTP 502");
        assert_eq!(
            DeliveryError::EndpointNotConfigured.to_string(),
            "notification endpoint not configured"
        );
    }

    #[test]
    fn test_boundary_errors_convert_to_crate_error() {
        let err: Error = AcquisitionError::NotReady.into();
        assert!(matches!(err, Error::Acquisition(_)));

        let err: Error = DeliveryError::HttpStatus(404).into();
        assert!(matches!(err, Error::Delivery(_)));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = Error::Configuration {
            reason: "poll interval must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: poll interval must be positive"
        );
    }
}
