//! Sensor gateway.
//!
//! Abstracts raw soil moisture acquisition behind the [`SoilSensor`]
//! trait. The monitor does not care how raw values are obtained (an I²C
//! ADC exposed through the Linux IIO subsystem, a simulation, or a mock),
//! only that each acquisition yields converter counts plus the measured
//! channel voltage, or fails with a typed error.

pub mod iio;
pub mod sim;

pub use iio::IioAdcSensor;
pub use sim::SimulatedSensor;

use async_trait::async_trait;

use crate::error::AcquisitionError;

/// One raw acquisition from the converter.
///
/// Created by a [`SoilSensor`] implementation and consumed immediately by
/// the calibration mapper; readings are never retained across cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawReading {
    /// Raw converter counts.
    pub value: u16,
    /// Measured channel voltage in volts.
    pub voltage: f64,
}

/// A source of raw soil moisture readings.
///
/// `open` is called exactly once before the first acquisition; an error
/// there is startup-fatal. `acquire` is called once per measurement cycle
/// and may fail freely; the monitor reports the failure and retries on
/// the next scheduled cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SoilSensor: Send {
    /// Open the underlying device.
    async fn open(&mut self) -> Result<(), AcquisitionError>;

    /// Take one reading.
    async fn acquire(&mut self) -> Result<RawReading, AcquisitionError>;
}
