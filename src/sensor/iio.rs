//! Linux IIO ADC sensor adapter.
//!
//! An ADS1015 (or compatible converter) driven by the kernel `ti-ads1015`
//! driver appears as `/sys/bus/iio/devices/iio:deviceN`. Each input
//! channel exposes two attribute files:
//!
//! - `in_voltageX_raw`: the current conversion in converter counts
//! - `in_voltageX_scale`: millivolts per count
//!
//! This adapter re-reads `in_voltageX_raw` on every acquisition and caches
//! the scale, which is fixed for a given gain setting.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{RawReading, SoilSensor};
use crate::error::AcquisitionError;

/// Soil moisture sensor read through the Linux IIO sysfs interface.
pub struct IioAdcSensor {
    device_dir: PathBuf,
    channel: u8,
    /// Millivolts per count, read once at open.
    scale_mv: Option<f64>,
}

impl IioAdcSensor {
    /// Create a sensor for one channel of an IIO device directory,
    /// e.g. `/sys/bus/iio/devices/iio:device0` channel 0.
    ///
    /// The device is not touched until [`SoilSensor::open`] is called.
    pub fn new(device_dir: impl Into<PathBuf>, channel: u8) -> Self {
        Self {
            device_dir: device_dir.into(),
            channel,
            scale_mv: None,
        }
    }

    fn raw_path(&self) -> PathBuf {
        self.device_dir
            .join(format!("in_voltage{}_raw", self.channel))
    }

    fn scale_path(&self) -> PathBuf {
        self.device_dir
            .join(format!("in_voltage{}_scale", self.channel))
    }

    async fn read_attribute(path: &Path) -> Result<f64, AcquisitionError> {
        let text = tokio::fs::read_to_string(path).await?;
        text.trim()
            .parse::<f64>()
            .map_err(|_| AcquisitionError::InvalidData {
                context: format!("{} contained {:?}", path.display(), text.trim()),
            })
    }
}

#[async_trait]
impl SoilSensor for IioAdcSensor {
    async fn open(&mut self) -> Result<(), AcquisitionError> {
        // Reading the scale attribute proves the channel exists and is
        // readable before the first scheduled acquisition.
        let scale_mv = Self::read_attribute(&self.scale_path()).await?;
        debug!(
            device = %self.device_dir.display(),
            channel = self.channel,
            scale_mv,
            "IIO channel opened"
        );
        self.scale_mv = Some(scale_mv);
        Ok(())
    }

    async fn acquire(&mut self) -> Result<RawReading, AcquisitionError> {
        let scale_mv = self.scale_mv.ok_or(AcquisitionError::NotReady)?;
        let counts = Self::read_attribute(&self.raw_path()).await?;

        // Differential channel configurations can report negative counts;
        // the calibration domain is unsigned, so those clamp to zero.
        let value = counts.clamp(0.0, f64::from(u16::MAX)) as u16;
        let voltage = counts * scale_mv / 1000.0;

        Ok(RawReading { value, voltage })
    }
}
