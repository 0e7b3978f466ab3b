//! Simulated sensor.
//!
//! Produces a deterministic triangle wave across the calibration span, so
//! a run without hardware exercises both sides of the warning threshold.

use async_trait::async_trait;

use super::{RawReading, SoilSensor};
use crate::calibration::CalibrationProfile;
use crate::error::AcquisitionError;

/// Deterministic stand-in for a physical soil moisture sensor.
///
/// Sweeps linearly from one calibration endpoint to the other and back,
/// one step per acquisition. Useful for dry runs of the daemon and for
/// tests that need plausible readings without an ADC attached.
pub struct SimulatedSensor {
    profile: CalibrationProfile,
    steps_per_sweep: u32,
    tick: u32,
}

impl SimulatedSensor {
    /// Volts per count for an ADS1015 at gain 1 (±4.096 V full scale).
    const VOLTS_PER_COUNT: f64 = 4.096 / 32767.0;

    const DEFAULT_STEPS: u32 = 8;

    /// Create a simulated sensor sweeping across `profile`'s span.
    pub fn new(profile: CalibrationProfile) -> Self {
        Self::with_steps(profile, Self::DEFAULT_STEPS)
    }

    /// Create a simulated sensor with a custom sweep resolution.
    pub fn with_steps(profile: CalibrationProfile, steps_per_sweep: u32) -> Self {
        Self {
            profile,
            steps_per_sweep: steps_per_sweep.clamp(1, u32::MAX / 2),
            tick: 0,
        }
    }

    fn value_at(&self, tick: u32) -> u16 {
        let lo = self.profile.dry_raw.min(self.profile.wet_raw);
        let hi = self.profile.dry_raw.max(self.profile.wet_raw);
        let span = u32::from(hi - lo);

        let steps = self.steps_per_sweep;
        let phase = tick % (2 * steps);
        // Ascend for `steps` acquisitions, then descend back.
        let position = if phase <= steps { phase } else { 2 * steps - phase };

        let offset = u64::from(span) * u64::from(position) / u64::from(steps);
        lo + offset as u16
    }
}

#[async_trait]
impl SoilSensor for SimulatedSensor {
    async fn open(&mut self) -> Result<(), AcquisitionError> {
        Ok(())
    }

    async fn acquire(&mut self) -> Result<RawReading, AcquisitionError> {
        let value = self.value_at(self.tick);
        self.tick = self.tick.wrapping_add(1);

        Ok(RawReading {
            value,
            voltage: f64::from(value) * Self::VOLTS_PER_COUNT,
        })
    }
}
