//! Soil moisture calibration.
//!
//! Maps raw converter counts onto a bounded moisture percentage using two
//! calibration endpoints: the raw value measured with the probe fully dry
//! (in air) and the raw value measured with the probe submerged.

use crate::error::{Error, Result};
use crate::sensor::RawReading;

/// Two-point linear calibration for a capacitive soil moisture probe.
///
/// Capacitive probes read high when dry and low when wet, so `dry_raw` is
/// normally the larger endpoint. A profile with the endpoints swapped
/// still computes (with inverted semantics); only a zero span is
/// rejected, because the mapping would divide by it.
///
/// The profile is set once at startup and is immutable for the process
/// lifetime.
///
/// # Example
///
/// ```
/// use soilwatch::{CalibrationProfile, RawReading};
///
/// let profile = CalibrationProfile::new(26_000, 13_000);
/// let raw = RawReading { value: 19_500, voltage: 2.44 };
///
/// let reading = profile.normalize(&raw).unwrap();
/// assert_eq!(reading.percent, 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationProfile {
    /// Raw converter value with the probe fully dry (0% moisture).
    pub dry_raw: u16,
    /// Raw converter value with the probe submerged (100% moisture).
    pub wet_raw: u16,
}

impl CalibrationProfile {
    /// Default endpoints for a 3.3 V ADS1015 + capacitive probe setup.
    pub const DEFAULT: Self = Self {
        dry_raw: 26_000,
        wet_raw: 13_000,
    };

    /// Create a profile from two measured endpoints.
    pub fn new(dry_raw: u16, wet_raw: u16) -> Self {
        Self { dry_raw, wet_raw }
    }

    /// Check the profile invariant: the calibration span must be nonzero.
    ///
    /// Called at configuration load so that a bad profile aborts startup
    /// rather than failing on every cycle.
    pub fn validate(&self) -> Result<()> {
        if self.dry_raw == self.wet_raw {
            return Err(Error::Configuration {
                reason: format!(
                    "calibration endpoints must differ (both are {})",
                    self.dry_raw
                ),
            });
        }
        Ok(())
    }

    /// Convert a raw acquisition into a clamped moisture percentage.
    ///
    /// `percent = ((dry_raw - raw) / (dry_raw - wet_raw)) * 100`, clamped
    /// to `[0, 100]`. The result keeps full precision; rounding to one
    /// decimal happens only at display time, so threshold comparisons are
    /// not subject to double-rounding near the boundary.
    pub fn normalize(&self, raw: &RawReading) -> Result<MoistureReading> {
        self.validate()?;

        let span = f64::from(self.dry_raw) - f64::from(self.wet_raw);
        let percent = (f64::from(self.dry_raw) - f64::from(raw.value)) / span * 100.0;

        Ok(MoistureReading {
            percent: percent.clamp(0.0, 100.0),
            raw: *raw,
        })
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A normalized moisture measurement.
///
/// Derived from one [`RawReading`]; recomputed every cycle, never
/// retained. `percent` is unrounded; use [`MoistureReading::display_percent`]
/// for the one-decimal form shown to humans.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoistureReading {
    /// Moisture percentage, clamped to `0.0..=100.0`.
    pub percent: f64,
    /// The raw acquisition this reading was derived from.
    pub raw: RawReading,
}

impl MoistureReading {
    /// Percent rounded to one decimal place, for display.
    pub fn display_percent(&self) -> f64 {
        (self.percent * 10.0).round() / 10.0
    }
}
