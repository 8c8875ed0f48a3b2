//! Metal-oxide (MQ-series) analog front-end.
//!
//! The sensing element sits in a divider with a load resistor RL.  The
//! ADC sees the voltage across RL, so the element resistance is
//!
//! ```text
//!   Rs = (Vc - V) / V * RL
//! ```
//!
//! and concentration follows a datasheet power-law curve of `Rs / R0`,
//! where R0 is the element resistance in clean air.

use crate::config::{ADC_FULL_SCALE, ADC_VREF, MIN_SENSE_VOLTAGE};
use crate::error::SensorError;

/// One converted ADC sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MosSample {
    pub raw: u16,
    pub voltage: f32,
    pub rs_kohm: f32,
    /// `Rs / R0`.
    pub ratio: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct MosFrontEnd {
    load_kohm: f32,
    r0_kohm: f32,
}

impl MosFrontEnd {
    pub const fn new(load_kohm: f32, r0_kohm: f32) -> Self {
        Self { load_kohm, r0_kohm }
    }

    pub fn r0_kohm(&self) -> f32 {
        self.r0_kohm
    }

    /// Replace the clean-air resistance (from an external calibration).
    /// Non-positive values are ignored.
    pub fn set_r0_kohm(&mut self, r0: f32) {
        if r0 > 0.0 && r0.is_finite() {
            self.r0_kohm = r0;
        }
    }

    pub fn voltage(raw: u16) -> f32 {
        (raw as f32 / ADC_FULL_SCALE) * ADC_VREF
    }

    /// Convert a raw count into resistance and ratio.
    ///
    /// A sense voltage under [`MIN_SENSE_VOLTAGE`] would divide by ~zero
    /// and is reported as [`SensorError::VoltageTooLow`].  Counts above
    /// the ADC's full scale are [`SensorError::OutOfRange`].
    pub fn convert(&self, raw: u16) -> Result<MosSample, SensorError> {
        if f32::from(raw) > ADC_FULL_SCALE {
            return Err(SensorError::OutOfRange);
        }
        let voltage = Self::voltage(raw);
        if voltage < MIN_SENSE_VOLTAGE {
            return Err(SensorError::VoltageTooLow);
        }
        let rs_kohm = ((ADC_VREF - voltage) / voltage) * self.load_kohm;
        Ok(MosSample {
            raw,
            voltage,
            rs_kohm,
            ratio: rs_kohm / self.r0_kohm,
        })
    }
}

/// Invert a datasheet curve `ratio = scale * ppm^k` as
/// `ppm = (ratio / scale)^exponent` with `exponent = 1 / k`.
pub fn power_curve(ratio: f32, scale: f32, exponent: f32) -> f32 {
    (ratio / scale).powf(exponent)
}
