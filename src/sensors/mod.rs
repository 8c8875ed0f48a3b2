//! Sensor subsystem: individual drivers and the typed reading they emit.
//!
//! Every driver implements [`SensorPort`](crate::app::ports::SensorPort)
//! and hands the acquisition scheduler a [`Reading`] whose [`Sample`]
//! variant identifies the physical quantity.  The scheduler copies the
//! payload into `SystemState` and drops the reading.

pub mod climate;
pub mod heating;
pub mod mos;
pub mod mq2;
pub mod mq7;
pub mod outdoor;
pub mod power_rail;
pub mod tilt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::SensorError;
use crate::time::Millis;

/// Which physical sensor a driver fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensorKind {
    /// BME280 interior temperature / humidity / pressure.
    Climate,
    /// DS18B20 exterior probe.
    Outdoor,
    /// MPU6050 inclinometer.
    Tilt,
    /// MQ7 carbon monoxide.
    CarbonMonoxide,
    /// MQ2 LPG / smoke.
    Combustible,
    /// INA226 on the 12 V rail.
    Rail12v,
    /// INA226 on the 5 V rail.
    Rail5v,
}

impl SensorKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Climate => "BME280",
            Self::Outdoor => "DS18B20",
            Self::Tilt => "MPU6050",
            Self::CarbonMonoxide => "MQ7",
            Self::Combustible => "MQ2",
            Self::Rail12v => "INA226-12V",
            Self::Rail5v => "INA226-5V",
        }
    }

    /// Gas sensors gate alerts behind their warm-up.
    pub const fn is_gas(self) -> bool {
        matches!(self, Self::CarbonMonoxide | Self::Combustible)
    }
}

/// Engineering-unit payload of one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Climate {
        temperature_c: f32,
        humidity_percent: f32,
        pressure_hpa: f32,
    },
    Outdoor {
        temperature_c: f32,
    },
    Tilt {
        roll_deg: f32,
        pitch_deg: f32,
        total_deg: f32,
        die_temperature_c: f32,
        calibrated: bool,
    },
    CarbonMonoxide {
        ppm: f32,
    },
    Combustible {
        lpg_ppm: f32,
        smoke_ppm: f32,
    },
    Rail {
        rail: Rail,
        bus_voltage: f32,
        current_a: f32,
        power_w: f32,
    },
}

/// The two monitored supply rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rail {
    V12,
    V5,
}

/// A timestamped sample produced by one successful poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// ADC count for analog sensors; 0 for digital ones.
    pub raw: u16,
    pub sample: Sample,
    /// The sensor itself vouches for this sample (warm-up / heater phase).
    pub valid: bool,
    pub timestamp: Millis,
}

impl Reading {
    pub const fn new(raw: u16, sample: Sample, valid: bool, timestamp: Millis) -> Self {
        Self {
            raw,
            sample,
            valid,
            timestamp,
        }
    }
}

/// Edge-triggered logging of a driver's read failures.  The first failure
/// of a run is a `warn!`, repeats go to `debug!`, and recovery is logged
/// once.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultLatch {
    failing: bool,
}

impl FaultLatch {
    pub fn fail(&mut self, name: &str, err: SensorError) {
        if self.failing {
            debug!("{name}: {err}");
        } else {
            warn!("{name}: {err}");
            self.failing = true;
        }
    }

    pub fn clear(&mut self, name: &str) {
        if self.failing {
            info!("{name}: reads recovered");
            self.failing = false;
        }
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }
}
