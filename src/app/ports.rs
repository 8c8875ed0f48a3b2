//! Port traits: the boundary between the monitor core and the hardware.
//!
//! ```text
//!   Driver / board adapter ──▶ Port trait ──▶ Monitor (core)
//! ```
//!
//! Two layers of sensor ports exist:
//!
//! - **Source ports** (`AnalogInput`, `ClimateSource`, …) are the raw
//!   device access the board support crate provides.  They may fail;
//!   failures are typed [`SensorError`]s.
//! - **[`SensorPort`]** is what the acquisition scheduler consumes: a
//!   non-blocking `poll` that yields a [`Reading`] only when the sensor's
//!   own sampling interval has elapsed.  The bundled drivers in
//!   [`crate::sensors`] implement it on top of the source ports.

use crate::error::SensorError;
use crate::sensors::{Reading, SensorKind};
use crate::time::Millis;

// ───────────────────────────────────────────────────────────────
// Sensor port (consumed by the acquisition scheduler)
// ───────────────────────────────────────────────────────────────

/// A physical sensor as seen by the scheduler.
pub trait SensorPort {
    /// Which physical sensor this is.
    fn kind(&self) -> SensorKind;

    /// Whether the device answered at start-up.  Fixed for the life of
    /// the process; an unavailable sensor is never polled.
    fn is_available(&self) -> bool;

    /// Start any warm-up or sampling clocks.  Called once by the
    /// scheduler's `begin` for available sensors.
    fn begin(&mut self, _now: Millis) {}

    /// Non-blocking poll.  Returns `Some` only when the sampling interval
    /// has elapsed *and* a sample was obtained.
    fn poll(&mut self, now: Millis) -> Option<Reading>;

    /// Warm-up gating for gas sensors.  Non-gas sensors are always warm.
    fn warmed_up(&self, _now: Millis) -> bool {
        true
    }

    /// Milliseconds of warm-up left (0 when warm).
    fn warm_up_remaining(&self, _now: Millis) -> u32 {
        0
    }
}

// ───────────────────────────────────────────────────────────────
// Source ports (provided by the board support layer)
// ───────────────────────────────────────────────────────────────

/// One 10-bit ADC channel wired to a metal-oxide gas sensor divider.
pub trait AnalogInput {
    /// Raw count, 0–1023.
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Interior temperature / humidity / pressure measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateMeasurement {
    pub temperature_c: f32,
    pub humidity_percent: f32,
    pub pressure_hpa: f32,
}

/// BME280-class combined environmental sensor.
pub trait ClimateSource {
    /// Detect the device.  Called once at start-up.
    fn probe(&mut self) -> bool;
    fn measure(&mut self) -> Result<ClimateMeasurement, SensorError>;
}

/// DS18B20-class single temperature probe.
pub trait ThermometerSource {
    fn probe(&mut self) -> bool;
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

/// Calibrated attitude from an IMU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll_deg: f32,
    pub pitch_deg: f32,
    pub die_temperature_c: f32,
}

/// MPU6050-class inclinometer.
pub trait InclinometerSource {
    fn probe(&mut self) -> bool;
    fn read_attitude(&mut self) -> Result<Attitude, SensorError>;
    /// Level offsets have been applied to `read_attitude`.
    fn is_calibrated(&self) -> bool {
        false
    }
}

/// One bus-voltage / shunt-current measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailMeasurement {
    pub bus_voltage: f32,
    pub current_a: f32,
    pub power_w: f32,
}

/// INA226-class power monitor on one rail.
pub trait PowerMonitorSource {
    fn probe(&mut self) -> bool;
    fn measure(&mut self) -> Result<RailMeasurement, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Tone output (consumed by the buzzer pattern driver)
// ───────────────────────────────────────────────────────────────

/// A tone generator driving the piezo buzzer.
///
/// At most one tone exists at a time; starting a tone supersedes any
/// previous one.
pub trait ToneOutput {
    /// Start a tone.  `duration_ms = None` sounds until [`stop_tone`];
    /// `Some(ms)` ends on its own (see [`service`]).
    ///
    /// [`stop_tone`]: ToneOutput::stop_tone
    /// [`service`]: ToneOutput::service
    fn start_tone(&mut self, frequency_hz: u16, duration_ms: Option<u32>, now: Millis);

    /// Silence immediately.
    fn stop_tone(&mut self);

    /// End a bounded tone whose time is up.  Called once per loop pass.
    fn service(&mut self, _now: Millis) {}

    /// Output hardware is present.
    fn is_available(&self) -> bool {
        true
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink (core → logging / display notifications)
// ───────────────────────────────────────────────────────────────

/// The core emits [`MonitorEvent`](super::events::MonitorEvent)s through
/// this port on state edges only.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::MonitorEvent);
}
