//! Mock hardware adapters for integration tests.
//!
//! Sensor mocks share their value through `Rc<Cell<_>>` so a test can keep
//! a handle and change what the "hardware" reports after the driver has
//! been boxed and handed to the monitor.  The tone mock records every
//! call so tests can assert on the full buzzer history.

use std::cell::Cell;
use std::rc::Rc;

use vanmon::app::events::MonitorEvent;
use vanmon::app::ports::{
    AnalogInput, Attitude, ClimateMeasurement, ClimateSource, EventSink, InclinometerSource,
    PowerMonitorSource, RailMeasurement, ThermometerSource, ToneOutput,
};
use vanmon::config::{ADC_FULL_SCALE, ADC_VREF, CO_DEFAULT_R0_KOHM, LOAD_RESISTOR_KOHM};
use vanmon::error::SensorError;
use vanmon::time::Millis;

// ── Shared value handle ───────────────────────────────────────

pub type Shared<T> = Rc<Cell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(Cell::new(value))
}

// ── Analog front-end ──────────────────────────────────────────

pub struct MockAdc {
    pub raw: Shared<Result<u16, SensorError>>,
}

impl AnalogInput for MockAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.raw.get()
    }
}

/// ADC count that the MQ7 front-end converts to roughly `ppm`.
#[allow(dead_code)]
pub fn raw_for_co_ppm(ppm: f32) -> u16 {
    let ratio = 4.0 * ppm.powf(-1.0 / 1.49);
    let rs = ratio * CO_DEFAULT_R0_KOHM;
    let volts = ADC_VREF * LOAD_RESISTOR_KOHM / (rs + LOAD_RESISTOR_KOHM);
    (volts / ADC_VREF * ADC_FULL_SCALE).round() as u16
}

// ── Digital sensors ───────────────────────────────────────────

pub struct MockClimate {
    pub present: bool,
    pub value: Shared<ClimateMeasurement>,
}

impl ClimateSource for MockClimate {
    fn probe(&mut self) -> bool {
        self.present
    }
    fn measure(&mut self) -> Result<ClimateMeasurement, SensorError> {
        Ok(self.value.get())
    }
}

pub struct MockThermometer {
    pub present: bool,
    pub celsius: Shared<f32>,
}

impl ThermometerSource for MockThermometer {
    fn probe(&mut self) -> bool {
        self.present
    }
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        Ok(self.celsius.get())
    }
}

pub struct MockInclinometer {
    pub present: bool,
    pub attitude: Shared<Attitude>,
}

impl InclinometerSource for MockInclinometer {
    fn probe(&mut self) -> bool {
        self.present
    }
    fn read_attitude(&mut self) -> Result<Attitude, SensorError> {
        Ok(self.attitude.get())
    }
    fn is_calibrated(&self) -> bool {
        true
    }
}

pub struct MockPowerMonitor {
    pub present: bool,
    pub value: Shared<Result<RailMeasurement, SensorError>>,
}

impl PowerMonitorSource for MockPowerMonitor {
    fn probe(&mut self) -> bool {
        self.present
    }
    fn measure(&mut self) -> Result<RailMeasurement, SensorError> {
        self.value.get()
    }
}

#[allow(dead_code)]
pub fn rail(volts: f32, amps: f32) -> RailMeasurement {
    RailMeasurement {
        bus_voltage: volts,
        current_a: amps,
        power_w: volts * amps,
    }
}

// ── Tone output ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCall {
    Start { duration_ms: Option<u32>, at: u32 },
    Stop,
}

#[derive(Default)]
pub struct MockTone {
    pub calls: Vec<ToneCall>,
    pub sounding: bool,
}

#[allow(dead_code)]
impl MockTone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ToneCall::Start { .. }))
            .count()
    }
}

impl ToneOutput for MockTone {
    fn start_tone(&mut self, _frequency_hz: u16, duration_ms: Option<u32>, now: Millis) {
        self.calls.push(ToneCall::Start {
            duration_ms,
            at: now.as_ms(),
        });
        self.sounding = true;
    }

    fn stop_tone(&mut self) {
        self.calls.push(ToneCall::Stop);
        self.sounding = false;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<MonitorEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&MonitorEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &MonitorEvent) {
        self.events.push(*event);
    }
}
