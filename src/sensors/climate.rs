//! BME280 interior climate sensor (temperature, humidity, pressure).
//!
//! The register-level driver lives behind [`ClimateSource`]; this wrapper
//! only adds the sampling interval and start-up availability.

use crate::app::ports::{ClimateSource, SensorPort};
use crate::config::INTERVAL_CLIMATE_MS;
use crate::sensors::{FaultLatch, Reading, Sample, SensorKind};
use crate::time::{IntervalTimer, Millis};

pub struct ClimateSensor<S> {
    source: S,
    available: bool,
    timer: IntervalTimer,
    fault: FaultLatch,
}

impl<S: ClimateSource> ClimateSensor<S> {
    /// Probes the device immediately; the result is final.
    pub fn new(source: S) -> Self {
        Self::with_interval(source, INTERVAL_CLIMATE_MS)
    }

    pub fn with_interval(mut source: S, interval_ms: u32) -> Self {
        let available = source.probe();
        Self {
            source,
            available,
            timer: IntervalTimer::new(interval_ms),
            fault: FaultLatch::default(),
        }
    }
}

impl<S: ClimateSource> SensorPort for ClimateSensor<S> {
    fn kind(&self) -> SensorKind {
        SensorKind::Climate
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn poll(&mut self, now: Millis) -> Option<Reading> {
        if !self.timer.ready(now) {
            return None;
        }
        let name = self.kind().name();
        let m = match self.source.measure() {
            Ok(v) => v,
            Err(e) => {
                self.fault.fail(name, e);
                return None;
            }
        };
        self.fault.clear(name);
        Some(Reading::new(
            0,
            Sample::Climate {
                temperature_c: m.temperature_c,
                humidity_percent: m.humidity_percent,
                pressure_hpa: m.pressure_hpa,
            },
            true,
            now,
        ))
    }
}
