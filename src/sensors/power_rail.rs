//! INA226 bus voltage / shunt current monitor, one instance per rail.

use crate::app::ports::{PowerMonitorSource, SensorPort};
use crate::config::INTERVAL_POWER_MS;
use crate::sensors::{FaultLatch, Rail, Reading, Sample, SensorKind};
use crate::time::{IntervalTimer, Millis};

pub struct PowerRailSensor<S> {
    source: S,
    rail: Rail,
    available: bool,
    timer: IntervalTimer,
    fault: FaultLatch,
}

impl<S: PowerMonitorSource> PowerRailSensor<S> {
    pub fn new(source: S, rail: Rail) -> Self {
        Self::with_interval(source, rail, INTERVAL_POWER_MS)
    }

    pub fn with_interval(mut source: S, rail: Rail, interval_ms: u32) -> Self {
        let available = source.probe();
        Self {
            source,
            rail,
            available,
            timer: IntervalTimer::new(interval_ms),
            fault: FaultLatch::default(),
        }
    }

    pub fn rail(&self) -> Rail {
        self.rail
    }

    /// The last sampling attempt failed.
    pub fn is_failing(&self) -> bool {
        self.fault.is_failing()
    }
}

impl<S: PowerMonitorSource> SensorPort for PowerRailSensor<S> {
    fn kind(&self) -> SensorKind {
        match self.rail {
            Rail::V12 => SensorKind::Rail12v,
            Rail::V5 => SensorKind::Rail5v,
        }
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
            Sample::Rail {
                rail: self.rail,
                bus_voltage: m.bus_voltage,
                current_a: m.current_a,
                power_w: m.power_w,
            },
            true,
            now,
        ))
    }
}
