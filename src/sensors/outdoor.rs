//! DS18B20 exterior temperature probe.

use crate::app::ports::{SensorPort, ThermometerSource};
use crate::config::INTERVAL_OUTDOOR_MS;
use crate::sensors::{FaultLatch, Reading, Sample, SensorKind};
use crate::time::{IntervalTimer, Millis};

/// The DS18B20 reports this on a CRC or power-on-reset read.
const POWER_ON_RESET_C: f32 = 85.0;
/// Returned by the common one-wire libraries for a vanished probe.
const DISCONNECTED_C: f32 = -127.0;

pub struct OutdoorSensor<S> {
    source: S,
    available: bool,
    timer: IntervalTimer,
    fault: FaultLatch,
}

impl<S: ThermometerSource> OutdoorSensor<S> {
    pub fn new(source: S) -> Self {
        Self::with_interval(source, INTERVAL_OUTDOOR_MS)
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

impl<S: ThermometerSource> SensorPort for OutdoorSensor<S> {
    fn kind(&self) -> SensorKind {
        SensorKind::Outdoor
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn poll(&mut self, now: Millis) -> Option<Reading> {
        if !self.timer.ready(now) {
            return None;
        }
        let name = self.kind().name();
        let c = match self.source.read_celsius() {
            Ok(v) => v,
            Err(e) => {
                self.fault.fail(name, e);
                return None;
            }
        };
        self.fault.clear(name);
        #[allow(clippy::float_cmp)]
        let sentinel = c == POWER_ON_RESET_C || c == DISCONNECTED_C;
        Some(Reading::new(
            0,
            Sample::Outdoor { temperature_c: c },
            !sentinel,
            now,
        ))
    }
}
