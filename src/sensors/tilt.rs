//! MPU6050 inclinometer: roll, pitch and total tilt magnitude.

use crate::app::ports::{InclinometerSource, SensorPort};
use crate::config::INTERVAL_TILT_MS;
use crate::sensors::{FaultLatch, Reading, Sample, SensorKind};
use crate::time::{IntervalTimer, Millis};

/// Combined tilt `sqrt(roll² + pitch²)` in degrees.
pub fn total_tilt(roll_deg: f32, pitch_deg: f32) -> f32 {
    roll_deg.hypot(pitch_deg)
}

pub struct TiltSensor<S> {
    source: S,
    available: bool,
    timer: IntervalTimer,
    fault: FaultLatch,
}

impl<S: InclinometerSource> TiltSensor<S> {
    pub fn new(source: S) -> Self {
        Self::with_interval(source, INTERVAL_TILT_MS)
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

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: InclinometerSource> SensorPort for TiltSensor<S> {
    fn kind(&self) -> SensorKind {
        SensorKind::Tilt
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn poll(&mut self, now: Millis) -> Option<Reading> {
        if !self.timer.ready(now) {
            return None;
        }
        let name = self.kind().name();
        let a = match self.source.read_attitude() {
            Ok(v) => v,
            Err(e) => {
                self.fault.fail(name, e);
                return None;
            }
        };
        self.fault.clear(name);
        Some(Reading::new(
            0,
            Sample::Tilt {
                roll_deg: a.roll_deg,
                pitch_deg: a.pitch_deg,
                total_deg: total_tilt(a.roll_deg, a.pitch_deg),
                die_temperature_c: a.die_temperature_c,
                calibrated: self.source.is_calibrated(),
            },
            true,
            now,
        ))
    }
}
