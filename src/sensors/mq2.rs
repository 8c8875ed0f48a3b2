//! MQ-2 combustible gas (LPG) and smoke sensor driver.
//!
//! Same divider front-end as the MQ7 but no heater cycling: after a
//! one-minute warm-up every sample is usable.  Two datasheet curves are
//! evaluated from one `Rs/R0` ratio:
//!
//! | gas   | curve                     | inverse                 |
//! |-------|---------------------------|-------------------------|
//! | LPG   | `Rs/R0 = 2.5 · ppm^-0.48` | `(ratio/2.5)^-2.08`     |
//! | smoke | `Rs/R0 = 2.0 · ppm^-0.45` | `(ratio/2.0)^-2.22`     |

use log::debug;

use crate::app::ports::{AnalogInput, SensorPort};
use crate::config::{GAS_DEFAULT_R0_KOHM, GAS_PREHEAT_MS, INTERVAL_GAS_MS, LOAD_RESISTOR_KOHM};
use crate::sensors::mos::{MosFrontEnd, MosSample, power_curve};
use crate::sensors::{FaultLatch, Reading, Sample, SensorKind};
use crate::time::{IntervalTimer, Millis};

/// Below this ratio the curves leave their characterised range.
const MIN_CURVE_RATIO: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mq2Data {
    pub sample: MosSample,
    pub lpg_ppm: f32,
    pub smoke_ppm: f32,
    pub timestamp: Millis,
}

pub fn ratio_to_lpg_ppm(ratio: f32) -> f32 {
    if ratio > MIN_CURVE_RATIO {
        power_curve(ratio, 2.5, -2.08)
    } else {
        0.0
    }
}

pub fn ratio_to_smoke_ppm(ratio: f32) -> f32 {
    if ratio > MIN_CURVE_RATIO {
        power_curve(ratio, 2.0, -2.22)
    } else {
        0.0
    }
}

pub struct Mq2Sensor<A> {
    adc: A,
    front_end: MosFrontEnd,
    timer: IntervalTimer,
    preheat_ms: u32,
    started_at: Option<Millis>,
    data: Mq2Data,
    fault: FaultLatch,
}

impl<A: AnalogInput> Mq2Sensor<A> {
    pub fn new(adc: A) -> Self {
        Self::with_timing(adc, GAS_PREHEAT_MS, INTERVAL_GAS_MS)
    }

    pub fn with_timing(adc: A, preheat_ms: u32, interval_ms: u32) -> Self {
        Self {
            adc,
            front_end: MosFrontEnd::new(LOAD_RESISTOR_KOHM, GAS_DEFAULT_R0_KOHM),
            timer: IntervalTimer::new(interval_ms),
            preheat_ms,
            started_at: None,
            data: Mq2Data::default(),
            fault: FaultLatch::default(),
        }
    }

    pub fn begin(&mut self, now: Millis) {
        self.started_at = Some(now);
    }

    pub fn data(&self) -> Mq2Data {
        self.data
    }

    pub fn r0_kohm(&self) -> f32 {
        self.front_end.r0_kohm()
    }

    pub fn set_r0_kohm(&mut self, r0: f32) {
        self.front_end.set_r0_kohm(r0);
    }

    pub fn is_ready(&self, now: Millis) -> bool {
        self.started_at
            .is_some_and(|t| now.has_elapsed(t, self.preheat_ms))
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: AnalogInput> SensorPort for Mq2Sensor<A> {
    fn kind(&self) -> SensorKind {
        SensorKind::Combustible
    }

    fn is_available(&self) -> bool {
        true
    }

    fn begin(&mut self, now: Millis) {
        Mq2Sensor::begin(self, now);
    }

    fn poll(&mut self, now: Millis) -> Option<Reading> {
        self.started_at?;
        if !self.timer.ready(now) {
            return None;
        }
        let raw = match self.adc.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                self.fault.fail("MQ2", e);
                return None;
            }
        };
        self.fault.clear("MQ2");
        let sample = match self.front_end.convert(raw) {
            Ok(s) => s,
            Err(e) => {
                debug!("MQ2: {e} (raw={raw})");
                return None;
            }
        };
        self.data = Mq2Data {
            sample,
            lpg_ppm: ratio_to_lpg_ppm(sample.ratio),
            smoke_ppm: ratio_to_smoke_ppm(sample.ratio),
            timestamp: now,
        };
        Some(Reading::new(
            raw,
            Sample::Combustible {
                lpg_ppm: self.data.lpg_ppm,
                smoke_ppm: self.data.smoke_ppm,
            },
            self.is_ready(now),
            now,
        ))
    }

    fn warmed_up(&self, now: Millis) -> bool {
        self.is_ready(now)
    }

    fn warm_up_remaining(&self, now: Millis) -> u32 {
        match self.started_at {
            Some(t) => self.preheat_ms.saturating_sub(now.elapsed_since(t)),
            None => self.preheat_ms,
        }
    }
}
