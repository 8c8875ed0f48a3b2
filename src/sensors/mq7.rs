//! MQ-7 carbon monoxide sensor driver.
//!
//! Reads the divider voltage through an [`AnalogInput`], runs the
//! [`HeatingCycle`], and converts the resistance ratio to ppm with the
//! datasheet curve `Rs/R0 = 4 · ppm^-0.67`, i.e. `ppm = (Rs/R0 / 4)^-1.49`.
//!
//! ## Validity
//!
//! Concentration is only computed during the low-heat phase.  Samples
//! due during warm-up or the high-heat burn are still emitted so the
//! scheduler can clear the validity flag, but they carry the last good
//! concentration and `valid = false`.
//!
//! ## Detection range
//!
//! Results under 20 ppm read as 0; results over 2000 ppm are clamped to
//! 2000.  Out-of-range is never turned into a sensor error.
//!
//! A sense voltage too low to compute Rs is a one-poll failure: nothing
//! is emitted and the previous concentration stands.

use log::debug;

use crate::app::ports::{AnalogInput, SensorPort};
use crate::config::{
    CO_DEFAULT_R0_KOHM, CO_DETECTION_CEILING_PPM, CO_DETECTION_FLOOR_PPM, INTERVAL_CO_MS,
    LOAD_RESISTOR_KOHM,
};
use crate::sensors::heating::{HeatingCycle, HeatingPhase, HeatingTiming};
use crate::sensors::mos::{MosFrontEnd, MosSample, power_curve};
use crate::sensors::{FaultLatch, Reading, Sample, SensorKind};
use crate::time::{IntervalTimer, Millis};

const CURVE_SCALE: f32 = 4.0;
const CURVE_EXPONENT: f32 = -1.49;

/// Last conversion, for the display's diagnostics screen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mq7Data {
    pub sample: MosSample,
    pub ppm: f32,
    pub valid: bool,
    pub timestamp: Millis,
}

/// Map an `Rs/R0` ratio to a clamped CO concentration.
pub fn ratio_to_ppm(ratio: f32) -> f32 {
    if ratio <= 0.0 {
        // Rs collapsed to zero: beyond the top of the curve.
        return CO_DETECTION_CEILING_PPM;
    }
    let ppm = power_curve(ratio, CURVE_SCALE, CURVE_EXPONENT);
    if ppm < CO_DETECTION_FLOOR_PPM {
        0.0
    } else {
        ppm.min(CO_DETECTION_CEILING_PPM)
    }
}

pub struct Mq7Sensor<A> {
    adc: A,
    cycle: HeatingCycle,
    front_end: MosFrontEnd,
    timer: IntervalTimer,
    data: Mq7Data,
    fault: FaultLatch,
}

impl<A: AnalogInput> Mq7Sensor<A> {
    pub fn new(adc: A) -> Self {
        Self::with_timing(adc, HeatingTiming::MQ7, INTERVAL_CO_MS)
    }

    pub fn with_timing(adc: A, timing: HeatingTiming, interval_ms: u32) -> Self {
        Self {
            adc,
            cycle: HeatingCycle::new(timing),
            front_end: MosFrontEnd::new(LOAD_RESISTOR_KOHM, CO_DEFAULT_R0_KOHM),
            timer: IntervalTimer::new(interval_ms),
            data: Mq7Data::default(),
            fault: FaultLatch::default(),
        }
    }

    /// Start warm-up.  Until this is called the sensor never emits.
    pub fn begin(&mut self, now: Millis) {
        self.cycle.begin(now);
    }

    pub fn phase(&self) -> HeatingPhase {
        self.cycle.phase()
    }

    pub fn cycle(&self) -> &HeatingCycle {
        &self.cycle
    }

    pub fn data(&self) -> Mq7Data {
        self.data
    }

    pub fn ppm(&self) -> f32 {
        self.data.ppm
    }

    pub fn r0_kohm(&self) -> f32 {
        self.front_end.r0_kohm()
    }

    /// Install a clean-air R0 measured by the calibration flow.
    pub fn set_r0_kohm(&mut self, r0: f32) {
        self.front_end.set_r0_kohm(r0);
    }

    /// Whole seconds of warm-up left, for the preheat screen.
    pub fn preheat_remaining_secs(&self, now: Millis) -> u32 {
        self.cycle.preheat_remaining_ms(now) / 1000
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    fn read_low_phase(&mut self, now: Millis) -> Option<Reading> {
        let raw = match self.adc.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                self.fault.fail("MQ7", e);
                return None;
            }
        };
        self.fault.clear("MQ7");
        let sample = match self.front_end.convert(raw) {
            Ok(s) => s,
            Err(e) => {
                debug!("MQ7: {e} (raw={raw}), keeping {:.0} ppm", self.data.ppm);
                return None;
            }
        };
        let ppm = ratio_to_ppm(sample.ratio);
        self.data = Mq7Data {
            sample,
            ppm,
            valid: true,
            timestamp: now,
        };
        Some(Reading::new(raw, Sample::CarbonMonoxide { ppm }, true, now))
    }

    fn gated_reading(&mut self, now: Millis) -> Reading {
        // The ADC is sampled for display only; the value is not converted.
        let raw = self.adc.read_raw().unwrap_or(self.data.sample.raw);
        self.data.valid = false;
        Reading::new(
            raw,
            Sample::CarbonMonoxide {
                ppm: self.data.ppm,
            },
            false,
            now,
        )
    }
}

impl<A: AnalogInput> SensorPort for Mq7Sensor<A> {
    fn kind(&self) -> SensorKind {
        SensorKind::CarbonMonoxide
    }

    fn is_available(&self) -> bool {
        // Analog part: nothing to probe.
        true
    }

    fn begin(&mut self, now: Millis) {
        Mq7Sensor::begin(self, now);
    }

    fn poll(&mut self, now: Millis) -> Option<Reading> {
        if self.cycle.phase() == HeatingPhase::NotStarted {
            return None;
        }
        // Entering the high-heat burn invalidates CO at once, whatever
        // the sampling timer says.
        if self.cycle.update(now) == Some(HeatingPhase::HeatingHigh) {
            return Some(self.gated_reading(now));
        }
        if !self.timer.ready(now) {
            return None;
        }
        if self.cycle.reading_window_open() {
            self.read_low_phase(now)
        } else {
            Some(self.gated_reading(now))
        }
    }

    fn warmed_up(&self, now: Millis) -> bool {
        self.cycle.preheat_complete(now)
    }

    fn warm_up_remaining(&self, now: Millis) -> u32 {
        self.cycle.preheat_remaining_ms(now)
    }
}
