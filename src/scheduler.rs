//! Acquisition scheduler.
//!
//! Owns every registered sensor driver and, once per loop pass, gives
//! each of them one non-blocking `poll`.  Whatever a driver hands back is
//! range-checked and copied into the matching [`SystemState`] sub-record.
//!
//! ```text
//! ┌──────────┐ ┌──────────┐ ┌──────────┐       ┌──────────┐
//! │ BME280   │ │ DS18B20  │ │ MQ7      │  ...  │ INA226   │
//! └────┬─────┘ └────┬─────┘ └────┬─────┘       └────┬─────┘
//!      │ poll       │ poll       │ poll             │ poll
//!      ▼            ▼            ▼                  ▼
//! ┌────────────────────────────────────────────────────────┐
//! │ AcquisitionScheduler::update                           │
//! │   validity predicates · gas warm-up gating · derived   │
//! └───────────────────────────┬────────────────────────────┘
//!                             ▼
//!                        SystemState
//! ```
//!
//! There are no retries, no priorities and no sleeping.  A slow driver
//! delays the ones registered after it in the same pass.

use heapless::Vec;
use log::{debug, info, warn};

use crate::app::ports::SensorPort;
use crate::config::MAX_SENSORS;
use crate::error::{Error, Result};
use crate::sensors::{Rail, Reading, Sample, SensorKind};
use crate::state::{SensorAvailability, SystemMode, SystemState};
use crate::time::Millis;
use crate::validity;

/// What one [`AcquisitionScheduler::update`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Readings accepted this pass.
    pub readings: u8,
    /// Every available gas sensor finished warming up during this pass.
    pub preheat_completed: bool,
}

pub struct AcquisitionScheduler {
    slots: Vec<Box<dyn SensorPort>, MAX_SENSORS>,
    started_at: Option<Millis>,
    /// Longest gas warm-up at `begin`, for the percentage display.
    preheat_total_ms: u32,
    /// Latched on the first pass where every available gas sensor is warm.
    preheat_done: bool,
}

impl AcquisitionScheduler {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            started_at: None,
            preheat_total_ms: 0,
            preheat_done: false,
        }
    }

    /// Take ownership of a driver.  Availability is read once here and
    /// recorded in `availability`; it never changes afterwards.
    pub fn register(
        &mut self,
        sensor: Box<dyn SensorPort>,
        availability: &mut SensorAvailability,
    ) -> Result<SensorKind> {
        let kind = sensor.kind();
        let available = sensor.is_available();
        if self.slots.push(sensor).is_err() {
            warn!("{}: sensor table full ({MAX_SENSORS})", kind.name());
            return Err(Error::Init("sensor table full"));
        }
        set_available(availability, kind, available);
        if available {
            info!("{} detected", kind.name());
        } else {
            warn!("{} not found, readings disabled", kind.name());
        }
        Ok(kind)
    }

    /// Start warm-up clocks and enter [`SystemMode::Preheat`].
    pub fn begin(&mut self, state: &mut SystemState, now: Millis) {
        self.started_at = Some(now);
        self.preheat_done = false;
        state.preheat_started_at = now;
        state.mode = SystemMode::Preheat;
        for sensor in self.slots.iter_mut().filter(|s| s.is_available()) {
            sensor.begin(now);
        }
        self.preheat_total_ms = self.preheat_remaining_ms(now);
        info!(
            "Acquisition started: {} of {} sensors active, gas preheat {}s",
            self.active_sensor_count(),
            self.slots.len(),
            self.preheat_total_ms / 1000
        );
    }

    /// One pass over every available driver.
    pub fn update(&mut self, state: &mut SystemState, now: Millis) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        for sensor in self.slots.iter_mut() {
            if !sensor.is_available() {
                continue;
            }
            let kind = sensor.kind();
            match kind {
                SensorKind::CarbonMonoxide => state.safety.co_preheated = sensor.warmed_up(now),
                SensorKind::Combustible => state.safety.gas_preheated = sensor.warmed_up(now),
                _ => {}
            }
            if let Some(reading) = sensor.poll(now) {
                apply_reading(state, &reading);
                outcome.readings = outcome.readings.saturating_add(1);
                debug!("{}: {:?}", kind.name(), reading.sample);
            }
        }

        state.power.power_total = total_power(state);
        if let Some(start) = self.started_at {
            state.uptime_secs = now.elapsed_since(start) / 1000;
        }

        // A missing gas sensor keeps its alerts gated but does not hold
        // the mode in Preheat; completion is latched apart from the mode.
        if !self.preheat_done && self.started_at.is_some() && self.gas_sensors_warm(now) {
            self.preheat_done = true;
            outcome.preheat_completed = true;
            info!("Gas sensors warmed up, monitoring active");
            if state.mode == SystemMode::Preheat {
                state.mode = SystemMode::Normal;
            }
        }

        outcome
    }

    /// True when every available gas sensor is warm (vacuously true when
    /// none is fitted).
    fn gas_sensors_warm(&self, now: Millis) -> bool {
        self.slots
            .iter()
            .filter(|s| s.is_available() && s.kind().is_gas())
            .all(|s| s.warmed_up(now))
    }

    pub fn preheat_complete(&self) -> bool {
        self.preheat_done
    }

    /// Milliseconds until the slowest gas sensor is warm.
    pub fn preheat_remaining_ms(&self, now: Millis) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.is_available() && s.kind().is_gas())
            .map(|s| s.warm_up_remaining(now))
            .max()
            .unwrap_or(0)
    }

    /// Seconds until the slowest gas sensor is warm, rounded up.
    pub fn preheat_remaining(&self, now: Millis) -> u32 {
        self.preheat_remaining_ms(now).div_ceil(1000)
    }

    /// Warm-up progress, 0–100.
    pub fn preheat_percent(&self, now: Millis) -> u8 {
        let remaining = self.preheat_remaining_ms(now);
        if remaining == 0 || self.preheat_total_ms == 0 {
            return 100;
        }
        let done = self.preheat_total_ms.saturating_sub(remaining);
        let pct = (u64::from(done) * 100 / u64::from(self.preheat_total_ms)) as u8;
        pct.min(100)
    }

    pub fn active_sensor_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_available()).count()
    }

    pub fn registered(&self) -> usize {
        self.slots.len()
    }
}

impl Default for AcquisitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn set_available(availability: &mut SensorAvailability, kind: SensorKind, available: bool) {
    let flag = match kind {
        SensorKind::Climate => &mut availability.climate,
        SensorKind::Outdoor => &mut availability.outdoor,
        SensorKind::Tilt => &mut availability.tilt,
        SensorKind::CarbonMonoxide => &mut availability.co,
        SensorKind::Combustible => &mut availability.gas,
        SensorKind::Rail12v => &mut availability.rail_12v,
        SensorKind::Rail5v => &mut availability.rail_5v,
    };
    *flag = available;
}

fn total_power(state: &SystemState) -> f32 {
    let p = &state.power;
    let mut total = 0.0;
    if p.rail_12v_valid {
        total += p.power_12v;
    }
    if p.rail_5v_valid {
        total += p.power_5v;
    }
    total
}

/// Copy one reading into its sub-record.  Validity is the driver's own
/// flag AND the range predicate; gas readings additionally require the
/// matching warm-up flag.
fn apply_reading(state: &mut SystemState, reading: &Reading) {
    let at = reading.timestamp;
    match reading.sample {
        Sample::Climate {
            temperature_c,
            humidity_percent,
            pressure_hpa,
        } => {
            let env = &mut state.environment;
            env.temp_interior = temperature_c;
            env.humidity = humidity_percent;
            env.pressure = pressure_hpa;
            env.temp_interior_at = at;
            env.temp_interior_valid =
                reading.valid && validity::is_valid_temperature(temperature_c);
            env.humidity_valid = reading.valid && validity::is_valid_humidity(humidity_percent);
            env.pressure_valid = reading.valid && validity::is_valid_pressure(pressure_hpa);

            let dew = if env.temp_interior_valid && env.humidity_valid {
                validity::dew_point(temperature_c, humidity_percent)
            } else {
                None
            };
            env.dew_point_valid = dew.is_some();
            if let Some(d) = dew {
                env.dew_point = d;
            }
        }
        Sample::Outdoor { temperature_c } => {
            let env = &mut state.environment;
            env.temp_exterior = temperature_c;
            env.temp_exterior_at = at;
            env.temp_exterior_valid =
                reading.valid && validity::is_valid_temperature(temperature_c);
        }
        Sample::Tilt {
            roll_deg,
            pitch_deg,
            total_deg,
            die_temperature_c,
            calibrated,
        } => {
            let level = &mut state.level;
            level.roll = roll_deg;
            level.pitch = pitch_deg;
            level.total_tilt = total_deg;
            level.temperature = die_temperature_c;
            level.calibrated = calibrated;
            level.at = at;
            level.valid = reading.valid && validity::is_valid_tilt(total_deg);
        }
        Sample::CarbonMonoxide { ppm } => {
            let safety = &mut state.safety;
            safety.co_ppm = ppm;
            safety.co_at = at;
            safety.co_valid = reading.valid && safety.co_preheated && validity::is_valid_ppm(ppm);
        }
        Sample::Combustible { lpg_ppm, smoke_ppm } => {
            let safety = &mut state.safety;
            let gate = reading.valid && safety.gas_preheated;
            safety.lpg_ppm = lpg_ppm;
            safety.smoke_ppm = smoke_ppm;
            safety.lpg_at = at;
            safety.smoke_at = at;
            safety.lpg_valid = gate && validity::is_valid_ppm(lpg_ppm);
            safety.smoke_valid = gate && validity::is_valid_ppm(smoke_ppm);
        }
        Sample::Rail {
            rail,
            bus_voltage,
            current_a,
            power_w,
        } => {
            let ok = reading.valid && validity::is_valid_voltage(bus_voltage);
            let power = &mut state.power;
            match rail {
                Rail::V12 => {
                    power.voltage_12v = bus_voltage;
                    power.current_12v = current_a;
                    power.power_12v = power_w;
                    power.rail_12v_at = at;
                    power.rail_12v_valid = ok;
                }
                Rail::V5 => {
                    power.voltage_5v = bus_voltage;
                    power.current_5v = current_a;
                    power.power_5v = power_w;
                    power.rail_5v_at = at;
                    power.rail_5v_valid = ok;
                }
            }
        }
    }
}
