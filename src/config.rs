//! System configuration constants
//!
//! Every threshold, phase duration and sampling interval is fixed at
//! compile time.  Nothing here is runtime-tunable: the monitor must
//! behave identically on every boot.

// --- Sampling intervals (ms) ---

/// Interior climate (BME280): temperature / humidity / pressure.
pub const INTERVAL_CLIMATE_MS: u32 = 10_000;
/// Exterior temperature probe (DS18B20).
pub const INTERVAL_OUTDOOR_MS: u32 = 10_000;
/// Inclinometer (MPU6050). Fast, the van may be moving.
pub const INTERVAL_TILT_MS: u32 = 500;
/// Power rail monitors (INA226).
pub const INTERVAL_POWER_MS: u32 = 2_000;
/// CO sensor (MQ7).
pub const INTERVAL_CO_MS: u32 = 2_000;
/// LPG / smoke sensor (MQ2).
pub const INTERVAL_GAS_MS: u32 = 2_000;

// --- Gas sensor timing (ms) ---

/// MQ7 initial warm-up before the heater cycle starts.
pub const CO_PREHEAT_MS: u32 = 180_000;
/// MQ7 high-voltage (5 V) cleaning phase.
pub const CO_HIGH_PHASE_MS: u32 = 60_000;
/// MQ7 low-voltage (1.4 V) measurement phase.
pub const CO_LOW_PHASE_MS: u32 = 90_000;
/// MQ2 warm-up before its readings are trusted.
pub const GAS_PREHEAT_MS: u32 = 60_000;

// --- Metal-oxide analog front-end ---

/// Full-scale count of the 10-bit ADC.
pub const ADC_FULL_SCALE: f32 = 1023.0;
/// Divider supply / ADC reference (V).
pub const ADC_VREF: f32 = 5.0;
/// Below this the Rs computation would divide by ~zero.
pub const MIN_SENSE_VOLTAGE: f32 = 0.1;
/// Load resistor on both MQ boards (kOhm).
pub const LOAD_RESISTOR_KOHM: f32 = 10.0;
/// MQ7 clean-air resistance until calibrated (kOhm).
pub const CO_DEFAULT_R0_KOHM: f32 = 10.0;
/// MQ2 clean-air resistance until calibrated (kOhm).
pub const GAS_DEFAULT_R0_KOHM: f32 = 9.8;
/// MQ7 detection floor; anything lower reads as zero.
pub const CO_DETECTION_FLOOR_PPM: f32 = 20.0;
/// MQ7 detection ceiling; anything higher is clamped.
pub const CO_DETECTION_CEILING_PPM: f32 = 2_000.0;

// --- Gas alert thresholds (ppm) ---

pub const CO_THRESHOLD_INFO: f32 = 50.0;
pub const CO_THRESHOLD_WARNING: f32 = 200.0;
pub const CO_THRESHOLD_DANGER: f32 = 400.0;

pub const LPG_THRESHOLD_INFO: f32 = 500.0;
pub const LPG_THRESHOLD_WARNING: f32 = 1_000.0;
pub const LPG_THRESHOLD_DANGER: f32 = 3_000.0;

pub const SMOKE_THRESHOLD_INFO: f32 = 1_000.0;
pub const SMOKE_THRESHOLD_WARNING: f32 = 1_500.0;
pub const SMOKE_THRESHOLD_DANGER: f32 = 2_000.0;

// --- Electrical thresholds ---

/// Deep-discharge limit of the leisure battery (V).
pub const VOLTAGE_12V_MIN: f32 = 10.5;
/// Low battery (V).
pub const VOLTAGE_12V_WARNING: f32 = 11.5;
/// Over-voltage (charger / alternator fault) (V).
pub const VOLTAGE_12V_MAX: f32 = 14.5;
pub const VOLTAGE_5V_MIN: f32 = 4.5;
pub const VOLTAGE_5V_MAX: f32 = 5.5;
/// Over-current per rail (A).
pub const CURRENT_12V_MAX: f32 = 20.0;
pub const CURRENT_5V_MAX: f32 = 3.0;

// --- Environment thresholds ---

/// Interior overheat (°C).
pub const TEMP_WARNING: f32 = 35.0;
/// Interior freezing (°C).
pub const TEMP_FREEZING: f32 = 0.0;
/// Condensation risk (% RH).
pub const HUMIDITY_WARNING: f32 = 80.0;

// --- Tilt thresholds (degrees) ---

pub const TILT_WARNING: f32 = 5.0;

// --- Alerts / buzzer ---

/// Fixed capacity of the active alert list.
pub const MAX_ALERTS: usize = 10;
/// Maximum number of sensor collaborators the scheduler can own.
pub const MAX_SENSORS: usize = 8;
/// Alarm tone (Hz).
pub const BUZZER_FREQUENCY_HZ: u16 = 1_000;
/// Half-period of the DANGER fast pulse (ms).
pub const BUZZER_FAST_HALF_PERIOD_MS: u32 = 200;
/// Half-period of the WARNING slow pulse (ms).
pub const BUZZER_SLOW_HALF_PERIOD_MS: u32 = 1_000;
/// Silent gap left at the end of each pulsed tone (ms).
pub const BUZZER_GAP_MS: u32 = 50;
/// Start-up chirp length (ms).
pub const BUZZER_CHIRP_MS: u32 = 100;
