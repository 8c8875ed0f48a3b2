//! Shared system state read by every stage of the loop.
//!
//! `SystemState` is the "blackboard": the acquisition scheduler writes
//! the sensor sub-records, the alert engine writes [`AlertState`], and the
//! buzzer driver plus the external display / LED layers read it.  It is
//! owned by [`Monitor`](crate::app::service::Monitor) and handed to each
//! stage by reference in a fixed order, so there is exactly one writer at
//! any moment and no locking.
//!
//! Every measured quantity carries its own validity flag.  A flag is only
//! `true` when the sensor is present, its gas warm-up gating (if any) is
//! satisfied, the last poll succeeded and the value passed the range
//! predicates in [`crate::validity`].

use core::fmt;

use heapless::Vec;
use serde::Serialize;

use crate::config::MAX_ALERTS;
use crate::time::Millis;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Top-level operating mode shown by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SystemMode {
    /// Gas sensors warming up.
    #[default]
    Preheat,
    Normal,
    /// Settings menu open (entered by the display layer).
    Settings,
    /// DANGER / CRITICAL alert active; navigation blocked.
    Alert,
}

impl SystemMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preheat => "PREHEAT",
            Self::Normal => "NORMAL",
            Self::Settings => "SETTINGS",
            Self::Alert => "ALERT",
        }
    }
}

// ---------------------------------------------------------------------------
// Severity / alert identity
// ---------------------------------------------------------------------------

/// How dangerous a condition is.  Ordered: `None < Info < … < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[repr(u8)]
pub enum Severity {
    #[default]
    None = 0,
    Info = 1,
    Warning = 2,
    Danger = 3,
    Critical = 4,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Self::None,
        Self::Info,
        Self::Warning,
        Self::Danger,
        Self::Critical,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "OK",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Danger => "DANGER",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which monitored quantity raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlertKind {
    CoHigh,
    LpgHigh,
    SmokeHigh,
    Voltage12vLow,
    Voltage12vHigh,
    Voltage5vLow,
    Voltage5vHigh,
    Current12vHigh,
    Current5vHigh,
    TempHigh,
    TempLow,
    HumidityHigh,
    TiltHigh,
}

impl AlertKind {
    /// `true` for the gas quantities gated behind sensor warm-up.
    pub const fn is_gas(self) -> bool {
        matches!(self, Self::CoHigh | Self::LpgHigh | Self::SmokeHigh)
    }

    /// Short label for a 20-column display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::CoHigh => "CO HIGH",
            Self::LpgHigh => "LPG HIGH",
            Self::SmokeHigh => "SMOKE",
            Self::Voltage12vLow => "BATT LOW",
            Self::Voltage12vHigh => "12V HIGH",
            Self::Voltage5vLow => "5V LOW",
            Self::Voltage5vHigh => "5V HIGH",
            Self::Current12vHigh => "12V OVERCURR",
            Self::Current5vHigh => "5V OVERCURR",
            Self::TempHigh => "TEMP HIGH",
            Self::TempLow => "TEMP LOW",
            Self::HumidityHigh => "HUMID HIGH",
            Self::TiltHigh => "TILT",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// One active alert.  Rebuilt from scratch every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    /// Measured value that crossed the threshold.
    pub value: f32,
    /// Threshold that was crossed.
    pub threshold: f32,
    pub timestamp: Millis,
    pub message: &'static str,
}

/// Alert engine output for the current loop iteration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertState {
    /// Highest severity among `alerts`.
    pub severity: Severity,
    /// First alert that reached `severity` (gas wins ties).
    pub primary: Option<AlertKind>,
    /// Number of entries in `alerts`.
    pub active_count: u8,
    pub alerts: Vec<Alert, MAX_ALERTS>,
    /// The buzzer should be sounding (pulsed or continuous).
    pub buzzer_active: bool,
    /// The display must not leave the alert screen.
    pub navigation_blocked: bool,
}

impl AlertState {
    /// Alert at `index`, if that slot is populated.
    pub fn get(&self, index: usize) -> Option<&Alert> {
        self.alerts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn has(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|a| a.kind == kind)
    }

    /// Severity recorded for `kind`, or `None` when it is not alerting.
    pub fn severity_of(&self, kind: AlertKind) -> Option<Severity> {
        self.alerts.iter().find(|a| a.kind == kind).map(|a| a.severity)
    }

    pub fn is_clear(&self) -> bool {
        self.alerts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Sensor sub-records (written by the acquisition scheduler)
// ---------------------------------------------------------------------------

/// Interior climate and exterior temperature.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EnvironmentData {
    /// Interior temperature (°C), BME280.
    pub temp_interior: f32,
    /// Exterior temperature (°C), DS18B20.
    pub temp_exterior: f32,
    /// Relative humidity (%), BME280.
    pub humidity: f32,
    /// Barometric pressure (hPa), BME280.
    pub pressure: f32,
    /// Derived interior dew point (°C).
    pub dew_point: f32,

    pub temp_interior_at: Millis,
    pub temp_exterior_at: Millis,

    pub temp_interior_valid: bool,
    pub temp_exterior_valid: bool,
    pub humidity_valid: bool,
    pub pressure_valid: bool,
    pub dew_point_valid: bool,
}

/// 12 V leisure-battery rail and 5 V electronics rail.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PowerData {
    pub voltage_12v: f32,
    pub current_12v: f32,
    pub power_12v: f32,

    pub voltage_5v: f32,
    pub current_5v: f32,
    pub power_5v: f32,

    /// Sum of both rails (W).
    pub power_total: f32,

    pub rail_12v_at: Millis,
    pub rail_5v_at: Millis,

    pub rail_12v_valid: bool,
    pub rail_5v_valid: bool,
}

/// Gas concentrations and warm-up gating.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SafetyData {
    /// Carbon monoxide (ppm), MQ7.
    pub co_ppm: f32,
    /// LPG / methane (ppm), MQ2.
    pub lpg_ppm: f32,
    /// Smoke (ppm), MQ2.
    pub smoke_ppm: f32,

    pub co_at: Millis,
    pub lpg_at: Millis,
    pub smoke_at: Millis,

    pub co_valid: bool,
    pub lpg_valid: bool,
    pub smoke_valid: bool,

    /// MQ7 warm-up complete.
    pub co_preheated: bool,
    /// MQ2 warm-up complete.
    pub gas_preheated: bool,
}

impl SafetyData {
    /// Both gas sensors are warmed up; gas alerts may be evaluated.
    pub fn gas_gate_open(&self) -> bool {
        self.co_preheated && self.gas_preheated
    }
}

/// Vehicle attitude from the inclinometer.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LevelData {
    /// Side-to-side angle (°).
    pub roll: f32,
    /// Front-to-back angle (°).
    pub pitch: f32,
    /// Magnitude `sqrt(roll² + pitch²)` (°).
    pub total_tilt: f32,
    /// Die temperature of the IMU (°C).
    pub temperature: f32,
    pub at: Millis,
    pub valid: bool,
    /// Level offsets have been applied.
    pub calibrated: bool,
}

/// Which devices answered at start-up.  Never changes afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SensorAvailability {
    pub climate: bool,
    pub outdoor: bool,
    pub tilt: bool,
    pub co: bool,
    pub gas: bool,
    pub rail_12v: bool,
    pub rail_5v: bool,
    pub buzzer: bool,
}

// ---------------------------------------------------------------------------
// SystemState
// ---------------------------------------------------------------------------

/// The aggregate published to the display / LED layers every iteration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemState {
    pub mode: SystemMode,

    pub environment: EnvironmentData,
    pub power: PowerData,
    pub safety: SafetyData,
    pub level: LevelData,

    pub alerts: AlertState,
    pub sensors: SensorAvailability,

    /// When gas warm-up began.
    pub preheat_started_at: Millis,
    /// Whole seconds since `begin`.
    pub uptime_secs: u32,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The display layer may switch screens.
    pub fn navigation_allowed(&self) -> bool {
        !self.alerts.navigation_blocked
    }
}
