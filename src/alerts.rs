//! Tiered alert engine.
//!
//! Runs **every pass after acquisition** and rebuilds
//! [`SystemState::alerts`] from scratch.  Nothing latches: a condition
//! that clears disappears on the next pass, and there is no hysteresis.
//!
//! ## Evaluation order
//!
//! 1. Clear the list.
//! 2. Gas quantities (CO, LPG, smoke), but only once *both* gas sensors
//!    have warmed up.  Before that every gas reading is ignored.
//! 3. Power rails, interior climate, tilt.
//!
//! Each quantity walks its tier table most → least severe and records at
//! most one alert.  Gas is evaluated first, so on a severity tie the gas
//! alert becomes the primary one.
//!
//! ## Response
//!
//! The overall severity selects an [`AlertAction`] via [`action_for`]:
//! buzzer pattern, display navigation lock, and a mode change.

use log::{error, info, warn};

use crate::config::{
    CO_THRESHOLD_DANGER, CO_THRESHOLD_INFO, CO_THRESHOLD_WARNING, CURRENT_5V_MAX,
    CURRENT_12V_MAX, HUMIDITY_WARNING, LPG_THRESHOLD_DANGER, LPG_THRESHOLD_INFO,
    LPG_THRESHOLD_WARNING, SMOKE_THRESHOLD_DANGER, SMOKE_THRESHOLD_INFO, SMOKE_THRESHOLD_WARNING,
    TEMP_FREEZING, TEMP_WARNING, TILT_WARNING, VOLTAGE_5V_MAX, VOLTAGE_5V_MIN,
    VOLTAGE_12V_MAX, VOLTAGE_12V_MIN, VOLTAGE_12V_WARNING,
};
use crate::state::{Alert, AlertKind, Severity, SystemMode, SystemState};
use crate::time::Millis;

// ═══════════════════════════════════════════════════════════════
//  Response table
// ═══════════════════════════════════════════════════════════════

/// Audible pattern requested from the buzzer driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuzzerPattern {
    #[default]
    Silent,
    /// 1000 ms on / 1000 ms off.
    SlowPulse,
    /// 200 ms on / 200 ms off.
    FastPulse,
    Continuous,
}

impl BuzzerPattern {
    /// Toggle period for pulsed patterns.
    pub const fn half_period_ms(self) -> Option<u32> {
        match self {
            Self::SlowPulse => Some(crate::config::BUZZER_SLOW_HALF_PERIOD_MS),
            Self::FastPulse => Some(crate::config::BUZZER_FAST_HALF_PERIOD_MS),
            Self::Silent | Self::Continuous => None,
        }
    }
}

/// What happens to the operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEffect {
    Keep,
    /// Switch to [`SystemMode::Alert`].
    EnterAlert,
    /// Leave [`SystemMode::Alert`] for [`SystemMode::Normal`]; other
    /// modes are untouched.
    LeaveAlert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertAction {
    pub buzzer: BuzzerPattern,
    pub navigation_blocked: bool,
    pub mode: ModeEffect,
}

/// Response to an overall severity.  Total and side-effect free.
pub const fn action_for(severity: Severity) -> AlertAction {
    match severity {
        Severity::Critical => AlertAction {
            buzzer: BuzzerPattern::Continuous,
            navigation_blocked: true,
            mode: ModeEffect::EnterAlert,
        },
        Severity::Danger => AlertAction {
            buzzer: BuzzerPattern::FastPulse,
            navigation_blocked: true,
            mode: ModeEffect::EnterAlert,
        },
        Severity::Warning => AlertAction {
            buzzer: BuzzerPattern::SlowPulse,
            navigation_blocked: false,
            mode: ModeEffect::Keep,
        },
        Severity::Info | Severity::None => AlertAction {
            buzzer: BuzzerPattern::Silent,
            navigation_blocked: false,
            mode: ModeEffect::LeaveAlert,
        },
    }
}

// ═══════════════════════════════════════════════════════════════
//  Threshold tables
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Alert when `value > threshold`.
    Above,
    /// Alert when `value < threshold`.
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub severity: Severity,
    pub threshold: f32,
    pub message: &'static str,
}

const fn tier(severity: Severity, threshold: f32, message: &'static str) -> Tier {
    Tier {
        severity,
        threshold,
        message,
    }
}

/// One monitored quantity.  `tiers` is ordered most severe first.
#[derive(Clone, Copy)]
pub struct Rule {
    pub kind: AlertKind,
    pub direction: Direction,
    pub tiers: &'static [Tier],
    /// Current value, or `None` when the reading is not valid.
    pub read: fn(&SystemState) -> Option<f32>,
}

impl Rule {
    /// Highest tier `value` crosses.  Comparisons are strict; NaN crosses
    /// nothing.
    pub fn classify(&self, value: f32) -> Option<&'static Tier> {
        self.tiers.iter().find(|t| match self.direction {
            Direction::Above => value > t.threshold,
            Direction::Below => value < t.threshold,
        })
    }
}

pub const GAS_RULES: [Rule; 3] = [
    Rule {
        kind: AlertKind::CoHigh,
        direction: Direction::Above,
        tiers: &[
            tier(Severity::Critical, CO_THRESHOLD_DANGER, "CO critical - ventilate"),
            tier(Severity::Warning, CO_THRESHOLD_WARNING, "CO elevated"),
            tier(Severity::Info, CO_THRESHOLD_INFO, "CO detected"),
        ],
        read: |s| s.safety.co_valid.then_some(s.safety.co_ppm),
    },
    Rule {
        kind: AlertKind::LpgHigh,
        direction: Direction::Above,
        tiers: &[
            tier(Severity::Critical, LPG_THRESHOLD_DANGER, "Gas leak - evacuate"),
            tier(Severity::Warning, LPG_THRESHOLD_WARNING, "Gas elevated"),
            tier(Severity::Info, LPG_THRESHOLD_INFO, "Gas detected"),
        ],
        read: |s| s.safety.lpg_valid.then_some(s.safety.lpg_ppm),
    },
    Rule {
        kind: AlertKind::SmokeHigh,
        direction: Direction::Above,
        tiers: &[
            tier(Severity::Danger, SMOKE_THRESHOLD_DANGER, "Smoke detected"),
            tier(Severity::Warning, SMOKE_THRESHOLD_WARNING, "Smoke rising"),
            tier(Severity::Info, SMOKE_THRESHOLD_INFO, "Possible smoke"),
        ],
        read: |s| s.safety.smoke_valid.then_some(s.safety.smoke_ppm),
    },
];

pub const ENVIRONMENT_RULES: [Rule; 10] = [
    Rule {
        kind: AlertKind::Voltage12vLow,
        direction: Direction::Below,
        tiers: &[
            tier(Severity::Danger, VOLTAGE_12V_MIN, "Battery critical"),
            tier(Severity::Warning, VOLTAGE_12V_WARNING, "Battery low"),
        ],
        read: |s| s.power.rail_12v_valid.then_some(s.power.voltage_12v),
    },
    Rule {
        kind: AlertKind::Voltage12vHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Warning, VOLTAGE_12V_MAX, "12V overvoltage")],
        read: |s| s.power.rail_12v_valid.then_some(s.power.voltage_12v),
    },
    Rule {
        kind: AlertKind::Voltage5vLow,
        direction: Direction::Below,
        tiers: &[tier(Severity::Danger, VOLTAGE_5V_MIN, "5V rail low")],
        read: |s| s.power.rail_5v_valid.then_some(s.power.voltage_5v),
    },
    Rule {
        kind: AlertKind::Voltage5vHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Warning, VOLTAGE_5V_MAX, "5V rail high")],
        read: |s| s.power.rail_5v_valid.then_some(s.power.voltage_5v),
    },
    Rule {
        kind: AlertKind::Current12vHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Warning, CURRENT_12V_MAX, "12V overcurrent")],
        read: |s| s.power.rail_12v_valid.then_some(s.power.current_12v),
    },
    Rule {
        kind: AlertKind::Current5vHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Warning, CURRENT_5V_MAX, "5V overcurrent")],
        read: |s| s.power.rail_5v_valid.then_some(s.power.current_5v),
    },
    Rule {
        kind: AlertKind::TempHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Warning, TEMP_WARNING, "Interior too hot")],
        read: |s| {
            s.environment
                .temp_interior_valid
                .then_some(s.environment.temp_interior)
        },
    },
    Rule {
        kind: AlertKind::TempLow,
        direction: Direction::Below,
        tiers: &[tier(Severity::Warning, TEMP_FREEZING, "Freezing inside")],
        read: |s| {
            s.environment
                .temp_interior_valid
                .then_some(s.environment.temp_interior)
        },
    },
    Rule {
        kind: AlertKind::HumidityHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Info, HUMIDITY_WARNING, "High humidity")],
        read: |s| s.environment.humidity_valid.then_some(s.environment.humidity),
    },
    Rule {
        kind: AlertKind::TiltHigh,
        direction: Direction::Above,
        tiers: &[tier(Severity::Warning, TILT_WARNING, "Vehicle not level")],
        read: |s| s.level.valid.then_some(s.level.total_tilt),
    },
];

// ═══════════════════════════════════════════════════════════════
//  Engine
// ═══════════════════════════════════════════════════════════════

/// Keeps only what it needs to log transitions once.
#[derive(Debug, Default)]
pub struct AlertEngine {
    last_severity: Severity,
    last_primary: Option<AlertKind>,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the alert set from `state` and apply the response.
    /// Returns the overall severity.
    pub fn check(&mut self, state: &mut SystemState, now: Millis) -> Severity {
        state.alerts.alerts.clear();

        if state.safety.gas_gate_open() {
            evaluate(&GAS_RULES, state, now);
        }
        evaluate(&ENVIRONMENT_RULES, state, now);

        let severity = state
            .alerts
            .alerts
            .iter()
            .map(|a| a.severity)
            .max()
            .unwrap_or(Severity::None);
        let primary = state
            .alerts
            .alerts
            .iter()
            .find(|a| a.severity == severity)
            .map(|a| a.kind);

        let alerts = &mut state.alerts;
        alerts.severity = severity;
        alerts.primary = primary;
        alerts.active_count = alerts.alerts.len() as u8;

        let action = action_for(severity);
        alerts.buzzer_active = action.buzzer != BuzzerPattern::Silent;
        alerts.navigation_blocked = action.navigation_blocked;
        state.mode = apply_mode(state.mode, action.mode);

        self.log_transition(state, severity, primary);
        severity
    }

    pub fn last_severity(&self) -> Severity {
        self.last_severity
    }

    fn log_transition(&mut self, state: &SystemState, severity: Severity, primary: Option<AlertKind>) {
        if severity == self.last_severity && primary == self.last_primary {
            return;
        }
        let detail = primary.and_then(|k| state.alerts.iter().find(|a| a.kind == k));
        match detail {
            Some(a) if severity >= Severity::Danger => error!(
                "ALERT {}: {} ({:.1} vs {:.1}), {} active",
                severity, a.message, a.value, a.threshold, state.alerts.active_count
            ),
            Some(a) if severity > self.last_severity => warn!(
                "Alert {}: {} ({:.1} vs {:.1})",
                severity, a.message, a.value, a.threshold
            ),
            Some(a) => info!("Alert now {}: {}", severity, a.message),
            None => info!("All alerts cleared (was {})", self.last_severity),
        }
        self.last_severity = severity;
        self.last_primary = primary;
    }
}

fn evaluate(rules: &[Rule], state: &mut SystemState, now: Millis) {
    for rule in rules {
        let Some(value) = (rule.read)(state) else {
            continue;
        };
        if let Some(tier) = rule.classify(value) {
            // Overflow is dropped; the list is bounded.
            let _ = state.alerts.alerts.push(Alert {
                kind: rule.kind,
                severity: tier.severity,
                value,
                threshold: tier.threshold,
                timestamp: now,
                message: tier.message,
            });
        }
    }
}

fn apply_mode(mode: SystemMode, effect: ModeEffect) -> SystemMode {
    match (effect, mode) {
        (ModeEffect::EnterAlert, _) => SystemMode::Alert,
        (ModeEffect::LeaveAlert, SystemMode::Alert) => SystemMode::Normal,
        _ => mode,
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
