//! Monitor service, the core of the loop.
//!
//! [`Monitor`] owns the [`SystemState`], the acquisition scheduler, the
//! alert engine and the buzzer driver.  All hardware access flows through
//! port traits, so the whole service runs against mock adapters in tests.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │           Monitor            │
//!  ToneOutput ◀── │ Scheduler · Alerts · Buzzer  │
//!                 └──────────────────────────────┘
//! ```
//!
//! Stage order inside [`Monitor::tick`] is fixed: acquisition, then
//! alert evaluation, then the buzzer.  Each stage receives the state by
//! reference in turn, so there is never more than one writer.

use log::info;

use crate::alerts::AlertEngine;
use crate::drivers::buzzer::BuzzerDriver;
use crate::error::Result;
use crate::scheduler::AcquisitionScheduler;
use crate::sensors::SensorKind;
use crate::state::{SystemMode, SystemState};
use crate::time::Millis;

use super::events::MonitorEvent;
use super::ports::{EventSink, SensorPort, ToneOutput};

pub struct Monitor<T> {
    state: SystemState,
    scheduler: AcquisitionScheduler,
    alerts: AlertEngine,
    buzzer: BuzzerDriver<T>,
}

impl<T: ToneOutput> Monitor<T> {
    pub fn new(tone: T) -> Self {
        Self {
            state: SystemState::new(),
            scheduler: AcquisitionScheduler::new(),
            alerts: AlertEngine::new(),
            buzzer: BuzzerDriver::new(tone),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Hand a sensor driver to the scheduler.  Fails only when the
    /// sensor table is full.
    pub fn register(
        &mut self,
        sensor: Box<dyn SensorPort>,
        sink: &mut impl EventSink,
    ) -> Result<SensorKind> {
        let available = sensor.is_available();
        let kind = self.scheduler.register(sensor, &mut self.state.sensors)?;
        sink.emit(&MonitorEvent::SensorRegistered { kind, available });
        Ok(kind)
    }

    /// Start warm-up clocks, chirp the buzzer, enter Preheat.
    pub fn begin(&mut self, now: Millis, sink: &mut impl EventSink) {
        self.scheduler.begin(&mut self.state, now);
        self.state.sensors.buzzer = self.buzzer.is_available();
        self.buzzer.begin(now);
        sink.emit(&MonitorEvent::Started {
            active_sensors: self.scheduler.active_sensor_count(),
            registered: self.scheduler.registered(),
        });
        info!("Monitor started in {}", self.state.mode.label());
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// One loop pass: acquisition → alerts → buzzer.
    pub fn tick(&mut self, now: Millis, sink: &mut impl EventSink) {
        let prev_mode = self.state.mode;
        let prev_severity = self.state.alerts.severity;

        // 1. Acquisition
        let outcome = self.scheduler.update(&mut self.state, now);
        if outcome.preheat_completed {
            sink.emit(&MonitorEvent::PreheatComplete);
        }

        // 2. Alerts
        let severity = self.alerts.check(&mut self.state, now);

        // 3. Buzzer
        self.buzzer.update(severity, now);

        if severity != prev_severity {
            sink.emit(&MonitorEvent::SeverityChanged {
                from: prev_severity,
                to: severity,
                primary: self.state.alerts.primary,
            });
        }
        let mode = self.state.mode;
        if mode != prev_mode {
            sink.emit(&MonitorEvent::ModeChanged {
                from: prev_mode,
                to: mode,
            });
        }
    }

    // ── Display-layer requests ────────────────────────────────

    /// Open the settings menu.  Refused while preheating or alerting.
    pub fn enter_settings(&mut self, sink: &mut impl EventSink) -> bool {
        self.switch_mode(SystemMode::Normal, SystemMode::Settings, sink)
    }

    pub fn leave_settings(&mut self, sink: &mut impl EventSink) -> bool {
        self.switch_mode(SystemMode::Settings, SystemMode::Normal, sink)
    }

    /// Mute the buzzer until the next pass re-evaluates the pattern.
    pub fn silence_buzzer(&mut self) {
        self.buzzer.silence();
    }

    fn switch_mode(&mut self, from: SystemMode, to: SystemMode, sink: &mut impl EventSink) -> bool {
        if self.state.mode != from {
            return false;
        }
        self.state.mode = to;
        sink.emit(&MonitorEvent::ModeChanged { from, to });
        true
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot for the display / LED layers.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Gas warm-up countdown in seconds (0 once warm).
    pub fn preheat_remaining(&self, now: Millis) -> u32 {
        self.scheduler.preheat_remaining(now)
    }

    pub fn preheat_percent(&self, now: Millis) -> u8 {
        self.scheduler.preheat_percent(now)
    }

    pub fn active_sensor_count(&self) -> usize {
        self.scheduler.active_sensor_count()
    }

    pub fn buzzer(&self) -> &BuzzerDriver<T> {
        &self.buzzer
    }

    pub fn buzzer_mut(&mut self) -> &mut BuzzerDriver<T> {
        &mut self.buzzer
    }
}
