//! Outbound monitor events.
//!
//! The [`Monitor`](super::service::Monitor) emits these through the
//! [`EventSink`](super::ports::EventSink) port on state edges only.
//! Adapters on the other side decide what to do with them: log to
//! serial, refresh the display, flash the status LED.

use serde::Serialize;

use crate::sensors::SensorKind;
use crate::state::{AlertKind, Severity, SystemMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// A driver was registered (carries its start-up probe result).
    SensorRegistered { kind: SensorKind, available: bool },

    /// Acquisition started.
    Started { active_sensors: usize, registered: usize },

    /// Both gas sensors finished warming up.
    PreheatComplete,

    /// The operating mode changed.
    ModeChanged { from: SystemMode, to: SystemMode },

    /// The overall alert severity changed.
    SeverityChanged {
        from: Severity,
        to: Severity,
        primary: Option<AlertKind>,
    },
}
