//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing monitor events through the `log`
//! facade (UART / USB-CDC on the device, stderr on a host).

use log::{info, warn};

use crate::app::events::MonitorEvent;
use crate::app::ports::EventSink;
use crate::state::Severity;

/// Adapter that logs every [`MonitorEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MonitorEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            MonitorEvent::SensorRegistered { kind, available } => {
                info!(
                    "SENSOR | {} {}",
                    kind.name(),
                    if *available { "OK" } else { "MISSING" }
                );
            }
            MonitorEvent::Started {
                active_sensors,
                registered,
            } => {
                info!("START | {active_sensors}/{registered} sensors active");
            }
            MonitorEvent::PreheatComplete => {
                info!("PREHEAT | complete");
            }
            MonitorEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.label(), to.label());
            }
            MonitorEvent::SeverityChanged { from, to, primary } => {
                let what = primary.map_or("-", |k| k.label());
                if to > from && *to >= Severity::Warning {
                    warn!("ALERT | {from} -> {to} ({what})");
                } else {
                    info!("ALERT | {from} -> {to} ({what})");
                }
            }
        }
    }
}
