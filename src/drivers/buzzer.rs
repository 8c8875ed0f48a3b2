//! Buzzer pattern driver.
//!
//! Turns the overall alert severity into an audible pattern on a
//! [`ToneOutput`].  Runs last in every loop pass and never blocks: pulsed
//! patterns are produced by toggling on elapsed time, and each "on" half
//! is a bounded tone that the output ends by itself.
//!
//! | Severity | Pattern    | On / off          |
//! |----------|------------|-------------------|
//! | Critical | Continuous | -                 |
//! | Danger   | FastPulse  | 150 ms / 200 ms   |
//! | Warning  | SlowPulse  | 950 ms / 1000 ms  |
//! | other    | Silent     | -                 |
//!
//! The 50 ms gap between the tone and the half-period keeps consecutive
//! beeps audibly separate.

use log::{debug, info};

use crate::alerts::{BuzzerPattern, action_for};
use crate::app::ports::ToneOutput;
use crate::config::{BUZZER_CHIRP_MS, BUZZER_FREQUENCY_HZ, BUZZER_GAP_MS};
use crate::state::Severity;
use crate::time::Millis;

pub struct BuzzerDriver<T> {
    output: T,
    pattern: BuzzerPattern,
    is_on: bool,
    last_toggle: Option<Millis>,
}

impl<T: ToneOutput> BuzzerDriver<T> {
    pub fn new(output: T) -> Self {
        Self {
            output,
            pattern: BuzzerPattern::Silent,
            is_on: false,
            last_toggle: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.output.is_available()
    }

    /// Short start-up chirp.  Ends on its own via `service`.
    pub fn begin(&mut self, now: Millis) {
        if !self.is_available() {
            info!("Buzzer not available, alerts will be silent");
            return;
        }
        self.output
            .start_tone(BUZZER_FREQUENCY_HZ, Some(BUZZER_CHIRP_MS), now);
        info!("Buzzer ready ({BUZZER_FREQUENCY_HZ} Hz)");
    }

    /// Drive the pattern for `severity`.  Call once per loop pass.
    pub fn update(&mut self, severity: Severity, now: Millis) {
        if !self.is_available() {
            return;
        }
        self.output.service(now);

        let pattern = action_for(severity).buzzer;
        if pattern != self.pattern {
            debug!("Buzzer {:?} -> {:?}", self.pattern, pattern);
            self.pattern = pattern;
            if self.is_on {
                self.output.stop_tone();
            }
            self.is_on = false;
            self.last_toggle = None;
        }

        match pattern {
            BuzzerPattern::Silent => {
                if self.is_on {
                    self.output.stop_tone();
                }
                self.is_on = false;
                self.last_toggle = None;
            }
            BuzzerPattern::Continuous => {
                if !self.is_on {
                    self.output.start_tone(BUZZER_FREQUENCY_HZ, None, now);
                    self.is_on = true;
                }
            }
            BuzzerPattern::SlowPulse | BuzzerPattern::FastPulse => {
                let Some(half) = pattern.half_period_ms() else {
                    return;
                };
                let due = self.last_toggle.is_none_or(|t| now.has_elapsed(t, half));
                if due {
                    self.is_on = !self.is_on;
                    self.last_toggle = Some(now);
                    if self.is_on {
                        let on_ms = half.saturating_sub(BUZZER_GAP_MS);
                        self.output.start_tone(BUZZER_FREQUENCY_HZ, Some(on_ms), now);
                    }
                }
            }
        }
    }

    /// Stop sounding now.  The next `update` re-evaluates the pattern.
    pub fn silence(&mut self) {
        self.output.stop_tone();
        self.pattern = BuzzerPattern::Silent;
        self.is_on = false;
        self.last_toggle = None;
    }

    /// The pattern is currently in an "on" half (or continuous).
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn pattern(&self) -> BuzzerPattern {
        self.pattern
    }

    pub fn output(&self) -> &T {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut T {
        &mut self.output
    }
}
