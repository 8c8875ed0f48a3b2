//! MQ7 heater cycle state machine.
//!
//! The MQ7 element must be alternately burned clean at high heater
//! voltage and then cooled to a low voltage, where carbon monoxide is
//! actually adsorbed and measured.  On top of that a fresh sensor needs a
//! long initial warm-up.
//!
//! ```text
//!               begin()          preheat elapsed
//!  NotStarted ──────────▶ Preheating ──────────────▶ HeatingHigh
//!                                                     │      ▲
//!                                   high phase elapsed│      │low phase elapsed
//!                                                     ▼      │
//!                                                   HeatingLow
//! ```
//!
//! Transitions are purely time driven.  Each call to [`HeatingCycle::update`]
//! performs **at most one** transition and the new phase starts at the
//! `now` of that call, so irregular call spacing can delay a phase but
//! never skip or double one.
//!
//! Only [`HeatingPhase::HeatingLow`] opens the reading window.  Note that
//! "cycling" (preheat done) and "reading window open" are deliberately
//! separate queries: the first says the sensor is warm, the second says
//! its output may be trusted right now.

use core::fmt;

use log::debug;

use crate::config::{CO_HIGH_PHASE_MS, CO_LOW_PHASE_MS, CO_PREHEAT_MS};
use crate::time::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatingPhase {
    NotStarted,
    Preheating,
    /// 5 V cleaning burn. Output meaningless.
    HeatingHigh,
    /// 1.4 V measurement phase. Output valid.
    HeatingLow,
}

impl HeatingPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT STARTED",
            Self::Preheating => "PREHEAT",
            Self::HeatingHigh => "HEAT HIGH",
            Self::HeatingLow => "HEAT LOW",
        }
    }
}

impl fmt::Display for HeatingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatingTiming {
    pub preheat_ms: u32,
    pub high_ms: u32,
    pub low_ms: u32,
}

impl HeatingTiming {
    /// Datasheet timing for the MQ7.
    pub const MQ7: Self = Self {
        preheat_ms: CO_PREHEAT_MS,
        high_ms: CO_HIGH_PHASE_MS,
        low_ms: CO_LOW_PHASE_MS,
    };
}

impl Default for HeatingTiming {
    fn default() -> Self {
        Self::MQ7
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeatingCycle {
    timing: HeatingTiming,
    phase: HeatingPhase,
    /// Set by `begin`.
    started_at: Millis,
    /// Start of the current phase.
    phase_started_at: Millis,
}

impl HeatingCycle {
    pub const fn new(timing: HeatingTiming) -> Self {
        Self {
            timing,
            phase: HeatingPhase::NotStarted,
            started_at: Millis::ZERO,
            phase_started_at: Millis::ZERO,
        }
    }

    /// Start (or restart) the warm-up at `now`.
    pub fn begin(&mut self, now: Millis) {
        self.phase = HeatingPhase::Preheating;
        self.started_at = now;
        self.phase_started_at = now;
    }

    /// Advance the cycle.  Returns the phase entered, if a transition
    /// happened on this call.
    pub fn update(&mut self, now: Millis) -> Option<HeatingPhase> {
        let elapsed = now.elapsed_since(self.phase_started_at);
        let next = match self.phase {
            HeatingPhase::NotStarted => return None,
            HeatingPhase::Preheating if elapsed >= self.timing.preheat_ms => {
                HeatingPhase::HeatingHigh
            }
            HeatingPhase::HeatingHigh if elapsed >= self.timing.high_ms => {
                HeatingPhase::HeatingLow
            }
            HeatingPhase::HeatingLow if elapsed >= self.timing.low_ms => {
                HeatingPhase::HeatingHigh
            }
            _ => return None,
        };
        debug!("MQ7 heater: {} -> {} at {}", self.phase, next, now);
        self.phase = next;
        self.phase_started_at = now;
        Some(next)
    }

    pub fn phase(&self) -> HeatingPhase {
        self.phase
    }

    pub fn timing(&self) -> HeatingTiming {
        self.timing
    }

    /// Readings taken now may be marked valid.
    pub fn reading_window_open(&self) -> bool {
        self.phase == HeatingPhase::HeatingLow
    }

    /// Initial warm-up is over and the high/low cycle is running.
    pub fn is_cycling(&self) -> bool {
        matches!(
            self.phase,
            HeatingPhase::HeatingHigh | HeatingPhase::HeatingLow
        )
    }

    /// Warm-up has run its full duration as of `now`, whether or not
    /// `update` has been called since.
    pub fn preheat_complete(&self, now: Millis) -> bool {
        match self.phase {
            HeatingPhase::NotStarted => false,
            HeatingPhase::Preheating => now.has_elapsed(self.started_at, self.timing.preheat_ms),
            HeatingPhase::HeatingHigh | HeatingPhase::HeatingLow => true,
        }
    }

    /// Milliseconds of warm-up left; 0 once cycling.
    pub fn preheat_remaining_ms(&self, now: Millis) -> u32 {
        match self.phase {
            HeatingPhase::NotStarted => self.timing.preheat_ms,
            HeatingPhase::Preheating => self
                .timing
                .preheat_ms
                .saturating_sub(now.elapsed_since(self.started_at)),
            _ => 0,
        }
    }

    /// Time spent in the current phase.
    pub fn phase_elapsed_ms(&self, now: Millis) -> u32 {
        now.elapsed_since(self.phase_started_at)
    }
}

impl Default for HeatingCycle {
    fn default() -> Self {
        Self::new(HeatingTiming::MQ7)
    }
}
