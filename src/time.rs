//! Monotonic millisecond time base.
//!
//! The board exposes a free-running `u32` millisecond counter (the same
//! shape as Arduino `millis()` or a truncated `esp_timer_get_time()`).
//! It rolls over after ~49.7 days, so every elapsed-time computation in
//! the core goes through [`Millis::elapsed_since`], which uses wrapping
//! subtraction.  Comparing two raw timestamps with `<` is never correct.

use core::fmt;

use serde::Serialize;

/// A point on the monotonic millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Self = Self(0);

    pub const fn from_ms(ms: u32) -> Self {
        Self(ms)
    }

    pub const fn as_ms(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, correct across a
    /// single counter roll-over.
    pub const fn elapsed_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `true` once at least `duration_ms` has passed since `earlier`.
    pub const fn has_elapsed(self, earlier: Millis, duration_ms: u32) -> bool {
        self.elapsed_since(earlier) >= duration_ms
    }

    /// A timestamp `ms` later on the (wrapping) clock.
    pub const fn offset(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Non-blocking "has my sampling interval elapsed?" gate.
///
/// The first call to [`IntervalTimer::ready`] always fires so a freshly
/// started sensor produces a sample on the first loop pass.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    interval_ms: u32,
    last: Option<Millis>,
}

impl IntervalTimer {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// Returns `true` (and re-arms) when the interval has elapsed.
    pub fn ready(&mut self, now: Millis) -> bool {
        match self.last {
            Some(last) if !now.has_elapsed(last, self.interval_ms) => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
