//! Unified error types for the monitor core.
//!
//! `SensorError` is what a hardware source reports; `Error` is what the
//! public API returns.  Both are `Copy` so they can be passed around and
//! logged without allocation.
//!
//! Errors never escape the control loop: sensor drivers turn a failed
//! read into "no reading this pass" and log it.  Only start-up
//! registration hands an [`Error`] back to the caller.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Start-up wiring failed (e.g. sensor table full).
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Device did not answer on its bus.
    NotResponding,
    /// ADC read returned an error.
    AdcReadFailed,
    /// Sense voltage too low to derive a resistance.
    VoltageTooLow,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResponding => write!(f, "device not responding"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::VoltageTooLow => write!(f, "sense voltage too low"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
