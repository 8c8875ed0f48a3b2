//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements | Connects to          |
//! |------------|------------|----------------------|
//! | `log_sink` | EventSink  | `log` facade output  |
//!
//! The PWM buzzer lives in [`crate::drivers::pwm_buzzer`] with the other
//! output drivers.

pub mod log_sink;
