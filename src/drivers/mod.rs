//! Output drivers.

pub mod buzzer;
pub mod pwm_buzzer;
