//! Application core: orchestration and the port boundary.
//!
//! [`service::Monitor`] sequences acquisition, alert evaluation and the
//! buzzer.  All interaction with hardware happens through the **port
//! traits** in [`ports`], keeping this layer testable without peripherals.

pub mod events;
pub mod ports;
pub mod service;
