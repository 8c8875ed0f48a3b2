//! VanMon monitor core library.
//!
//! Sensor acquisition, the MQ7 heater cycle, tiered alert evaluation and
//! buzzer patterns for a camper-van safety monitor.  Hardware is reached
//! only through the port traits in [`app::ports`]; the board support
//! layer supplies the adapters and the logger backend.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alerts;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod scheduler;
pub mod sensors;
pub mod state;
pub mod time;
pub mod validity;

pub use app::service::Monitor;
pub use error::{Error, Result, SensorError};
pub use state::{Severity, SystemMode, SystemState};
pub use time::Millis;
