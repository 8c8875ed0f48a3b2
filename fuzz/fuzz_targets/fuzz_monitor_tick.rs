//! Fuzz target: `Monitor::tick` over arbitrary sensor values and timing
//!
//! Each 8-byte record sets a time step, the two gas ADC counts, a 12 V
//! rail voltage and a tilt angle, then runs one loop pass.
//!
//! Invariants checked:
//! - No panics under any byte sequence (including timer rollover)
//! - Never more than `MAX_ALERTS` active alerts
//! - No gas alert while either gas sensor is still warming up
//! - Navigation is blocked exactly when severity is Danger or above
//!
//! cargo fuzz run fuzz_monitor_tick

#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use vanmon::Monitor;
use vanmon::app::events::MonitorEvent;
use vanmon::app::ports::{
    AnalogInput, Attitude, EventSink, InclinometerSource, PowerMonitorSource, RailMeasurement,
    ToneOutput,
};
use vanmon::config::MAX_ALERTS;
use vanmon::error::SensorError;
use vanmon::sensors::Rail;
use vanmon::sensors::mq2::Mq2Sensor;
use vanmon::sensors::mq7::Mq7Sensor;
use vanmon::sensors::power_rail::PowerRailSensor;
use vanmon::sensors::tilt::TiltSensor;
use vanmon::state::Severity;
use vanmon::time::Millis;

struct Adc(Rc<Cell<u16>>);

impl AnalogInput for Adc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        Ok(self.0.get())
    }
}

struct Ina(Rc<Cell<f32>>);

impl PowerMonitorSource for Ina {
    fn probe(&mut self) -> bool {
        true
    }
    fn measure(&mut self) -> Result<RailMeasurement, SensorError> {
        let v = self.0.get();
        Ok(RailMeasurement {
            bus_voltage: v,
            current_a: 1.0,
            power_w: v,
        })
    }
}

struct Imu(Rc<Cell<f32>>);

impl InclinometerSource for Imu {
    fn probe(&mut self) -> bool {
        true
    }
    fn read_attitude(&mut self) -> Result<Attitude, SensorError> {
        Ok(Attitude {
            roll_deg: self.0.get(),
            pitch_deg: 0.0,
            die_temperature_c: 25.0,
        })
    }
}

struct Silent;

impl ToneOutput for Silent {
    fn start_tone(&mut self, _hz: u16, _ms: Option<u32>, _now: Millis) {}
    fn stop_tone(&mut self) {}
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &MonitorEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let co = Rc::new(Cell::new(0u16));
    let gas = Rc::new(Cell::new(0u16));
    let volts = Rc::new(Cell::new(12.6f32));
    let roll = Rc::new(Cell::new(0.0f32));

    let mut monitor = Monitor::new(Silent);
    let mut sink = Discard;
    let sensors: [Box<dyn vanmon::app::ports::SensorPort>; 4] = [
        Box::new(Mq7Sensor::new(Adc(co.clone()))),
        Box::new(Mq2Sensor::new(Adc(gas.clone()))),
        Box::new(PowerRailSensor::new(Ina(volts.clone()), Rail::V12)),
        Box::new(TiltSensor::new(Imu(roll.clone()))),
    ];
    for s in sensors {
        if monitor.register(s, &mut sink).is_err() {
            return;
        }
    }

    // Start near the top of the u32 range so rollover is exercised.
    let mut now = u32::MAX - 200_000;
    monitor.begin(Millis(now), &mut sink);

    for rec in data.chunks_exact(8) {
        now = now.wrapping_add(u32::from(u16::from_le_bytes([rec[0], rec[1]])) * 8);
        co.set(u16::from_le_bytes([rec[2], rec[3]]) & 0x3FF);
        gas.set(u16::from_le_bytes([rec[4], rec[5]]) & 0x3FF);
        volts.set(f32::from(rec[6]) / 10.0);
        roll.set(f32::from(rec[7] as i8) / 2.0);

        monitor.tick(Millis(now), &mut sink);

        let state = monitor.state();
        assert!(state.alerts.alerts.len() <= MAX_ALERTS);
        if !state.safety.gas_gate_open() {
            assert!(state.alerts.iter().all(|a| !a.kind.is_gas()));
        }
        assert_eq!(
            state.alerts.navigation_blocked,
            state.alerts.severity >= Severity::Danger
        );
    }
});
