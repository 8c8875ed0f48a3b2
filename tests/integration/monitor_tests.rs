//! End-to-end tests for the Monitor → scheduler → alerts → buzzer pipeline.
//!
//! A full rig of the bundled drivers runs on mock sources; the loop is
//! stepped every 500 ms of simulated time.

use super::mock_hw::{
    MockAdc, MockClimate, MockInclinometer, MockPowerMonitor, MockThermometer, MockTone,
    RecordingSink, Shared, ToneCall, rail, raw_for_co_ppm, shared,
};

use vanmon::Monitor;
use vanmon::alerts::BuzzerPattern;
use vanmon::app::events::MonitorEvent;
use vanmon::app::ports::{Attitude, ClimateMeasurement, RailMeasurement};
use vanmon::error::{Error, SensorError};
use vanmon::sensors::Rail;
use vanmon::sensors::climate::ClimateSensor;
use vanmon::sensors::heating::HeatingPhase;
use vanmon::sensors::mq2::Mq2Sensor;
use vanmon::sensors::mq7::Mq7Sensor;
use vanmon::sensors::outdoor::OutdoorSensor;
use vanmon::sensors::power_rail::PowerRailSensor;
use vanmon::sensors::tilt::TiltSensor;
use vanmon::state::{AlertKind, Severity, SystemMode};
use vanmon::time::Millis;

const STEP_MS: u32 = 500;
/// MQ7 ADC count for clean air (ratio ≈ 4, under the detection floor).
const CO_CLEAN_RAW: u16 = 205;
/// MQ2 ADC count for clean air (ratio ≈ 1).
const GAS_CLEAN_RAW: u16 = 517;
/// MQ2 ADC count giving ~650 ppm LPG (ratio ≈ 0.11).
const GAS_LPG_INFO_RAW: u16 = 923;
/// First HeatingLow window of the MQ7.
const FIRST_LOW_PHASE_MS: u32 = 240_000;

struct Rig {
    monitor: Monitor<MockTone>,
    sink: RecordingSink,
    now: u32,
    co_raw: Shared<Result<u16, SensorError>>,
    gas_raw: Shared<Result<u16, SensorError>>,
    climate: Shared<ClimateMeasurement>,
    tilt: Shared<Attitude>,
    rail_12v: Shared<Result<RailMeasurement, SensorError>>,
}

impl Rig {
    fn new() -> Self {
        Self::with_5v_rail(true)
    }

    fn with_5v_rail(present_5v: bool) -> Self {
        let co_raw = shared(Ok(CO_CLEAN_RAW));
        let gas_raw = shared(Ok(GAS_CLEAN_RAW));
        let climate = shared(ClimateMeasurement {
            temperature_c: 21.0,
            humidity_percent: 45.0,
            pressure_hpa: 1013.0,
        });
        let tilt = shared(Attitude {
            roll_deg: 1.0,
            pitch_deg: 0.5,
            die_temperature_c: 25.0,
        });
        let rail_12v = shared(Ok(rail(12.8, 2.0)));

        let mut monitor = Monitor::new(MockTone::new());
        let mut sink = RecordingSink::new();

        monitor
            .register(
                Box::new(Mq7Sensor::new(MockAdc {
                    raw: co_raw.clone(),
                })),
                &mut sink,
            )
            .unwrap();
        monitor
            .register(
                Box::new(Mq2Sensor::new(MockAdc {
                    raw: gas_raw.clone(),
                })),
                &mut sink,
            )
            .unwrap();
        monitor
            .register(
                Box::new(ClimateSensor::new(MockClimate {
                    present: true,
                    value: climate.clone(),
                })),
                &mut sink,
            )
            .unwrap();
        monitor
            .register(
                Box::new(OutdoorSensor::new(MockThermometer {
                    present: true,
                    celsius: shared(8.0),
                })),
                &mut sink,
            )
            .unwrap();
        monitor
            .register(
                Box::new(TiltSensor::new(MockInclinometer {
                    present: true,
                    attitude: tilt.clone(),
                })),
                &mut sink,
            )
            .unwrap();
        monitor
            .register(
                Box::new(PowerRailSensor::new(
                    MockPowerMonitor {
                        present: true,
                        value: rail_12v.clone(),
                    },
                    Rail::V12,
                )),
                &mut sink,
            )
            .unwrap();
        monitor
            .register(
                Box::new(PowerRailSensor::new(
                    MockPowerMonitor {
                        present: present_5v,
                        value: shared(Ok(rail(5.05, 0.5))),
                    },
                    Rail::V5,
                )),
                &mut sink,
            )
            .unwrap();

        monitor.begin(Millis(0), &mut sink);

        Self {
            monitor,
            sink,
            now: 0,
            co_raw,
            gas_raw,
            climate,
            tilt,
            rail_12v,
        }
    }

    /// Tick at the current time, then every step up to and including `end`.
    fn run_until(&mut self, end: u32) {
        while self.now <= end {
            self.monitor.tick(Millis(self.now), &mut self.sink);
            self.now += STEP_MS;
        }
    }

    fn severity(&self) -> Severity {
        self.monitor.state().alerts.severity
    }

    fn tone(&self) -> &MockTone {
        self.monitor.buzzer().output()
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn startup_registers_every_sensor_and_chirps() {
    let rig = Rig::with_5v_rail(false);

    assert_eq!(rig.monitor.state().mode, SystemMode::Preheat);
    assert_eq!(rig.monitor.active_sensor_count(), 6);
    assert!(!rig.monitor.state().sensors.rail_5v);
    assert!(rig.monitor.state().sensors.co);
    assert!(rig.monitor.state().sensors.buzzer);

    assert_eq!(
        rig.sink
            .count(|e| matches!(e, MonitorEvent::SensorRegistered { .. })),
        7
    );
    assert!(rig.sink.events.contains(&MonitorEvent::Started {
        active_sensors: 6,
        registered: 7
    }));
    assert_eq!(
        rig.tone().calls,
        vec![ToneCall::Start {
            duration_ms: Some(100),
            at: 0
        }]
    );
}

#[test]
fn ninth_sensor_is_rejected() {
    let mut monitor = Monitor::new(MockTone::new());
    let mut sink = RecordingSink::new();
    for _ in 0..8 {
        monitor
            .register(
                Box::new(OutdoorSensor::new(MockThermometer {
                    present: true,
                    celsius: shared(1.0),
                })),
                &mut sink,
            )
            .unwrap();
    }
    let err = monitor
        .register(
            Box::new(OutdoorSensor::new(MockThermometer {
                present: true,
                celsius: shared(1.0),
            })),
            &mut sink,
        )
        .unwrap_err();
    assert_eq!(err, Error::Init("sensor table full"));
    assert_eq!(
        sink.count(|e| matches!(e, MonitorEvent::SensorRegistered { .. })),
        8
    );
}

// ── Preheat ───────────────────────────────────────────────────

#[test]
fn preheat_completes_when_both_gas_sensors_are_warm() {
    let mut rig = Rig::new();

    rig.run_until(90_000);
    assert_eq!(rig.monitor.state().mode, SystemMode::Preheat);
    assert!(rig.monitor.state().safety.gas_preheated);
    assert!(!rig.monitor.state().safety.co_preheated);
    assert_eq!(rig.monitor.preheat_remaining(Millis(90_000)), 90);
    assert_eq!(rig.monitor.preheat_percent(Millis(90_000)), 50);

    rig.run_until(180_000);
    assert_eq!(rig.monitor.state().mode, SystemMode::Normal);
    assert_eq!(rig.monitor.preheat_percent(Millis(180_000)), 100);
    assert_eq!(
        rig.sink.count(|e| *e == MonitorEvent::PreheatComplete),
        1
    );
    assert!(rig.sink.events.contains(&MonitorEvent::ModeChanged {
        from: SystemMode::Preheat,
        to: SystemMode::Normal
    }));
}

#[test]
fn preheat_completion_reported_while_in_alert_mode() {
    let mut rig = Rig::with_5v_rail(false);
    rig.rail_12v.set(Ok(rail(10.2, 1.0)));

    rig.run_until(0);
    assert_eq!(rig.monitor.state().mode, SystemMode::Alert);

    rig.run_until(200_000);
    let state = rig.monitor.state();
    assert_eq!(state.mode, SystemMode::Alert);
    assert!(state.safety.gas_gate_open());
    assert_eq!(
        rig.sink.count(|e| *e == MonitorEvent::PreheatComplete),
        1
    );
    assert!(!rig.sink.events.contains(&MonitorEvent::ModeChanged {
        from: SystemMode::Preheat,
        to: SystemMode::Normal
    }));

    // Battery recovers: Alert -> Normal through the alert engine.
    rig.rail_12v.set(Ok(rail(12.8, 1.0)));
    rig.run_until(204_000);
    assert_eq!(rig.monitor.state().mode, SystemMode::Normal);
}

#[test]
fn missing_co_sensor_ends_preheat_but_keeps_gas_gated() {
    let gas_raw = shared(Ok(GAS_LPG_INFO_RAW));
    let mut monitor = Monitor::new(MockTone::new());
    let mut sink = RecordingSink::new();
    monitor
        .register(
            Box::new(Mq2Sensor::new(MockAdc {
                raw: gas_raw.clone(),
            })),
            &mut sink,
        )
        .unwrap();
    monitor
        .register(
            Box::new(TiltSensor::new(MockInclinometer {
                present: true,
                attitude: shared(Attitude {
                    roll_deg: 0.0,
                    pitch_deg: 0.0,
                    die_temperature_c: 25.0,
                }),
            })),
            &mut sink,
        )
        .unwrap();
    monitor.begin(Millis(0), &mut sink);

    monitor.tick(Millis(30_000), &mut sink);
    assert_eq!(monitor.state().mode, SystemMode::Preheat);
    assert_eq!(monitor.preheat_remaining(Millis(30_000)), 30);

    monitor.tick(Millis(60_000), &mut sink);
    let state = monitor.state();
    assert_eq!(state.mode, SystemMode::Normal);
    assert_eq!(monitor.preheat_remaining(Millis(60_000)), 0);
    assert_eq!(monitor.preheat_percent(Millis(60_000)), 100);
    assert_eq!(sink.count(|e| *e == MonitorEvent::PreheatComplete), 1);

    // No MQ7 means the gate never opens: LPG stays quiet.
    assert!(!state.sensors.co);
    assert!(!state.safety.gas_gate_open());
    assert!(!state.alerts.has(AlertKind::LpgHigh));

    assert!(monitor.enter_settings(&mut sink));
    assert_eq!(monitor.state().mode, SystemMode::Settings);
}

#[test]
fn no_gas_alerts_before_preheat() {
    let mut rig = Rig::new();
    rig.co_raw.set(Ok(raw_for_co_ppm(1500.0)));
    rig.gas_raw.set(Ok(GAS_LPG_INFO_RAW));

    rig.run_until(170_000);
    let state = rig.monitor.state();
    assert!(!state.safety.co_valid);
    assert!(!state.alerts.has(AlertKind::CoHigh));
    assert!(!state.alerts.has(AlertKind::LpgHigh));
    assert_eq!(rig.severity(), Severity::None);
    assert!(rig.tone().starts() == 1, "only the start-up chirp");
}

// ── Gas alerts ────────────────────────────────────────────────

#[test]
fn co_250_ppm_raises_warning_in_low_phase() {
    let mut rig = Rig::new();
    rig.co_raw.set(Ok(raw_for_co_ppm(250.0)));

    rig.run_until(FIRST_LOW_PHASE_MS - STEP_MS);
    assert_eq!(rig.severity(), Severity::None, "no reading window yet");

    rig.run_until(FIRST_LOW_PHASE_MS);
    let state = rig.monitor.state();
    assert!(state.safety.co_valid);
    assert_eq!(state.alerts.severity_of(AlertKind::CoHigh), Some(Severity::Warning));
    assert_eq!(state.alerts.primary, Some(AlertKind::CoHigh));
    assert!(state.navigation_allowed());
    assert_eq!(state.mode, SystemMode::Normal);
    assert_eq!(
        rig.tone().calls.last(),
        Some(&ToneCall::Start {
            duration_ms: Some(950),
            at: FIRST_LOW_PHASE_MS
        })
    );
}

#[test]
fn co_critical_then_clear_silences_on_next_pass() {
    let mut rig = Rig::new();
    rig.co_raw.set(Ok(raw_for_co_ppm(800.0)));

    rig.run_until(FIRST_LOW_PHASE_MS);
    assert_eq!(rig.severity(), Severity::Critical);
    assert_eq!(rig.monitor.state().mode, SystemMode::Alert);
    assert!(!rig.monitor.state().navigation_allowed());
    assert!(rig.monitor.buzzer().is_on());
    assert_eq!(
        rig.tone().calls.last(),
        Some(&ToneCall::Start {
            duration_ms: None,
            at: FIRST_LOW_PHASE_MS
        })
    );

    // Continuous tone is started once, however long it lasts.
    rig.run_until(FIRST_LOW_PHASE_MS + 1_500);
    assert_eq!(rig.tone().starts(), 2);

    rig.co_raw.set(Ok(CO_CLEAN_RAW));
    rig.run_until(FIRST_LOW_PHASE_MS + 2_000);
    assert_eq!(rig.severity(), Severity::None);
    assert_eq!(rig.tone().calls.last(), Some(&ToneCall::Stop));
    assert!(!rig.monitor.buzzer().is_on());
    assert_eq!(rig.monitor.state().mode, SystemMode::Normal);
    assert!(rig.sink.events.contains(&MonitorEvent::SeverityChanged {
        from: Severity::Critical,
        to: Severity::None,
        primary: None
    }));
}

#[test]
fn high_heater_phase_invalidates_co() {
    let mut rig = Rig::new();
    rig.co_raw.set(Ok(raw_for_co_ppm(250.0)));

    rig.run_until(FIRST_LOW_PHASE_MS);
    assert!(rig.monitor.state().alerts.has(AlertKind::CoHigh));

    // Low phase lasts 90 s; the next poll after that is gated.
    rig.run_until(FIRST_LOW_PHASE_MS + 90_000);
    assert!(!rig.monitor.state().safety.co_valid);
    assert!(!rig.monitor.state().alerts.has(AlertKind::CoHigh));
}

#[test]
fn co_invalid_as_soon_as_high_phase_starts() {
    let mut rig = Rig::new();
    rig.co_raw.set(Ok(raw_for_co_ppm(250.0)));
    rig.run_until(FIRST_LOW_PHASE_MS);

    // Irregular spacing: the last low-phase sample lands 1 s before the
    // heater switches, inside the 2 s sampling interval.
    for t in [326_000, 329_000] {
        rig.monitor.tick(Millis(t), &mut rig.sink);
        assert!(rig.monitor.state().safety.co_valid);
        assert_eq!(rig.severity(), Severity::Warning);
    }

    rig.monitor.tick(Millis(330_000), &mut rig.sink);
    let state = rig.monitor.state();
    assert!(!state.safety.co_valid);
    assert!(!state.alerts.has(AlertKind::CoHigh));
    assert_eq!(rig.severity(), Severity::None);
}

#[test]
fn lpg_needs_both_sensors_warm() {
    let mut rig = Rig::new();
    rig.gas_raw.set(Ok(GAS_LPG_INFO_RAW));

    // MQ2 warm at 60 s, MQ7 still preheating.
    rig.run_until(120_000);
    assert!(rig.monitor.state().safety.lpg_valid);
    assert!(!rig.monitor.state().alerts.has(AlertKind::LpgHigh));

    rig.run_until(182_000);
    assert_eq!(
        rig.monitor.state().alerts.severity_of(AlertKind::LpgHigh),
        Some(Severity::Info)
    );
    assert_eq!(rig.monitor.buzzer().pattern(), BuzzerPattern::Silent);
}

// ── Power / environment / level ───────────────────────────────

#[test]
fn battery_danger_and_missing_rail_ignored() {
    let mut rig = Rig::with_5v_rail(false);
    rig.rail_12v.set(Ok(rail(10.2, 1.0)));

    rig.run_until(2_000);
    let state = rig.monitor.state();
    assert_eq!(
        state.alerts.severity_of(AlertKind::Voltage12vLow),
        Some(Severity::Danger)
    );
    assert!(!state.power.rail_5v_valid);
    assert!(!state.alerts.has(AlertKind::Voltage5vLow));
    assert_eq!(state.mode, SystemMode::Alert);

    // Danger pulses fast: 150 ms tones, never closer than a full period.
    let starts: Vec<_> = rig
        .tone()
        .calls
        .iter()
        .filter_map(|c| match c {
            ToneCall::Start {
                duration_ms: Some(150),
                at,
            } => Some(*at),
            _ => None,
        })
        .collect();
    assert!(starts.len() >= 2);
    assert!(starts.windows(2).all(|w| w[1] - w[0] >= 400));
}

#[test]
fn transient_rail_failure_keeps_last_value() {
    let mut rig = Rig::new();
    rig.run_until(0);
    assert!(rig.monitor.state().power.rail_12v_valid);

    rig.rail_12v.set(Err(SensorError::NotResponding));
    rig.run_until(4_000);
    let power = rig.monitor.state().power;
    assert!(power.rail_12v_valid);
    assert!((power.voltage_12v - 12.8).abs() < 1e-6);
    assert_eq!(power.rail_12v_at, Millis(0));
}

#[test]
fn overcurrent_and_total_power() {
    let mut rig = Rig::new();
    rig.rail_12v.set(Ok(rail(12.6, 21.0)));
    rig.run_until(0);

    let state = rig.monitor.state();
    assert_eq!(
        state.alerts.severity_of(AlertKind::Current12vHigh),
        Some(Severity::Warning)
    );
    let expected = 12.6 * 21.0 + 5.05 * 0.5;
    assert!((state.power.power_total - expected).abs() < 1e-3);
}

#[test]
fn tilt_and_climate_alerts_outside_preheat() {
    let mut rig = Rig::new();
    rig.tilt.set(Attitude {
        roll_deg: 6.0,
        pitch_deg: 2.0,
        die_temperature_c: 25.0,
    });
    rig.climate.set(ClimateMeasurement {
        temperature_c: -2.0,
        humidity_percent: 85.0,
        pressure_hpa: 1013.0,
    });

    rig.run_until(0);
    let state = rig.monitor.state();
    assert_eq!(state.mode, SystemMode::Preheat);
    assert_eq!(state.alerts.severity_of(AlertKind::TiltHigh), Some(Severity::Warning));
    assert_eq!(state.alerts.severity_of(AlertKind::TempLow), Some(Severity::Warning));
    assert_eq!(state.alerts.severity_of(AlertKind::HumidityHigh), Some(Severity::Info));
    assert!(state.environment.dew_point_valid);
    assert!(state.level.calibrated);
    assert!(state.environment.temp_exterior_valid);
}

// ── Display-layer requests ────────────────────────────────────

#[test]
fn settings_only_from_normal() {
    let mut rig = Rig::new();
    assert!(!rig.monitor.enter_settings(&mut rig.sink));

    rig.run_until(180_000);
    assert!(rig.monitor.enter_settings(&mut rig.sink));
    assert_eq!(rig.monitor.state().mode, SystemMode::Settings);
    assert!(rig.monitor.leave_settings(&mut rig.sink));
    assert_eq!(rig.monitor.state().mode, SystemMode::Normal);
}

#[test]
fn heater_phase_visible_through_driver() {
    let mut s = Mq7Sensor::new(MockAdc {
        raw: shared(Ok(CO_CLEAN_RAW)),
    });
    s.begin(Millis(0));
    assert_eq!(s.phase(), HeatingPhase::Preheating);
    assert_eq!(s.preheat_remaining_secs(Millis(60_000)), 120);
}
