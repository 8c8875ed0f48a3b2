//! Plausibility predicates applied to every value before it is trusted.
//!
//! These are the "universal" checks: a reading the sensor itself reports
//! as valid is still rejected here if it is NaN or physically absurd.

pub fn is_valid_temperature(celsius: f32) -> bool {
    !celsius.is_nan() && celsius > -50.0 && celsius < 100.0
}

pub fn is_valid_humidity(percent: f32) -> bool {
    !percent.is_nan() && (0.0..=100.0).contains(&percent)
}

pub fn is_valid_pressure(hpa: f32) -> bool {
    !hpa.is_nan() && hpa > 900.0 && hpa < 1100.0
}

pub fn is_valid_voltage(volts: f32) -> bool {
    !volts.is_nan() && volts > 0.0 && volts < 20.0
}

pub fn is_valid_ppm(ppm: f32) -> bool {
    !ppm.is_nan() && (0.0..10_000.0).contains(&ppm)
}

pub fn is_valid_tilt(degrees: f32) -> bool {
    degrees.is_finite() && (0.0..=180.0).contains(&degrees)
}

/// Dew point (°C) by the Magnus approximation.
///
/// Returns `None` when humidity is zero (log undefined) or either input
/// fails its own predicate.
pub fn dew_point(celsius: f32, humidity: f32) -> Option<f32> {
    const A: f32 = 17.27;
    const B: f32 = 237.7;
    if !is_valid_temperature(celsius) || !is_valid_humidity(humidity) || humidity <= 0.0 {
        return None;
    }
    let gamma = (A * celsius) / (B + celsius) + (humidity / 100.0).ln();
    Some((B * gamma) / (A - gamma))
}
