//! Fuzz target: MOS divider front-end and gas curves
//!
//! Feeds arbitrary ADC counts and calibration resistances through
//! `MosFrontEnd::convert` and the MQ7 / MQ2 curves.
//!
//! Invariants checked:
//! - No panics for any input
//! - A successful conversion never yields a negative or NaN resistance
//! - MQ7 ppm is always within 0..=2000
//! - MQ2 ppm is never negative or NaN
//!
//! cargo fuzz run fuzz_mos_front_end

#![no_main]

use libfuzzer_sys::fuzz_target;
use vanmon::sensors::mos::MosFrontEnd;
use vanmon::sensors::{mq2, mq7};

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let raw = u16::from_le_bytes([data[0], data[1]]);
    let r0 = f32::from_le_bytes([data[2], data[3], data[4], data[5]]);

    let mut fe = MosFrontEnd::new(10.0, 10.0);
    fe.set_r0_kohm(r0);

    if let Ok(sample) = fe.convert(raw) {
        assert!(sample.rs_kohm >= 0.0, "rs={}", sample.rs_kohm);
        assert!(!sample.ratio.is_nan());

        let co = mq7::ratio_to_ppm(sample.ratio);
        assert!((0.0..=2000.0).contains(&co), "co={co}");

        let lpg = mq2::ratio_to_lpg_ppm(sample.ratio);
        let smoke = mq2::ratio_to_smoke_ppm(sample.ratio);
        assert!(lpg >= 0.0 && smoke >= 0.0, "lpg={lpg} smoke={smoke}");
    }
});
