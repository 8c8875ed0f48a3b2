//! Piezo buzzer on a PWM channel.
//!
//! The board layer configures the channel's timer at
//! [`BUZZER_FREQUENCY_HZ`](crate::config::BUZZER_FREQUENCY_HZ); this
//! adapter only gates it with a 50 % duty cycle.  Bounded tones are ended
//! by [`ToneOutput::service`], so nothing here blocks.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::warn;

use crate::app::ports::ToneOutput;
use crate::time::Millis;

const SOUNDING_DUTY_PERCENT: u8 = 50;

pub struct PwmBuzzer<P> {
    pwm: P,
    sounding: bool,
    /// Start and length of a bounded tone.
    bounded: Option<(Millis, u32)>,
}

impl<P: SetDutyCycle> PwmBuzzer<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            sounding: false,
            bounded: None,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    pub fn release(self) -> P {
        self.pwm
    }

    fn off(&mut self) {
        if let Err(e) = self.pwm.set_duty_cycle_fully_off() {
            warn!("Buzzer PWM off failed: {:?}", e.kind());
        }
        self.sounding = false;
        self.bounded = None;
    }
}

impl<P: SetDutyCycle> ToneOutput for PwmBuzzer<P> {
    fn start_tone(&mut self, _frequency_hz: u16, duration_ms: Option<u32>, now: Millis) {
        match self.pwm.set_duty_cycle_percent(SOUNDING_DUTY_PERCENT) {
            Ok(()) => {
                self.sounding = true;
                self.bounded = duration_ms.map(|d| (now, d));
            }
            Err(e) => warn!("Buzzer PWM on failed: {:?}", e.kind()),
        }
    }

    fn stop_tone(&mut self) {
        self.off();
    }

    fn service(&mut self, now: Millis) {
        if let Some((start, len)) = self.bounded {
            if now.has_elapsed(start, len) {
                self.off();
            }
        }
    }
}
