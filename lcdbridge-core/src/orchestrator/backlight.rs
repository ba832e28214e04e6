//! Backlight level to PWM duty

use lcdbridge_hal::pwm::PwmChannel;

use crate::traits::Backlight;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

/// Duty for `level` on a channel with full scale `max_duty`
pub const fn duty_for_level(level: u8, max_duty: u16) -> u16 {
    let level = if level < MIN_LEVEL {
        MIN_LEVEL
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    };
    (max_duty as u32 * level as u32 / MAX_LEVEL as u32) as u16
}

/// Backlight on a PWM channel
pub struct PwmBacklight<P> {
    channel: P,
}

impl<P: PwmChannel> PwmBacklight<P> {
    pub fn new(channel: P) -> Self {
        Self { channel }
    }
}

impl<P: PwmChannel> Backlight for PwmBacklight<P> {
    fn set_level(&mut self, level: u8) {
        self.channel.set_duty(duty_for_level(level, P::MAX_DUTY));
    }
}
