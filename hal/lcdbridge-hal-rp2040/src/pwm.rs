//! PWM channel B of one slice

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use lcdbridge_hal::pwm::PwmChannel;

/// Channel B output with a full 16-bit period
pub struct RpPwmB<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> RpPwmB<'d> {
    /// Take a slice configured with `Pwm::new_output_b`; starts at 0% duty
    pub fn new(mut pwm: Pwm<'d>) -> Self {
        let mut config = PwmConfig::default();
        config.top = Self::MAX_DUTY;
        config.compare_b = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl PwmChannel for RpPwmB<'_> {
    fn set_duty(&mut self, duty: u16) {
        self.config.compare_b = duty;
        self.pwm.set_config(&self.config);
    }
}
