//! `lcdbridge-hal` pin traits on embassy-rp GPIO

use embassy_rp::gpio::{Input, Output};
use lcdbridge_hal::gpio::{InputPin, OutputPin};

/// Input pin read through the SIO register
pub struct RpInput<'d>(pub Input<'d>);

impl InputPin for RpInput<'_> {
    #[inline(always)]
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Push-pull output
pub struct RpOutput<'d>(pub Output<'d>);

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
