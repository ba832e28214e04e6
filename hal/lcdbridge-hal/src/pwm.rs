//! PWM output abstraction

/// A single PWM output channel with a 16-bit duty range
pub trait PwmChannel {
    /// Maximum duty value (100% on)
    const MAX_DUTY: u16 = u16::MAX;

    /// Set the duty cycle, `0..=MAX_DUTY`
    fn set_duty(&mut self, duty: u16);
}
