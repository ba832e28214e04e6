//! GPIO pin abstractions
//!
//! The capture loop and the link bridge read and drive pins from
//! interrupt-like contexts, so these traits are infallible and take no
//! error path: a pin read is a single register access on every target.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Spin until `pin` reads low after having read high.
///
/// Returns on the first falling edge observed after the call; if the pin is
/// already high the wait starts at the next transition. There is no timeout.
#[inline(always)]
pub fn spin_until_falling<P: InputPin + ?Sized>(pin: &P) {
    while pin.is_low() {}
    while pin.is_high() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Pin that replays a fixed level sequence, one level per read
    struct ScriptedPin<'a> {
        levels: &'a [bool],
        pos: Cell<usize>,
    }

    impl InputPin for ScriptedPin<'_> {
        fn is_high(&self) -> bool {
            let i = self.pos.get();
            self.pos.set(i + 1);
            self.levels[i.min(self.levels.len() - 1)]
        }
    }

    struct LatchPin {
        high: bool,
    }

    impl OutputPin for LatchPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_spin_until_falling_skips_leading_low() {
        let pin = ScriptedPin {
            levels: &[false, false, true, true, false, true],
            pos: Cell::new(0),
        };
        spin_until_falling(&pin);
        // Reads: low, low, high (exit first loop), high, low (exit second loop)
        assert_eq!(pin.pos.get(), 5);
    }

    #[test]
    fn test_set_level() {
        let mut pin = LatchPin { high: false };
        pin.set_level(true);
        assert!(pin.is_set_high());
        pin.set_level(false);
        assert!(!pin.is_set_high());
    }
}
