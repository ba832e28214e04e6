//! Logical button state
//!
//! [`ButtonStates`] is written from the link and touch paths and read by
//! the command processor. Edges are derived by comparing two
//! [`ButtonSnapshot`]s; the command processor owns the previous one.

use core::sync::atomic::{AtomicBool, Ordering};

/// Logical buttons, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    A = 0,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    /// Menu button, only present on the virtual gamepad
    Home,
}

impl Button {
    pub const COUNT: usize = 9;

    pub const ALL: [Button; Self::COUNT] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Home,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Pressed flags as seen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSnapshot {
    pressed: [bool; Button::COUNT],
}

impl ButtonSnapshot {
    pub const fn released() -> Self {
        Self {
            pressed: [false; Button::COUNT],
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.pressed[button.index()] = pressed;
    }

    /// Released now, pressed in `previous`
    pub fn was_released(&self, previous: &ButtonSnapshot, button: Button) -> bool {
        !self.is_pressed(button) && previous.is_pressed(button)
    }
}

/// Shared button vector
pub struct ButtonStates {
    pressed: [AtomicBool; Button::COUNT],
}

impl ButtonStates {
    /// All buttons released
    pub const fn new() -> Self {
        Self {
            pressed: [const { AtomicBool::new(false) }; Button::COUNT],
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()].load(Ordering::Relaxed)
    }

    pub fn set(&self, button: Button, pressed: bool) {
        self.pressed[button.index()].store(pressed, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ButtonSnapshot {
        let mut snap = ButtonSnapshot::released();
        for button in Button::ALL {
            snap.set(button, self.is_pressed(button));
        }
        snap
    }
}

impl Default for ButtonStates {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pressed: bool) -> ButtonSnapshot {
        let mut s = ButtonSnapshot::released();
        s.set(Button::Start, pressed);
        s
    }

    #[test]
    fn test_was_released_truth_table() {
        // (current, previous) -> released edge
        assert!(!snap(false).was_released(&snap(false), Button::Start));
        assert!(!snap(true).was_released(&snap(false), Button::Start));
        assert!(!snap(true).was_released(&snap(true), Button::Start));
        assert!(snap(false).was_released(&snap(true), Button::Start));
    }

    #[test]
    fn test_snapshot_reflects_states() {
        let states = ButtonStates::new();
        states.set(Button::Home, true);
        states.set(Button::B, true);
        states.set(Button::B, false);

        let s = states.snapshot();
        assert!(s.is_pressed(Button::Home));
        assert!(!s.is_pressed(Button::B));
        assert_ne!(s, ButtonSnapshot::released());
    }

    #[test]
    fn test_button_order() {
        for (i, b) in Button::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }
}
