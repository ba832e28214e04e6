//! Controller link bridge
//!
//! The handheld scans its pad as a 2×4 matrix: it pulls one of two select
//! strobes low (P14 for the D-pad, P15 for the action buttons) and reads
//! four shared lines (P10..P13), active low.
//!
//! | line | P14 low (D-pad) | P15 low (buttons) |
//! |------|-----------------|-------------------|
//! | P10  | Right           | A                 |
//! | P11  | Left            | B                 |
//! | P12  | Up              | Select            |
//! | P13  | Down            | Start             |
//!
//! In sniff mode the bridge only listens to a real pad. In emulation mode
//! it drives the four lines itself from the button vector.

use lcdbridge_hal::gpio::{InputPin, OutputPin};

use super::buttons::{Button, ButtonStates};

/// Which half of the matrix a select strobe addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    /// P14
    Dpad,
    /// P15
    Buttons,
}

impl Row {
    /// Buttons carried on lines P10..P13 for this row
    pub const fn buttons(self) -> [Button; 4] {
        match self {
            Row::Dpad => [Button::Right, Button::Left, Button::Up, Button::Down],
            Row::Buttons => [Button::A, Button::B, Button::Select, Button::Start],
        }
    }
}

/// Passive listener on a physical pad
pub struct LinkSniffer<I> {
    lines: [I; 4],
}

impl<I: InputPin> LinkSniffer<I> {
    /// `lines` in P10..P13 order
    pub fn new(lines: [I; 4]) -> Self {
        Self { lines }
    }

    /// Sample the four lines into `row`'s buttons
    pub fn on_select_falling(&self, row: Row, states: &ButtonStates) {
        for (line, button) in self.lines.iter().zip(row.buttons()) {
            states.set(button, line.is_low());
        }
    }
}

/// Synthesized pad
pub struct LinkEmulator<O> {
    lines: [O; 4],
}

impl<O: OutputPin> LinkEmulator<O> {
    /// `lines` in P10..P13 order; all start released
    pub fn new(lines: [O; 4]) -> Self {
        let mut link = Self { lines };
        link.release();
        link
    }

    /// Drive all four lines high (nothing pressed)
    pub fn release(&mut self) {
        for line in &mut self.lines {
            line.set_high();
        }
    }

    /// Present `row`'s buttons to the handheld
    ///
    /// While the menu is open the lines stay released. A, B, Select and
    /// Start held together would reset the game, so that combination is
    /// dropped and the four buttons are cleared. Returns true when the
    /// combination was dropped.
    pub fn on_select_falling(&mut self, row: Row, states: &ButtonStates, menu_open: bool) -> bool {
        if menu_open {
            self.release();
            return false;
        }

        let buttons = row.buttons();
        if row == Row::Buttons && buttons.iter().all(|&b| states.is_pressed(b)) {
            for b in buttons {
                states.set(b, false);
            }
            self.release();
            return true;
        }

        for (line, button) in self.lines.iter_mut().zip(buttons) {
            line.set_level(!states.is_pressed(button));
        }
        false
    }

    /// End of a read cycle (P15 rising)
    pub fn on_buttons_rising(&mut self) {
        self.release();
    }

    /// Current line levels, P10..P13
    pub fn levels(&self) -> [bool; 4] {
        [
            self.lines[0].is_set_high(),
            self.lines[1].is_set_high(),
            self.lines[2].is_set_high(),
            self.lines[3].is_set_high(),
        ]
    }
}
