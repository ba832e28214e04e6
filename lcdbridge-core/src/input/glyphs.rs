//! Virtual gamepad image
//!
//! A 16×12 grid of control palette indices, drawn 10× enlarged in the
//! border next to the game window. Cells belonging to a button are
//! rewritten when that button's pressed state changes.

use core::sync::atomic::{AtomicU8, Ordering};

use super::buttons::Button;

pub const GLYPH_COLUMNS: usize = 16;
pub const GLYPH_ROWS: usize = 12;

/// Screen pixels per glyph cell (in scaled units)
pub const CELL_SIZE: u16 = 10;

/// Control palette indices
const BG: u8 = 0;
const KEY: u8 = 1;
const AB: u8 = 2;
const PRESSED: u8 = 3;

#[rustfmt::skip]
const INITIAL: [u8; GLYPH_COLUMNS * GLYPH_ROWS] = [
    0,1,1,0,0,0,0,1,1,0,0,0,0,1,1,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,1,1,0,0,0,0,0,0,0,0,2,2,0,
    0,0,0,1,1,0,0,0,0,0,0,0,0,2,2,0,
    0,1,1,0,0,1,1,0,0,0,2,2,0,0,0,0,
    0,1,1,0,0,1,1,0,0,0,2,2,0,0,0,0,
    0,0,0,1,1,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,1,1,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
];

const fn at(row: usize, column: usize) -> usize {
    row * GLYPH_COLUMNS + column
}

const A_CELLS: [usize; 4] = [at(4, 13), at(4, 14), at(5, 13), at(5, 14)];
const B_CELLS: [usize; 4] = [at(6, 10), at(6, 11), at(7, 10), at(7, 11)];
const RIGHT_CELLS: [usize; 4] = [at(6, 5), at(6, 6), at(7, 5), at(7, 6)];
const LEFT_CELLS: [usize; 4] = [at(6, 1), at(6, 2), at(7, 1), at(7, 2)];
const UP_CELLS: [usize; 4] = [at(4, 3), at(4, 4), at(5, 3), at(5, 4)];
const DOWN_CELLS: [usize; 4] = [at(8, 3), at(8, 4), at(9, 3), at(9, 4)];
const SELECT_CELLS: [usize; 2] = [at(0, 1), at(0, 2)];
const HOME_CELLS: [usize; 2] = [at(0, 7), at(0, 8)];
const START_CELLS: [usize; 2] = [at(0, 13), at(0, 14)];

/// Cells drawn for `button`
fn cells(button: Button) -> &'static [usize] {
    match button {
        Button::A => &A_CELLS,
        Button::B => &B_CELLS,
        Button::Right => &RIGHT_CELLS,
        Button::Left => &LEFT_CELLS,
        Button::Up => &UP_CELLS,
        Button::Down => &DOWN_CELLS,
        Button::Select => &SELECT_CELLS,
        Button::Home => &HOME_CELLS,
        Button::Start => &START_CELLS,
    }
}

pub struct GlyphMap {
    cells: [AtomicU8; GLYPH_COLUMNS * GLYPH_ROWS],
}

impl GlyphMap {
    pub const fn new() -> Self {
        let mut cells = [const { AtomicU8::new(BG) }; GLYPH_COLUMNS * GLYPH_ROWS];
        let mut i = 0;
        while i < INITIAL.len() {
            cells[i] = AtomicU8::new(INITIAL[i]);
            i += 1;
        }
        Self { cells }
    }

    pub fn cell(&self, index: usize) -> Option<u8> {
        self.cells.get(index).map(|c| c.load(Ordering::Relaxed))
    }

    /// Redraw a button as pressed or idle
    pub fn set_button(&self, button: Button, pressed: bool) {
        let value = match (pressed, button) {
            (true, _) => PRESSED,
            (false, Button::A | Button::B) => AB,
            (false, _) => KEY,
        };
        for &i in cells(button) {
            self.cells[i].store(value, Ordering::Relaxed);
        }
    }

    /// Cell under border position (`line`, `x`), rotated 270°
    ///
    /// `None` when the position lies past the last glyph row.
    #[inline(always)]
    pub fn sample(&self, line: u16, x: u16) -> Option<u8> {
        let band = (line / CELL_SIZE) as usize;
        let rot_y = (x / CELL_SIZE) as usize;
        if band >= GLYPH_COLUMNS || rot_y >= GLYPH_ROWS {
            return None;
        }
        let rot_x = GLYPH_COLUMNS - 1 - band;
        self.cell(rot_x + rot_y * GLYPH_COLUMNS)
    }
}

impl Default for GlyphMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_image() {
        let g = GlyphMap::new();
        assert_eq!(g.cell(at(4, 13)), Some(AB));
        assert_eq!(g.cell(at(0, 7)), Some(KEY));
        assert_eq!(g.cell(at(11, 15)), Some(BG));
        assert_eq!(g.cell(GLYPH_COLUMNS * GLYPH_ROWS), None);
    }

    #[test]
    fn test_press_and_release_restore_idle_color() {
        let g = GlyphMap::new();
        g.set_button(Button::B, true);
        assert_eq!(g.cell(at(7, 11)), Some(PRESSED));
        g.set_button(Button::B, false);
        assert_eq!(g.cell(at(7, 11)), Some(AB));

        g.set_button(Button::Down, true);
        assert_eq!(g.cell(at(9, 4)), Some(PRESSED));
        g.set_button(Button::Down, false);
        assert_eq!(g.cell(at(9, 4)), Some(KEY));
    }

    #[test]
    fn test_every_button_redraws_its_own_cells() {
        let buttons = [
            (Button::A, at(4, 13), AB),
            (Button::B, at(6, 10), AB),
            (Button::Right, at(7, 6), KEY),
            (Button::Left, at(6, 1), KEY),
            (Button::Up, at(5, 4), KEY),
            (Button::Down, at(8, 3), KEY),
            (Button::Select, at(0, 2), KEY),
            (Button::Home, at(0, 7), KEY),
            (Button::Start, at(0, 14), KEY),
        ];
        for (button, index, idle) in buttons {
            let g = GlyphMap::new();
            assert_eq!(g.cell(index), Some(idle));
            g.set_button(button, true);
            assert_eq!(g.cell(index), Some(PRESSED));
            // Neighbouring buttons stay untouched
            let pressed = (0..GLYPH_COLUMNS * GLYPH_ROWS)
                .filter(|&i| g.cell(i) == Some(PRESSED))
                .count();
            assert_eq!(pressed, cells(button).len());
            g.set_button(button, false);
            assert_eq!(g.cell(index), Some(idle));
        }
    }

    #[test]
    fn test_sample_rotation() {
        let g = GlyphMap::new();
        // Lines 0..10 read glyph column 15, always background
        assert_eq!(g.sample(0, 15), Some(BG));
        // Lines 20..30 read column 13; x 40..50 reads row 4 (A button)
        assert_eq!(g.sample(25, 45), Some(AB));
        // Past the last row
        assert_eq!(g.sample(25, 120), None);
        // Past the last column band
        assert_eq!(g.sample(160, 5), None);
    }
}
