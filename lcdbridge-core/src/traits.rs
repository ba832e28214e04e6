//! Interfaces to the collaborators around the core
//!
//! The menu surface, its text rendering and the backlight driver live
//! outside this crate; the compositor and the command processor only see
//! these traits.

/// Read side of the menu overlay plane
///
/// The plane is stored in reading orientation, `width()` pixels per row,
/// each byte an already packed sink color.
pub trait OverlaySource {
    /// Whether the overlay is currently shown
    fn is_enabled(&self) -> bool;

    /// Plane width in pixels
    fn width(&self) -> u16;

    /// Plane height in pixels
    fn height(&self) -> u16;

    /// Packed color at `index` (row-major), `None` when out of range
    fn pixel(&self, index: usize) -> Option<u16>;
}

/// Menu navigation, as driven by the command processor
pub trait MenuControl {
    fn is_open(&self) -> bool;

    /// Show or hide the menu
    fn toggle(&mut self);

    /// Move the highlight by `direction` lines, wrapping
    fn change_line(&mut self, direction: i8);

    fn active_line(&self) -> u8;

    fn set_line_text(&mut self, line: u8, text: &str);

    /// Redraw after text changes
    fn refresh(&mut self);
}

/// Panel backlight
pub trait Backlight {
    /// Set brightness, 1 (dimmest) to 10 (full)
    fn set_level(&mut self, level: u8);
}
