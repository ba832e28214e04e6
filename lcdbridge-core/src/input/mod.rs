//! Controller input: physical link, touch screen and the virtual gamepad

pub mod buttons;
pub mod glyphs;
pub mod link;
pub mod touch;

pub use buttons::{Button, ButtonSnapshot, ButtonStates};
pub use glyphs::GlyphMap;
pub use link::{LinkEmulator, LinkSniffer, Row};
pub use touch::{TouchHandler, TouchTracker, VirtualGamepad};
