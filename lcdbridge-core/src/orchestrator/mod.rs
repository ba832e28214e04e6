//! Cross-context state and the menu command loop
//!
//! Two contexts share the state in [`SharedState`]:
//!
//! ```text
//!   core 1 (render)                       core 0 (input)
//!  ┌─────────────────────┐              ┌──────────────────────────┐
//!  │ VSYNC ↑ → capture   │── frame ────▶│                          │
//!  │ line loop → sink    │◀─ palettes ──│ command tick (menu)      │
//!  │                     │◀─ glyphs ────│ touch poll / link edges  │
//!  └─────────────────────┘              └──────────────────────────┘
//! ```
//!
//! Everything in it is made of single-word relaxed atomics. Readers may see
//! a frame that is part old and part new, or a button mid-update; the
//! next frame or tick corrects both.

pub mod backlight;
pub mod command;

pub use backlight::{duty_for_level, PwmBacklight};
pub use command::{CommandOutcome, CommandProcessor, MenuItem, ToggleGesture};

use crate::input::{ButtonStates, GlyphMap};
use crate::video::{FrameBuffer, PaletteSelect};

/// State shared between the render and input contexts
pub struct SharedState {
    pub frame: FrameBuffer,
    pub buttons: ButtonStates,
    pub palettes: PaletteSelect,
    pub glyphs: GlyphMap,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            buttons: ButtonStates::new(),
            palettes: PaletteSelect::new(0, 0),
            glyphs: GlyphMap::new(),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
