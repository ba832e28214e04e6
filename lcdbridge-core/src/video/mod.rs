//! Video path: capture, palettes and scanline composition
//!
//! The handheld's 160×144 landscape picture is stored rotated into a
//! 144×160 portrait framebuffer so that one framebuffer row feeds one
//! output scanline of the portrait-mounted panel.

pub mod capture;
pub mod color;
pub mod compositor;
pub mod framebuffer;
pub mod palette;

pub use capture::{capture_frame, rotate_index, SourceBus, SourcePins};
pub use color::{quantize, BasicColor, PixelFormat, Rgb888};
pub use compositor::{BorderStyle, Compositor, FrameError, Layout};
pub use framebuffer::{FrameBuffer, FrameStore};
pub use palette::{ColorScheme, ControlScheme, PaletteSelect};

/// Source picture width in pixels
pub const SOURCE_WIDTH: usize = 160;

/// Source picture height in lines
pub const SOURCE_HEIGHT: usize = 144;

/// Framebuffer width (one row per output line)
pub const FB_WIDTH: usize = SOURCE_HEIGHT;

/// Framebuffer height
pub const FB_HEIGHT: usize = SOURCE_WIDTH;

/// Total framebuffer cells
pub const FB_LEN: usize = FB_WIDTH * FB_HEIGHT;
