//! On-screen menu for the display bridge
//!
//! Two halves:
//!
//! - [`OverlayPlane`]: the shared pixel surface the compositor reads on
//!   every line. Lock-free, one atomic byte per pixel.
//! - [`Osd`]: the menu model owned by the command loop. Keeps the line
//!   texts and the highlighted line, and redraws them into the plane with
//!   `embedded-graphics`.
//!
//! Text cells are 7×8 pixels (a 5×8 font with 2 pixels of spacing), 18
//! characters per line.

#![no_std]
#![deny(unsafe_code)]

pub mod menu;
pub mod plane;

pub use menu::Osd;
pub use plane::{OverlayPlane, PlaneCanvas};

/// Character cell width in pixels
pub const CHAR_WIDTH: usize = 7;

/// Character cell height in pixels
pub const CHAR_HEIGHT: usize = 8;

/// Characters per menu line
pub const CHARS_PER_LINE: usize = 18;

/// Most menu lines a plane can hold
pub const MAX_LINES: usize = 4;

/// Plane width in pixels
pub const PLANE_WIDTH: usize = CHAR_WIDTH * CHARS_PER_LINE;

/// Pixel storage for the tallest plane
pub const MAX_PLANE_LEN: usize = PLANE_WIDTH * CHAR_HEIGHT * MAX_LINES;
