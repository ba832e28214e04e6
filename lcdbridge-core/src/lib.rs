//! Board-agnostic core logic for the display bridge
//!
//! This crate contains everything between the pins and the panel that does
//! not depend on a specific chip:
//!
//! - Video capture of the handheld's LCD bus into an indexed framebuffer
//! - Scanline composition (game window, menu overlay, border) into the
//!   run-length token stream consumed by the scan-out engine
//! - Controller link bridging (sniff or emulate)
//! - Touch point tracking and the virtual gamepad
//! - Menu command processing and the shared state both cores see
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod geometry;
pub mod input;
pub mod orchestrator;
pub mod traits;
pub mod video;
