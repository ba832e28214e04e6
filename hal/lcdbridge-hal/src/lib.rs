//! lcdbridge Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the bridge logic is written
//! against. Chip-specific HALs implement them; host tests implement them
//! with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lcdbridge-firmware / lcdbridge-core    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lcdbridge-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ lcdbridge-hal-│       │  host mocks   │
//! │    rp2040     │       │  (unit tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O used by the
//!   bit-banged video capture and the controller link
//! - [`pwm::PwmChannel`] - Duty-cycle output (backlight)
//! - [`video::ScanlineSink`] - Consumer of encoded scanlines

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pwm;
pub mod video;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use pwm::PwmChannel;
pub use video::ScanlineSink;
