//! RP2040-specific HAL for the display bridge
//!
//! Implements the `lcdbridge-hal` traits on `embassy-rp`:
//!
//! - GPIO wrappers for the capture bus and the controller link
//! - Backlight PWM channel
//! - PIO + DMA parallel RGB scan-out (the scanline sink)

#![no_std]

pub mod dpi;
pub mod gpio;
pub mod pwm;
pub mod scanout;

pub use dpi::DpiTiming;
pub use gpio::{RpInput, RpOutput};
pub use pwm::RpPwmB;
pub use scanout::{DpiPins, DpiScanout, ScanoutError};
