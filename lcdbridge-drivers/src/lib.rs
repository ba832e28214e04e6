//! Peripheral drivers
//!
//! Concrete implementations for the external parts on the bridge board:
//!
//! - Touch controllers (GT911 over async I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod touch;
