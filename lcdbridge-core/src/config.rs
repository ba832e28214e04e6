//! Device configuration types
//!
//! Board-agnostic settings loaded at boot from the embedded `device.toml`.
//! Every field has a default matching the 800×480 panel at 3x scale with
//! the touch gamepad fitted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::orchestrator::backlight::{MAX_LEVEL, MIN_LEVEL};
use crate::orchestrator::{MenuItem, ToggleGesture};
use crate::video::palette::{COLOR_SCHEMES, CONTROL_SCHEMES};
use crate::video::{BasicColor, BorderStyle, PixelFormat, FB_HEIGHT, FB_WIDTH};
use lcdbridge_protocol::scanline::MAX_LINE_PIXELS;

/// Largest supported scale factor
pub const MAX_SCALE: u8 = 4;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Scale outside 1..=MAX_SCALE
    InvalidScale(u8),
    /// Panel too small for the scaled game window
    OutputTooSmall,
    /// Panel wider than one scan-out line can carry
    OutputTooLarge,
    SchemeOutOfRange(u8),
    ControlOutOfRange(u8),
    BacklightOutOfRange(u8),
    /// A tick or poll period of zero
    ZeroPeriod,
}

/// Output panel and scan-out settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VideoConfig {
    /// Panel width in pixels
    pub output_width: u16,
    /// Panel height in pixels
    pub output_height: u16,
    /// Integer scale applied in both directions
    pub scale: u8,
    pub pixel_format: PixelFormat,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            output_width: 800,
            output_height: 480,
            scale: 3,
            pixel_format: PixelFormat::RGB222,
        }
    }
}

/// Palettes selected at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaletteConfig {
    /// Index into the game palette table
    pub scheme: u8,
    /// Index into the control palette table
    pub control: u8,
    /// Idle line and plain border color; derived from the touch setting
    /// when unset
    pub background: Option<BasicColor>,
}

/// How the controller link is bridged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LinkMode {
    /// Read the physical buttons off the link, never drive it
    Sniff,
    /// Drive the link from the shared button vector
    #[default]
    Emulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    pub mode: LinkMode,
}

/// Touch controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchConfig {
    pub enabled: bool,
    /// 7-bit I2C address
    pub address: u8,
    /// Poll period in milliseconds
    pub poll_ms: u16,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: lcdbridge_protocol::gt911::I2C_ADDRESS,
            poll_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BacklightConfig {
    /// Boot level, 1..=10
    pub level: u8,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self { level: MAX_LEVEL }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommandConfig {
    /// Menu command tick period in milliseconds
    pub tick_ms: u16,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self { tick_ms: 50 }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub video: VideoConfig,
    pub palette: PaletteConfig,
    pub link: LinkConfig,
    pub touch: TouchConfig,
    pub backlight: BacklightConfig,
    pub command: CommandConfig,
}

impl DeviceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check ranges and that the scaled game window fits the panel
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.video.scale;
        if scale == 0 || scale > MAX_SCALE {
            return Err(ConfigError::InvalidScale(scale));
        }
        if (self.video.output_width / scale as u16) < FB_WIDTH as u16
            || (self.video.output_height / scale as u16) < FB_HEIGHT as u16
        {
            return Err(ConfigError::OutputTooSmall);
        }
        // One extra pixel carries the line terminator
        if self.video.output_width as usize + 1 > MAX_LINE_PIXELS {
            return Err(ConfigError::OutputTooLarge);
        }
        if self.palette.scheme as usize >= COLOR_SCHEMES.len() {
            return Err(ConfigError::SchemeOutOfRange(self.palette.scheme));
        }
        if self.palette.control as usize >= CONTROL_SCHEMES.len() {
            return Err(ConfigError::ControlOutOfRange(self.palette.control));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.backlight.level) {
            return Err(ConfigError::BacklightOutOfRange(self.backlight.level));
        }
        if self.command.tick_ms == 0 || (self.touch.enabled && self.touch.poll_ms == 0) {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }

    /// Background color, light grey behind the gamepad and black otherwise
    /// unless set explicitly
    pub fn background_color(&self) -> BasicColor {
        match self.palette.background {
            Some(color) => color,
            None if self.touch.enabled => BasicColor::LightGrey,
            None => BasicColor::Black,
        }
    }

    pub fn border_style(&self) -> BorderStyle {
        if self.touch.enabled {
            BorderStyle::VirtualGamepad
        } else {
            BorderStyle::Plain
        }
    }

    pub fn toggle_gesture(&self) -> ToggleGesture {
        if self.touch.enabled {
            ToggleGesture::HomeRelease
        } else {
            ToggleGesture::SelectStart
        }
    }

    /// Menu lines; the control palette only matters with the gamepad shown
    pub fn menu_items(&self) -> &'static [MenuItem] {
        if self.touch.enabled {
            &MenuItem::WITH_TOUCH
        } else {
            &MenuItem::WITHOUT_TOUCH
        }
    }
}
