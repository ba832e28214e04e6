//! Device configuration loading
//!
//! `device.toml` is embedded at build time (and checked by build.rs) and
//! parsed at boot by a small no_std parser.

pub mod toml;

pub use toml::{parse_config, ParseError};

use defmt::*;
use lcdbridge_core::config::DeviceConfig;

/// Configuration embedded in the firmware image
pub const DEVICE_TOML: &str = include_str!("../../device.toml");

/// Parse and validate the embedded configuration
///
/// Any parse or validation failure logs the cause and falls back to the
/// built-in defaults so the display still comes up.
pub fn load() -> DeviceConfig {
    let config = match parse_config(DEVICE_TOML) {
        Ok(config) => config,
        Err(e) => {
            error!("device.toml parse error: {:?}, using defaults", e);
            return DeviceConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("device.toml rejected: {:?}, using defaults", e);
        return DeviceConfig::default();
    }

    log_config_summary(&config);
    config
}

fn log_config_summary(config: &DeviceConfig) {
    info!("Configuration loaded");
    debug!(
        "  panel {}x{} at {}x scale",
        config.video.output_width, config.video.output_height, config.video.scale
    );
    debug!(
        "  scheme {}, control {}",
        config.palette.scheme, config.palette.control
    );
    debug!("  link {:?}, touch {}", config.link.mode, config.touch.enabled);
    debug!("  backlight {}", config.backlight.level);
}
