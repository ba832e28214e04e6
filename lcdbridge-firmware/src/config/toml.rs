//! Minimal TOML parser for the device configuration
//!
//! Handles only the subset `device.toml` uses:
//! - `[section]` headers
//! - `key = value` pairs with string, integer (decimal or `0x` hex),
//!   boolean and flat integer-array values
//! - `#` comments, including trailing ones
//!
//! Unknown sections and keys are errors so typos do not pass silently.

use alloc::vec::Vec;

use lcdbridge_core::config::{DeviceConfig, LinkMode};
use lcdbridge_core::video::palette::{control_index, scheme_index};
use lcdbridge_core::video::{BasicColor, PixelFormat};

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value of the wrong type or out of range for its field
    InvalidValue,
    /// Line that is neither a header nor `key = value`
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Video,
    Palette,
    Link,
    Touch,
    Backlight,
    Command,
}

/// Parse TOML text into a [`DeviceConfig`]
///
/// Fields that are not mentioned keep their defaults. The result is not
/// validated; call [`DeviceConfig::validate`] afterwards.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Malformed)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "video" => Ok(Section::Video),
        "palette" => Ok(Section::Palette),
        "link" => Ok(Section::Link),
        "touch" => Ok(Section::Touch),
        "backlight" => Ok(Section::Backlight),
        "command" => Ok(Section::Command),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        Ok(value)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer
fn parse_int(value: &str) -> Result<u32, ParseError> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| ParseError::InvalidValue)
}

fn parse_u8(value: &str) -> Result<u8, ParseError> {
    u8::try_from(parse_int(value)?).map_err(|_| ParseError::InvalidValue)
}

fn parse_u16(value: &str) -> Result<u16, ParseError> {
    u16::try_from(parse_int(value)?).map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse `[r, g, b]` bit positions
fn parse_pixel_format(value: &str) -> Result<PixelFormat, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let shifts: Vec<u8> = inner
        .split(',')
        .map(|s| parse_u8(s.trim()))
        .collect::<Result<_, _>>()?;

    match shifts.as_slice() {
        &[r_shift, g_shift, b_shift] => Ok(PixelFormat {
            r_shift,
            g_shift,
            b_shift,
        }),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Palette by table index or by name
fn parse_palette(value: &str, lookup: fn(&str) -> Option<u8>) -> Result<u8, ParseError> {
    if value.starts_with('"') {
        lookup(parse_string(value)?).ok_or(ParseError::InvalidValue)
    } else {
        parse_u8(value)
    }
}

fn parse_link_mode(value: &str) -> Result<LinkMode, ParseError> {
    match parse_string(value)? {
        "emulate" => Ok(LinkMode::Emulate),
        "sniff" => Ok(LinkMode::Sniff),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Video, "output_width") => config.video.output_width = parse_u16(value)?,
        (Section::Video, "output_height") => config.video.output_height = parse_u16(value)?,
        (Section::Video, "scale") => config.video.scale = parse_u8(value)?,
        (Section::Video, "pixel_format") => config.video.pixel_format = parse_pixel_format(value)?,

        (Section::Palette, "scheme") => config.palette.scheme = parse_palette(value, scheme_index)?,
        (Section::Palette, "control") => {
            config.palette.control = parse_palette(value, control_index)?
        }
        (Section::Palette, "background") => {
            let color = BasicColor::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)?;
            config.palette.background = Some(color);
        }

        (Section::Link, "mode") => config.link.mode = parse_link_mode(value)?,

        (Section::Touch, "enabled") => config.touch.enabled = parse_bool(value)?,
        (Section::Touch, "address") => config.touch.address = parse_u8(value)?,
        (Section::Touch, "poll_ms") => config.touch.poll_ms = parse_u16(value)?,

        (Section::Backlight, "level") => config.backlight.level = parse_u8(value)?,

        (Section::Command, "tick_ms") => config.command.tick_ms = parse_u16(value)?,

        _ => return Err(ParseError::UnknownKey),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("scale = 2"), Some(("scale", "2")));
        assert_eq!(
            parse_key_value("mode = \"sniff\"  # read only"),
            Some(("mode", "\"sniff\""))
        );
        assert_eq!(parse_key_value("scale ="), None);
    }

    #[test]
    fn test_parse_int_hex() {
        assert_eq!(parse_int("0x5D"), Ok(0x5D));
        assert_eq!(parse_int("93"), Ok(93));
        assert_eq!(parse_u8("300"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_pixel_format() {
        let format = parse_pixel_format("[4, 2, 0]").unwrap();
        assert_eq!(format.r_shift, 4);
        assert_eq!(format.b_shift, 0);
        assert!(parse_pixel_format("[0, 2]").is_err());
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
[video]
output_width = 640
output_height = 480
scale = 2

[palette]
scheme = 5
control = 1
background = "black"

[link]
mode = "sniff"

[touch]
enabled = false
address = 0x14

[backlight]
level = 7
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.video.output_width, 640);
        assert_eq!(config.video.scale, 2);
        assert_eq!(config.palette.scheme, 5);
        assert_eq!(config.palette.background, Some(BasicColor::Black));
        assert_eq!(config.link.mode, LinkMode::Sniff);
        assert!(!config.touch.enabled);
        assert_eq!(config.touch.address, 0x14);
        assert_eq!(config.backlight.level, 7);
        assert_eq!(config.command.tick_ms, 50);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert_eq!(
            parse_config("[video]\nscale_x = 2\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(parse_config("[display]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("scale = 2\n"), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_embedded_config_is_valid() {
        let config = parse_config(super::super::DEVICE_TOML).unwrap();
        assert_eq!(config.validate(), Ok(()));
    }
}
