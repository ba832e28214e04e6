//! Build script for lcdbridge-firmware
//!
//! - Places memory.x on the linker search path
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const BASIC_COLORS: [&str; 9] = [
    "black",
    "blue",
    "white",
    "light_grey",
    "dark_grey",
    "red",
    "green",
    "yellow",
    "purple",
];

fn main() {
    setup_linker();
    validate_config();
}

fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml at build time. Create one in    ║\n\
            ║  the lcdbridge-firmware directory.                               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_video(&config, &mut errors);
    validate_palette(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_touch(&config, &mut errors);
    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

fn validate_video(config: &toml::Value, errors: &mut Vec<String>) {
    let width = int(config, "video", "output_width").unwrap_or(800);
    let height = int(config, "video", "output_height").unwrap_or(480);
    let scale = int(config, "video", "scale").unwrap_or(3);

    if !(1..=4).contains(&scale) {
        errors.push(format!("[video] scale must be 1-4, got {}", scale));
        return;
    }
    // Game window is 144 columns by 160 lines
    if width / scale < 144 || height / scale < 160 {
        errors.push(format!(
            "[video] {}x{} is too small for scale {}",
            width, height, scale
        ));
    }
    if width > 800 {
        errors.push(format!("[video] output_width must be at most 800, got {}", width));
    }

    if let Some(format) = config.get("video").and_then(|v| v.get("pixel_format")) {
        match format.as_array() {
            Some(shifts) if shifts.len() == 3 => {
                for shift in shifts {
                    match shift.as_integer() {
                        Some(s) if (0..=4).contains(&s) => {}
                        _ => errors.push("[video] pixel_format shifts must be 0-4".to_string()),
                    }
                }
            }
            _ => errors.push("[video] pixel_format must be [r, g, b]".to_string()),
        }
    }
}

fn validate_palette(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(palette) = config.get("palette") else {
        return;
    };

    if let Some(scheme) = palette.get("scheme").and_then(|s| s.as_integer()) {
        if !(0..37).contains(&scheme) {
            errors.push(format!("[palette] scheme must be 0-36, got {}", scheme));
        }
    }
    if let Some(control) = palette.get("control").and_then(|c| c.as_integer()) {
        if !(0..3).contains(&control) {
            errors.push(format!("[palette] control must be 0-2, got {}", control));
        }
    }
    if let Some(background) = palette.get("background") {
        match background.as_str() {
            Some(name) if BASIC_COLORS.contains(&name) => {}
            _ => errors.push("[palette] background must be a basic color name".to_string()),
        }
    }
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(mode) = config.get("link").and_then(|l| l.get("mode")) {
        match mode.as_str() {
            Some("emulate") | Some("sniff") => {}
            _ => errors.push("[link] mode must be 'emulate' or 'sniff'".to_string()),
        }
    }
}

fn validate_touch(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(address) = int(config, "touch", "address") {
        if !(0x08..=0x77).contains(&address) {
            errors.push(format!("[touch] address 0x{:02X} is not a 7-bit address", address));
        }
    }
}

fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(level) = int(config, "backlight", "level") {
        if !(1..=10).contains(&level) {
            errors.push(format!("[backlight] level must be 1-10, got {}", level));
        }
    }
    if let Some(0) = int(config, "command", "tick_ms") {
        errors.push("[command] tick_ms must be non-zero".to_string());
    }
    if let Some(0) = int(config, "touch", "poll_ms") {
        errors.push("[touch] poll_ms must be non-zero".to_string());
    }
}
