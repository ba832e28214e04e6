//! Game and control palettes
//!
//! Palettes are immutable tables; the active one is chosen by an index that
//! is swapped in a single atomic store, so a reader always sees a complete
//! 4-color set.

use core::sync::atomic::{AtomicU8, Ordering};

use super::color::Rgb888;

/// Four shades for framebuffer indices 0..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,
    pub colors: [Rgb888; 4],
}

/// Colors for the border and the virtual gamepad
///
/// Indexed by glyph cell value: 0 background, 1 button, 2 A/B button,
/// 3 pressed button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlScheme {
    pub name: &'static str,
    pub colors: [Rgb888; 4],
}

impl ControlScheme {
    pub const fn background(&self) -> Rgb888 {
        self.colors[0]
    }
}

const fn scheme(name: &'static str, colors: [Rgb888; 4]) -> ColorScheme {
    ColorScheme { name, colors }
}

#[rustfmt::skip]
pub const COLOR_SCHEMES: [ColorScheme; 37] = [
    scheme("black_and_white", [0xF7F3F7, 0xB5B2B5, 0x4E4C4E, 0x000000]),
    scheme("inverted",        [0x000000, 0x4E4C4E, 0xB5B2B5, 0xF7F3F7]),
    scheme("dmg",             [0x7B8210, 0x5A7942, 0x39594A, 0x294139]),
    scheme("pocket",          [0xC6CBA5, 0x8C926B, 0x4A5139, 0x181818]),
    scheme("light",           [0x00B284, 0x8C926B, 0x00694A, 0x005139]),
    scheme("sgb_1a",          [0xF7E3C6, 0xD6924A, 0xA52821, 0x311852]),
    scheme("sgb_2a",          [0xEFC39C, 0xBD8A4A, 0x297900, 0x000000]),
    scheme("sgb_3a",          [0xF7CB94, 0x73BABD, 0xF76129, 0x314963]),
    scheme("sgb_4a",          [0xEFA26B, 0x7BA2F7, 0xCE00CE, 0x00007B]),
    scheme("sgb_1b",          [0xD6D3BD, 0xC6AA73, 0xAD5110, 0x000000]),
    scheme("sgb_2b",          [0xF7F3F7, 0xF7E352, 0xF73000, 0x52005A]),
    scheme("sgb_3b",          [0xD6D3BD, 0xDE8221, 0x005100, 0x001010]),
    scheme("sgb_4b",          [0xEFE3EF, 0xE79A63, 0x427939, 0x180808]),
    scheme("sgb_1c",          [0xF7BAF7, 0xE79252, 0x943863, 0x393894]),
    scheme("sgb_2c",          [0xF7F3F7, 0xE78A8C, 0x7B30E7, 0x292894]),
    scheme("sgb_3c",          [0xDEA2C6, 0xF7F37B, 0x00B2F7, 0x21205A]),
    scheme("sgb_4c",          [0xF7DBDE, 0xF7F37B, 0x949ADE, 0x080000]),
    scheme("sgb_1d",          [0xF7F3A5, 0xBD824A, 0xF70000, 0x521800]),
    scheme("sgb_2d",          [0xF7F39C, 0x00F300, 0xF73000, 0x000052]),
    scheme("sgb_3d",          [0xEFF3B5, 0xDEA27B, 0x96AD52, 0x000000]),
    scheme("sgb_4d",          [0xF7F3B5, 0x94C3C6, 0x4A697B, 0x08204A]),
    scheme("sgb_1e",          [0xF7D3AD, 0x7BBA7B, 0x6B8A42, 0x5A3821]),
    scheme("sgb_2e",          [0xF7C384, 0x94AADE, 0x291063, 0x100810]),
    scheme("sgb_3e",          [0xF7F3BD, 0xDEAA6B, 0xAD7921, 0x524973]),
    scheme("sgb_4e",          [0xF7D3A5, 0xDEA27B, 0x7B598C, 0x002031]),
    scheme("sgb_1f",          [0xD6E3F7, 0xDE8A52, 0xA50000, 0x004110]),
    scheme("sgb_2f",          [0xCEF3F7, 0xF79252, 0x9C0000, 0x180000]),
    scheme("sgb_3f",          [0x7B79C6, 0xF769F7, 0xF7CB00, 0x424142]),
    scheme("sgb_4f",          [0xB5CBCE, 0xD682D6, 0x84009C, 0x390000]),
    scheme("sgb_1g",          [0x000052, 0x009AE7, 0x7B7900, 0xF7F35A]),
    scheme("sgb_2g",          [0x6BB239, 0xDE5142, 0xDEB284, 0x001800]),
    scheme("sgb_3g",          [0x63D352, 0xF7F3F7, 0xC63039, 0x390000]),
    scheme("sgb_4g",          [0xADDB18, 0xB5205A, 0x291000, 0x008263]),
    scheme("sgb_1h",          [0xF7E3DE, 0xF7B28C, 0x844100, 0x311800]),
    scheme("sgb_2h",          [0xF7F3F7, 0xB5B2B5, 0x737173, 0x000000]),
    scheme("sgb_3h",          [0xDEF39C, 0x7BC339, 0x4A8A18, 0x081800]),
    scheme("sgb_4h",          [0xF7F3C6, 0xB5BA5A, 0x848A42, 0x425129]),
];

#[rustfmt::skip]
pub const CONTROL_SCHEMES: [ControlScheme; 3] = [
    ControlScheme { name: "default", colors: [0x404040, 0x808080, 0xFF0000, 0xFFFF00] },
    ControlScheme { name: "dark",    colors: [0x000000, 0xFFFFFF, 0xFFFFFF, 0x0000FF] },
    ControlScheme { name: "grey",    colors: [0x808080, 0x404040, 0xFF0000, 0xFFFF00] },
];

/// Find a color scheme index by name
pub fn scheme_index(name: &str) -> Option<u8> {
    COLOR_SCHEMES
        .iter()
        .position(|s| s.name == name)
        .map(|i| i as u8)
}

/// Find a control scheme index by name
pub fn control_index(name: &str) -> Option<u8> {
    CONTROL_SCHEMES
        .iter()
        .position(|s| s.name == name)
        .map(|i| i as u8)
}

fn wrap_step(current: u8, direction: i8, len: usize) -> u8 {
    (current as i16 + direction as i16).rem_euclid(len as i16) as u8
}

/// Active palette selection shared between the render and command contexts
pub struct PaletteSelect {
    scheme: AtomicU8,
    control: AtomicU8,
}

impl PaletteSelect {
    pub const fn new(scheme: u8, control: u8) -> Self {
        Self {
            scheme: AtomicU8::new(scheme),
            control: AtomicU8::new(control),
        }
    }

    pub fn scheme_index(&self) -> u8 {
        self.scheme.load(Ordering::Relaxed)
    }

    pub fn control_index(&self) -> u8 {
        self.control.load(Ordering::Relaxed)
    }

    /// Currently selected game palette
    pub fn scheme(&self) -> &'static ColorScheme {
        let i = self.scheme_index() as usize;
        &COLOR_SCHEMES[i.min(COLOR_SCHEMES.len() - 1)]
    }

    /// Currently selected control palette
    pub fn control(&self) -> &'static ControlScheme {
        let i = self.control_index() as usize;
        &CONTROL_SCHEMES[i.min(CONTROL_SCHEMES.len() - 1)]
    }

    /// Select an explicit scheme; out-of-range indices are ignored
    pub fn select(&self, scheme: u8, control: u8) {
        if (scheme as usize) < COLOR_SCHEMES.len() {
            self.scheme.store(scheme, Ordering::Relaxed);
        }
        if (control as usize) < CONTROL_SCHEMES.len() {
            self.control.store(control, Ordering::Relaxed);
        }
    }

    /// Move to the next (+1) or previous (-1) game palette, wrapping
    pub fn step_scheme(&self, direction: i8) -> u8 {
        let next = wrap_step(self.scheme_index(), direction, COLOR_SCHEMES.len());
        self.scheme.store(next, Ordering::Relaxed);
        next
    }

    /// Move to the next (+1) or previous (-1) control palette, wrapping
    pub fn step_control(&self, direction: i8) -> u8 {
        let next = wrap_step(self.control_index(), direction, CONTROL_SCHEMES.len());
        self.control.store(next, Ordering::Relaxed);
        next
    }
}

impl Default for PaletteSelect {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_wraps_both_ways() {
        let p = PaletteSelect::new(0, 0);
        assert_eq!(p.step_scheme(-1), 36);
        assert_eq!(p.scheme().name, "sgb_4h");
        assert_eq!(p.step_scheme(1), 0);
        assert_eq!(p.scheme().name, "black_and_white");
    }

    #[test]
    fn test_control_wraps() {
        let p = PaletteSelect::new(0, 2);
        assert_eq!(p.step_control(1), 0);
        assert_eq!(p.step_control(-1), 2);
        assert_eq!(p.control().background(), 0x808080);
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let p = PaletteSelect::new(3, 1);
        p.select(200, 9);
        assert_eq!(p.scheme_index(), 3);
        assert_eq!(p.control_index(), 1);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(scheme_index("dmg"), Some(2));
        assert_eq!(control_index("dark"), Some(1));
        assert_eq!(scheme_index("gbc"), None);
    }
}
