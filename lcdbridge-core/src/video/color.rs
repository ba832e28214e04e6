//! 24-bit to sink color quantization

/// 24-bit RGB color, `0xRRGGBB`
pub type Rgb888 = u32;

/// Bit positions of each 2-bit channel in a packed sink pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelFormat {
    pub r_shift: u8,
    pub g_shift: u8,
    pub b_shift: u8,
}

impl PixelFormat {
    /// RGB222 on the low six data lines: R at bit 0, G at 2, B at 4
    pub const RGB222: Self = Self {
        r_shift: 0,
        g_shift: 2,
        b_shift: 4,
    };
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::RGB222
    }
}

/// Keep the top two bits of each channel and pack them for the sink
#[inline(always)]
pub const fn quantize(color: Rgb888, format: PixelFormat) -> u16 {
    let r = (color >> 22) & 0x3;
    let g = (color >> 14) & 0x3;
    let b = (color >> 6) & 0x3;
    ((r << format.r_shift) | (g << format.g_shift) | (b << format.b_shift)) as u16
}

/// Fixed colors used for borders and the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BasicColor {
    Black,
    Blue,
    White,
    LightGrey,
    DarkGrey,
    Red,
    Green,
    Yellow,
    Purple,
}

impl BasicColor {
    pub const fn rgb(self) -> Rgb888 {
        match self {
            Self::Black => 0x000000,
            Self::Blue => 0x0000FF,
            Self::White => 0xFFFFFF,
            Self::LightGrey => 0x808080,
            Self::DarkGrey => 0x404040,
            Self::Red => 0xFF0000,
            Self::Green => 0x00FF00,
            Self::Yellow => 0xFFFF00,
            Self::Purple => 0xFF00FF,
        }
    }

    /// Look up a color by its config name (`"light_grey"` etc.)
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "black" => Self::Black,
            "blue" => Self::Blue,
            "white" => Self::White,
            "light_grey" => Self::LightGrey,
            "dark_grey" => Self::DarkGrey,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "purple" => Self::Purple,
            _ => return None,
        })
    }
}
