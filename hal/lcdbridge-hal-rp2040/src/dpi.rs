//! Parallel RGB ("DPI") line timing
//!
//! The scan-out state machine shifts one byte per pixel clock onto eight
//! consecutive pins:
//!
//! ```text
//!  bit:   7      6      5  4   3  2   1  0
//!       VSYNC  HSYNC    B1 B0  G1 G0  R1 R0
//! ```
//!
//! A line is `h_total` bytes: active pixels, front porch, HSYNC pulse,
//! back porch. Lines are packed four bytes to a word, first byte in the low
//! bits, so the OSR can shift them out to the right.

use fixed::types::U24F8;

/// HSYNC bit in an output byte
pub const HSYNC_BIT: u8 = 1 << 6;

/// VSYNC bit in an output byte
pub const VSYNC_BIT: u8 = 1 << 7;

/// Color bits in an output byte
pub const COLOR_MASK: u8 = 0x3F;

/// PIO cycles per pixel clock (data + clock edge)
pub const CYCLES_PER_PIXEL: u32 = 2;

/// Longest supported line, in 32-bit words
pub const MAX_LINE_WORDS: usize = 256;

/// Panel timing, syncs active high
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DpiTiming {
    pub pixel_clock_hz: u32,
    pub h_active: u16,
    pub h_front_porch: u16,
    pub h_pulse: u16,
    pub h_total: u16,
    pub v_active: u16,
    pub v_front_porch: u16,
    pub v_pulse: u16,
    pub v_total: u16,
}

impl DpiTiming {
    /// 800×480 TFT at 24 MHz
    pub const TFT_800X480: Self = Self {
        pixel_clock_hz: 24_000_000,
        h_active: 800,
        h_front_porch: 40,
        h_pulse: 12,
        h_total: 960,
        v_active: 480,
        v_front_porch: 2,
        v_pulse: 2,
        v_total: 500,
    };

    /// Words per packed line
    pub const fn line_words(&self) -> usize {
        (self.h_total as usize).div_ceil(4)
    }

    /// Lines of vertical blanking after the active area
    pub const fn blank_lines(&self) -> u16 {
        self.v_total - self.v_active
    }

    /// Whether blanking line `n` (0 = first after the active area) carries
    /// the VSYNC pulse
    pub const fn in_vsync(&self, n: u16) -> bool {
        n >= self.v_front_porch && n < self.v_front_porch + self.v_pulse
    }
}

/// State machine clock divider for `timing` from `sys_clk_hz`
pub fn clock_divider(sys_clk_hz: u32, timing: &DpiTiming) -> U24F8 {
    let target = timing.pixel_clock_hz as u64 * CYCLES_PER_PIXEL as u64;
    if target == 0 {
        return U24F8::from_bits(0xFFFF_FF00);
    }
    // 24.8 fixed point, rounded to nearest
    let bits = ((sys_clk_hz as u64 * 256) + target / 2) / target;
    U24F8::from_bits(bits.clamp(0x100, 0xFFFF_FF00) as u32)
}

#[inline(always)]
fn put(words: &mut [u32], index: usize, byte: u8) {
    if let Some(word) = words.get_mut(index / 4) {
        let shift = (index % 4) * 8;
        *word = (*word & !(0xFF << shift)) | (byte as u32) << shift;
    }
}

fn fill_sync(words: &mut [u32], timing: &DpiTiming, vsync: u8) {
    let sync_start = (timing.h_active + timing.h_front_porch) as usize;
    let sync_end = sync_start + timing.h_pulse as usize;
    for i in timing.h_active as usize..timing.h_total as usize {
        let hsync = if (sync_start..sync_end).contains(&i) {
            HSYNC_BIT
        } else {
            0
        };
        put(words, i, hsync | vsync);
    }
}

/// Pack one active line
///
/// Each of `pixels` is repeated `scale` times; the active area past the
/// last pixel is black.
pub fn fill_line(words: &mut [u32], timing: &DpiTiming, pixels: &[u16], scale: u8) {
    let scale = scale.max(1) as usize;
    let active = timing.h_active as usize;
    for i in 0..active {
        let color = pixels.get(i / scale).map_or(0, |&p| p as u8 & COLOR_MASK);
        put(words, i, color);
    }
    fill_sync(words, timing, 0);
}

/// Pack one blanking line
pub fn fill_blank(words: &mut [u32], timing: &DpiTiming, vsync: bool) {
    let v = if vsync { VSYNC_BIT } else { 0 };
    for i in 0..timing.h_active as usize {
        put(words, i, v);
    }
    fill_sync(words, timing, v);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte(words: &[u32], i: usize) -> u8 {
        (words[i / 4] >> ((i % 4) * 8)) as u8
    }

    #[test]
    fn test_line_words() {
        assert_eq!(DpiTiming::TFT_800X480.line_words(), 240);
        assert_eq!(DpiTiming::TFT_800X480.blank_lines(), 20);
    }

    #[test]
    fn test_clock_divider() {
        // 240 MHz / (24 MHz * 2) = 5
        let div = clock_divider(240_000_000, &DpiTiming::TFT_800X480);
        assert_eq!(div, U24F8::from_num(5));
    }

    #[test]
    fn test_fill_line_scales() {
        let t = DpiTiming::TFT_800X480;
        let mut words = [0u32; MAX_LINE_WORDS];
        fill_line(&mut words, &t, &[0x01, 0x3F, 0x30], 3);

        assert_eq!(byte(&words, 0), 0x01);
        assert_eq!(byte(&words, 2), 0x01);
        assert_eq!(byte(&words, 3), 0x3F);
        assert_eq!(byte(&words, 8), 0x30);
        assert_eq!(byte(&words, 9), 0);
        assert_eq!(byte(&words, 799), 0);
    }

    #[test]
    fn test_hsync_window() {
        let t = DpiTiming::TFT_800X480;
        let mut words = [0u32; MAX_LINE_WORDS];
        fill_line(&mut words, &t, &[], 3);

        assert_eq!(byte(&words, 839), 0);
        assert_eq!(byte(&words, 840), HSYNC_BIT);
        assert_eq!(byte(&words, 851), HSYNC_BIT);
        assert_eq!(byte(&words, 852), 0);
        assert_eq!(byte(&words, 959), 0);
    }

    #[test]
    fn test_color_masked() {
        let t = DpiTiming::TFT_800X480;
        let mut words = [0u32; MAX_LINE_WORDS];
        fill_line(&mut words, &t, &[0xFFFF], 1);
        assert_eq!(byte(&words, 0), COLOR_MASK);
    }

    #[test]
    fn test_vsync_lines() {
        let t = DpiTiming::TFT_800X480;
        assert!(!t.in_vsync(1));
        assert!(t.in_vsync(2));
        assert!(t.in_vsync(3));
        assert!(!t.in_vsync(4));

        let mut words = [0u32; MAX_LINE_WORDS];
        fill_blank(&mut words, &t, true);
        assert_eq!(byte(&words, 0), VSYNC_BIT);
        assert_eq!(byte(&words, 845), VSYNC_BIT | HSYNC_BIT);
    }
}
