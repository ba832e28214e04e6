//! Overlay pixel plane

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};
use lcdbridge_core::traits::OverlaySource;
use lcdbridge_core::video::{quantize, PixelFormat};

use crate::{CHAR_HEIGHT, MAX_LINES, MAX_PLANE_LEN, PLANE_WIDTH};

/// Menu surface shared with the compositor
///
/// Row-major, [`PLANE_WIDTH`] pixels per row. Each byte holds a packed sink
/// color, so the pixel format must fit in 8 bits.
pub struct OverlayPlane {
    pixels: [AtomicU8; MAX_PLANE_LEN],
    lines: u8,
    enabled: AtomicBool,
}

impl OverlayPlane {
    /// Plane for `lines` menu lines, hidden and all black
    pub const fn new(lines: u8) -> Self {
        let lines = if lines as usize > MAX_LINES {
            MAX_LINES as u8
        } else {
            lines
        };
        Self {
            pixels: [const { AtomicU8::new(0) }; MAX_PLANE_LEN],
            lines,
            enabled: AtomicBool::new(false),
        }
    }

    /// Number of text lines
    pub fn lines(&self) -> u8 {
        self.lines
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn len(&self) -> usize {
        PLANE_WIDTH * CHAR_HEIGHT * self.lines as usize
    }

    /// Write one packed pixel; out-of-range positions are dropped
    pub fn store(&self, x: usize, y: usize, color: u8) {
        if x >= PLANE_WIDTH {
            return;
        }
        let idx = y * PLANE_WIDTH + x;
        if idx < self.len() {
            self.pixels[idx].store(color, Ordering::Relaxed);
        }
    }
}

impl OverlaySource for OverlayPlane {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn width(&self) -> u16 {
        PLANE_WIDTH as u16
    }

    fn height(&self) -> u16 {
        (CHAR_HEIGHT * self.lines as usize) as u16
    }

    fn pixel(&self, index: usize) -> Option<u16> {
        if index < self.len() {
            Some(self.pixels[index].load(Ordering::Relaxed) as u16)
        } else {
            None
        }
    }
}

/// `embedded-graphics` target drawing into an [`OverlayPlane`]
pub struct PlaneCanvas<'a> {
    plane: &'a OverlayPlane,
    format: PixelFormat,
}

impl<'a> PlaneCanvas<'a> {
    pub fn new(plane: &'a OverlayPlane, format: PixelFormat) -> Self {
        Self { plane, format }
    }

    pub fn plane(&self) -> &'a OverlayPlane {
        self.plane
    }

    fn pack(&self, color: Rgb888) -> u8 {
        let rgb = (color.r() as u32) << 16 | (color.g() as u32) << 8 | color.b() as u32;
        quantize(rgb, self.format) as u8
    }
}

impl DrawTarget for PlaneCanvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.plane.store(x as usize, y as usize, self.pack(color));
        }
        Ok(())
    }
}

impl OriginDimensions for PlaneCanvas<'_> {
    fn size(&self) -> Size {
        Size::new(PLANE_WIDTH as u32, self.plane.height() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::Rectangle;

    #[test]
    fn test_dimensions() {
        let plane = OverlayPlane::new(3);
        assert_eq!(plane.width(), 126);
        assert_eq!(plane.height(), 24);
        assert!(!plane.is_enabled());

        let clamped = OverlayPlane::new(9);
        assert_eq!(clamped.lines(), 4);
        assert_eq!(clamped.height(), 32);
    }

    #[test]
    fn test_pixel_bounds() {
        let plane = OverlayPlane::new(3);
        plane.store(125, 23, 0x15);
        assert_eq!(plane.pixel(23 * 126 + 125), Some(0x15));
        assert_eq!(plane.pixel(126 * 24), None);

        // Past the last line or the right edge
        plane.store(0, 24, 0x3F);
        plane.store(126, 0, 0x3F);
        assert_eq!(plane.pixel(126), Some(0));
    }

    #[test]
    fn test_canvas_quantizes() {
        let plane = OverlayPlane::new(4);
        let mut canvas = PlaneCanvas::new(&plane, PixelFormat::RGB222);
        canvas
            .fill_solid(&Rectangle::new(Point::new(2, 1), Size::new(2, 1)), Rgb888::BLUE)
            .unwrap();
        // Blue in the top two bits of B, shifted to bits 4..5
        assert_eq!(plane.pixel(126 + 2), Some(0x30));
        assert_eq!(plane.pixel(126 + 3), Some(0x30));
        assert_eq!(plane.pixel(126 + 4), Some(0));
    }

    #[test]
    fn test_canvas_size_follows_lines() {
        let plane = OverlayPlane::new(3);
        let canvas = PlaneCanvas::new(&plane, PixelFormat::RGB222);
        assert_eq!(canvas.size(), Size::new(126, 24));
    }
}
