//! Menu model and text rendering

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, Point, Size};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use heapless::String;
use lcdbridge_core::traits::{MenuControl, OverlaySource};
use lcdbridge_core::video::PixelFormat;

use crate::plane::{OverlayPlane, PlaneCanvas};
use crate::{CHARS_PER_LINE, CHAR_HEIGHT, MAX_LINES, PLANE_WIDTH};

/// 5×8 glyphs on a 7-pixel pitch
const OSD_FONT: MonoFont<'static> = MonoFont {
    character_spacing: 2,
    ..FONT_5X8
};

const TEXT: Rgb888 = Rgb888::WHITE;
const BACKGROUND: Rgb888 = Rgb888::BLUE;

/// The on-screen menu
pub struct Osd<'a> {
    canvas: PlaneCanvas<'a>,
    texts: [String<CHARS_PER_LINE>; MAX_LINES],
    active: u8,
}

impl<'a> Osd<'a> {
    /// Menu drawing into `plane`, first line highlighted
    pub fn new(plane: &'a OverlayPlane, format: PixelFormat) -> Self {
        let mut osd = Self {
            canvas: PlaneCanvas::new(plane, format),
            texts: core::array::from_fn(|_| String::new()),
            active: 0,
        };
        osd.render();
        osd
    }

    fn line_count(&self) -> u8 {
        self.canvas.plane().lines()
    }

    pub fn line_text(&self, line: u8) -> Option<&str> {
        if line < self.line_count() {
            self.texts.get(line as usize).map(|s| s.as_str())
        } else {
            None
        }
    }

    /// Redraw every line, inverting the active one
    fn render(&mut self) {
        for line in 0..self.line_count() {
            let (fg, bg) = if line == self.active {
                (BACKGROUND, TEXT)
            } else {
                (TEXT, BACKGROUND)
            };
            let top = line as i32 * CHAR_HEIGHT as i32;

            let row = Rectangle::new(
                Point::new(0, top),
                Size::new(PLANE_WIDTH as u32, CHAR_HEIGHT as u32),
            );
            let _ = self.canvas.fill_solid(&row, bg);

            let style = MonoTextStyleBuilder::new()
                .font(&OSD_FONT)
                .text_color(fg)
                .background_color(bg)
                .build();
            let text = self.texts[line as usize].as_str();
            let _ = Text::with_baseline(text, Point::new(0, top), style, Baseline::Top)
                .draw(&mut self.canvas);
        }
    }
}

impl MenuControl for Osd<'_> {
    fn is_open(&self) -> bool {
        self.canvas.plane().is_enabled()
    }

    fn toggle(&mut self) {
        let plane = self.canvas.plane();
        plane.set_enabled(!plane.is_enabled());
    }

    fn change_line(&mut self, direction: i8) {
        let count = self.line_count() as i16;
        if count == 0 {
            return;
        }
        self.active = (self.active as i16 + direction as i16).rem_euclid(count) as u8;
        self.render();
    }

    fn active_line(&self) -> u8 {
        self.active
    }

    /// Longer texts are cut at the line width
    fn set_line_text(&mut self, line: u8, text: &str) {
        if line >= self.line_count() {
            return;
        }
        let slot = &mut self.texts[line as usize];
        slot.clear();
        for c in text.chars() {
            if slot.push(c).is_err() {
                break;
            }
        }
    }

    fn refresh(&mut self) {
        self.render();
    }
}
