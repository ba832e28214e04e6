//! Scanline composition
//!
//! Turns one framebuffer row plus the menu overlay into the token stream
//! for one output line:
//!
//! ```text
//! ┌──────────── game window (RAW_RUN) ────────────┬─ border ─┬ fill ┬─┐
//! │ palette(framebuffer[row]) / overlay pixels    │ gamepad  │ bg   │█│ EOL
//! └───────────────────────────────────────────────┴──────────┴──────┴─┘
//! ```
//!
//! Lines outside the game window are a single background run. All widths
//! are in scaled units; the sink multiplies them by `scale` on the panel.

use lcdbridge_hal::video::ScanlineSink;
use lcdbridge_protocol::scanline::{EncodeError, ScanlineWriter, MIN_RUN};

use super::color::{quantize, PixelFormat};
use super::framebuffer::FrameStore;
use super::palette::PaletteSelect;
use super::{FB_HEIGHT, FB_WIDTH};
use crate::geometry::Rect;
use crate::input::glyphs::GlyphMap;
use crate::traits::OverlaySource;

/// What fills the space to the right of the game window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BorderStyle {
    /// Solid background color
    Plain,
    /// Virtual gamepad image drawn with the control palette
    VirtualGamepad,
}

/// Smallest multiple of `multiple` that is >= `value`
pub const fn round_up(value: u16, multiple: u16) -> u16 {
    if multiple == 0 {
        return value;
    }
    value.div_ceil(multiple) * multiple
}

/// Why a frame ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError<E> {
    /// Not even an idle line fit the token buffer
    Encode { line: u16, error: EncodeError },
    /// The sink rejected a line or the blanking
    Sink(E),
}

/// Fixed screen geometry, computed once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// Game window, anchored at the top-left corner
    pub game: Rect,
    /// Menu overlay, relative to the game window
    pub overlay: Rect,
    /// Panel width in pixels
    pub output_width: u16,
    /// Horizontal and vertical scale factor
    pub scale: u16,
    pub border: BorderStyle,
}

impl Layout {
    /// Build the layout for an overlay plane of `overlay_width` ×
    /// `overlay_height` pixels
    ///
    /// The plane is stored in reading orientation and shown rotated 270°,
    /// so its width runs down the screen.
    pub fn new(
        output_width: u16,
        scale: u16,
        overlay_width: u16,
        overlay_height: u16,
        border: BorderStyle,
    ) -> Self {
        let game = Rect::new(0, 0, FB_WIDTH as u16, FB_HEIGHT as u16);
        Self {
            game,
            overlay: Rect::centered_in(overlay_height, overlay_width, &game),
            output_width,
            scale: scale.max(1),
            border,
        }
    }

    /// Full line length in scaled pixels, rounded to nearest
    pub const fn line_length(&self) -> u16 {
        ((self.output_width as u32 * 2 + self.scale as u32) / (2 * self.scale as u32)) as u16
    }

    /// Width of the virtual gamepad border in scaled pixels
    pub const fn gamepad_width(&self) -> u16 {
        (self.output_width / self.scale).saturating_sub(self.game.width)
    }
}

/// Produces encoded scanlines from the shared video state
pub struct Compositor<'a, F: ?Sized, O: ?Sized> {
    frame: &'a F,
    overlay: &'a O,
    palettes: &'a PaletteSelect,
    glyphs: &'a GlyphMap,
    layout: Layout,
    format: PixelFormat,
    background: u16,
}

impl<'a, F, O> Compositor<'a, F, O>
where
    F: FrameStore + ?Sized,
    O: OverlaySource + ?Sized,
{
    /// `background` is the packed color for idle lines and the plain border
    pub fn new(
        frame: &'a F,
        overlay: &'a O,
        palettes: &'a PaletteSelect,
        glyphs: &'a GlyphMap,
        layout: Layout,
        format: PixelFormat,
        background: u16,
    ) -> Self {
        Self {
            frame,
            overlay,
            palettes,
            glyphs,
            layout,
            format,
            background,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Encode output line `line` into `buf`
    ///
    /// Returns the number of 32-bit words used. A line that does not fit
    /// falls back to an idle line; the error is returned only if even that
    /// does not fit.
    pub fn render_line(&self, line: u16, buf: &mut [u16]) -> Result<usize, EncodeError> {
        let game = self.layout.game;
        if game.spans_line(line) {
            if let Ok(words) = self.render_active(line - game.y, buf) {
                return Ok(words);
            }
        }
        self.render_idle(buf)
    }

    /// Push the rest of the current output frame to `sink`, then blank it
    ///
    /// Starts at the sink's next line, so a call dropped mid-frame resumes
    /// where the previous one stopped. A line that cannot be encoded or
    /// pushed ends the frame early and the sink pads the remainder.
    pub async fn render_frame<S: ScanlineSink>(
        &self,
        sink: &mut S,
        tokens: &mut [u16],
    ) -> Result<(), FrameError<S::Error>> {
        let capacity = tokens.len().min(sink.line_capacity());
        let tokens = &mut tokens[..capacity];
        let mut result = Ok(());

        while sink.next_line() < sink.frame_lines() {
            let line = sink.next_line();
            let words = match self.render_line(line, tokens) {
                Ok(words) => words,
                Err(error) => {
                    result = Err(FrameError::Encode { line, error });
                    break;
                }
            };
            if let Err(e) = sink.push_line(&tokens[..words * 2]).await {
                result = Err(FrameError::Sink(e));
                break;
            }
        }

        sink.end_frame().await.map_err(FrameError::Sink)?;
        result
    }

    /// One background run across the whole line
    pub fn render_idle(&self, buf: &mut [u16]) -> Result<usize, EncodeError> {
        let mut w = ScanlineWriter::new(buf);
        w.color_run(self.background, self.layout.line_length())?;
        w.finish()
    }

    fn render_active(&self, line: u16, buf: &mut [u16]) -> Result<usize, EncodeError> {
        let layout = &self.layout;
        let scale = layout.scale;

        // Resolve palettes once so the whole line uses one consistent set
        let game_lut = self.palettes.scheme().colors.map(|c| quantize(c, self.format));
        let control_lut = self.palettes.control().colors.map(|c| quantize(c, self.format));

        let ov = layout.overlay;
        let overlay_on = self.overlay.is_enabled() && ov.spans_line(line);
        let ov_rot_x = if overlay_on {
            (ov.height - 1 - (line - ov.y)) as usize
        } else {
            0
        };
        let ov_stride = self.overlay.width() as usize;
        let row = line as usize * layout.game.width as usize;

        let mut w = ScanlineWriter::new(buf);

        w.raw_run(layout.game.width, |x| {
            if overlay_on && x >= ov.x && x - ov.x < ov.width {
                let idx = ov_rot_x + (x - ov.x) as usize * ov_stride;
                if let Some(pixel) = self.overlay.pixel(idx) {
                    return pixel;
                }
            }
            game_lut[(self.frame.load(row + x as usize) & 0x3) as usize]
        })?;
        let mut emitted = layout.game.width;

        let fill = match layout.border {
            BorderStyle::Plain => self.background,
            BorderStyle::VirtualGamepad => {
                let span = layout.gamepad_width();
                if span > MIN_RUN {
                    w.raw_run(span, |x| {
                        if x == 0 {
                            return control_lut[0];
                        }
                        self.glyphs
                            .sample(line, x)
                            .map(|cell| control_lut[(cell & 0x3) as usize])
                            .unwrap_or(control_lut[0])
                    })?;
                    emitted += span;
                }
                control_lut[0]
            }
        };

        let used = emitted as u32 * scale as u32;
        if used < layout.output_width as u32 {
            let remaining = ((layout.output_width as u32 - used) / scale as u32) as u16;
            let remaining = round_up(remaining, scale);
            if remaining > MIN_RUN {
                w.color_run(fill, remaining)?;
            }
        }

        w.finish()
    }
}
