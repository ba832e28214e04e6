//! Bit-banged capture of the handheld's LCD bus
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//! VSYNC ───────────┘                                      └──────────
//!                    ┌──────┐                                  ┌─────
//! HSYNC ─────────────┘      └──────────────────────────────────┘
//!                      ┌─┐     ┌─┐ ┌─┐ ┌─┐ ┌─┐ ┌─┐ ┌─┐      ┌─┐
//! CLOCK ───────────────┘ └─────┘ └─┘ └─┘ └─┘ └─┘ └─┘ └──────┘ └─────
//! DATA 0/1            ─┘└─ pixel 0 ─┘└ 1 ┘└ 2 ┘ ...
//! ```
//!
//! A frame starts on the VSYNC rising edge. Each line starts after an HSYNC
//! pulse; each pixel is sampled and then held until the clock falls.
//!
//! There is no timeout: if the source stops clocking, capture blocks.

use lcdbridge_hal::gpio::{spin_until_falling, InputPin};

use super::framebuffer::FrameStore;
use super::{FB_WIDTH, SOURCE_HEIGHT, SOURCE_WIDTH};

/// Framebuffer index for a source pixel, rotated 270° into portrait
#[inline(always)]
pub const fn rotate_index(row: usize, column: usize) -> usize {
    let rot_x = row;
    let rot_y = SOURCE_WIDTH - 1 - column;
    rot_x + rot_y * FB_WIDTH
}

/// Synchronous parallel video bus
pub trait SourceBus {
    /// Block until the next line starts
    fn wait_line_start(&mut self);

    /// Read the two data lines as `d0 << 1 | d1`
    fn sample(&mut self) -> u8;

    /// Block until the pixel clock moves to the next pixel
    fn wait_pixel_clock(&mut self);
}

/// Source bus on plain input pins
pub struct SourcePins<H, C, D0, D1> {
    pub hsync: H,
    pub clock: C,
    pub data0: D0,
    pub data1: D1,
}

impl<H, C, D0, D1> SourceBus for SourcePins<H, C, D0, D1>
where
    H: InputPin,
    C: InputPin,
    D0: InputPin,
    D1: InputPin,
{
    #[inline(always)]
    fn wait_line_start(&mut self) {
        spin_until_falling(&self.hsync);
    }

    #[inline(always)]
    fn sample(&mut self) -> u8 {
        ((self.data0.is_high() as u8) << 1) | self.data1.is_high() as u8
    }

    #[inline(always)]
    fn wait_pixel_clock(&mut self) {
        spin_until_falling(&self.clock);
    }
}

/// Capture one full source frame into `store`
///
/// Call on the VSYNC rising edge. Every framebuffer cell is overwritten
/// exactly once.
pub fn capture_frame<B, F>(bus: &mut B, store: &F)
where
    B: SourceBus + ?Sized,
    F: FrameStore + ?Sized,
{
    for row in 0..SOURCE_HEIGHT {
        bus.wait_line_start();
        for column in 0..SOURCE_WIDTH {
            store.store(rotate_index(row, column), bus.sample());
            bus.wait_pixel_clock();
        }
    }
}
