//! PIO + DMA scan-out
//!
//! One state machine clocks packed line words out to the panel. The program
//! is two instructions per pixel clock, data on the falling edge and the
//! clock rising one cycle later:
//!
//! ```text
//!   out pins, 8   side 0    ; next byte onto D0..D7, PCLK low
//!   nop           side 1    ; PCLK high, panel samples
//! ```
//!
//! Lines are pushed by DMA straight from the packed buffer. The state
//! machine stalls with PCLK low when the FIFO runs dry between lines.
//!
//! The frame position only advances after a whole DMA transfer, so a push
//! or blanking pass dropped mid-transfer (capture preempting scan-out)
//! repeats that transfer when resumed instead of restarting the frame.

use embassy_rp::dma::Channel;
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, Pin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use lcdbridge_hal::video::ScanlineSink;
use lcdbridge_protocol::scanline::{expand, DecodeError, MAX_LINE_PIXELS, MAX_LINE_TOKENS};

use crate::dpi::{clock_divider, fill_blank, fill_line, DpiTiming, MAX_LINE_WORDS};

/// Encoded line capacity offered to the compositor, in tokens
pub const TOKEN_CAPACITY: usize = MAX_LINE_TOKENS;

/// Scan-out errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanoutError {
    /// The token stream did not decode
    Decode(DecodeError),
}

/// PIO pins for the panel
///
/// `data` must be eight consecutive GPIOs: R0 R1 G0 G1 B0 B1 HSYNC VSYNC.
pub struct DpiPins<'d, PIO: Instance> {
    pub data: [Pin<'d, PIO>; 8],
    pub clock: Pin<'d, PIO>,
}

/// Scan-out sink driving a parallel RGB panel
pub struct DpiScanout<'d, PIO: Instance, const SM: usize, DMA: Channel> {
    sm: StateMachine<'d, PIO, SM>,
    dma: Peri<'d, DMA>,
    timing: DpiTiming,
    scale: u8,
    line: [u32; MAX_LINE_WORDS],
    pixels: [u16; MAX_LINE_PIXELS],
    /// Active lines fully sent this frame
    lines_sent: u16,
    /// Copies of the current line already sent
    repeats_sent: u8,
    /// Blanking lines already sent
    blank_sent: u16,
}

impl<'d, PIO: Instance, const SM: usize, DMA: Channel> DpiScanout<'d, PIO, SM, DMA> {
    /// Load the program, configure the state machine and start it
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        dma: Peri<'d, DMA>,
        pins: DpiPins<'d, PIO>,
        timing: DpiTiming,
        scale: u8,
        sys_clk_hz: u32,
    ) -> Self {
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "out pins, 8 side 0",
            "nop side 1",
            ".wrap"
        );
        let installed = common.load_program(&prg.program);

        let data: [&Pin<'d, PIO>; 8] = core::array::from_fn(|i| &pins.data[i]);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&pins.clock]);
        cfg.set_out_pins(&data);
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 32,
            direction: ShiftDirection::Right,
        };
        cfg.clock_divider = clock_divider(sys_clk_hz, &timing);

        sm.set_config(&cfg);
        sm.set_pin_dirs(Direction::Out, &data);
        sm.set_pin_dirs(Direction::Out, &[&pins.clock]);
        sm.set_enable(true);

        Self {
            sm,
            dma,
            timing,
            scale: scale.max(1),
            line: [0; MAX_LINE_WORDS],
            pixels: [0; MAX_LINE_PIXELS],
            lines_sent: 0,
            repeats_sent: 0,
            blank_sent: 0,
        }
    }

    async fn send(&mut self) {
        let words = self.timing.line_words().min(MAX_LINE_WORDS);
        self.sm
            .tx()
            .dma_push(self.dma.reborrow(), &self.line[..words], false)
            .await;
    }

    /// Send the remaining vertical copies of the packed line
    async fn send_scaled(&mut self) {
        while self.repeats_sent < self.scale {
            self.send().await;
            self.repeats_sent += 1;
        }
        self.repeats_sent = 0;
        self.lines_sent = self.lines_sent.saturating_add(1);
    }
}

impl<PIO: Instance, const SM: usize, DMA: Channel> ScanlineSink
    for DpiScanout<'_, PIO, SM, DMA>
{
    type Error = ScanoutError;

    fn line_capacity(&self) -> usize {
        TOKEN_CAPACITY
    }

    fn frame_lines(&self) -> u16 {
        self.timing.v_active / self.scale as u16
    }

    fn next_line(&self) -> u16 {
        self.lines_sent
    }

    async fn push_line(&mut self, tokens: &[u16]) -> Result<(), Self::Error> {
        let count = expand(tokens, &mut self.pixels).map_err(ScanoutError::Decode)?;
        fill_line(&mut self.line, &self.timing, &self.pixels[..count], self.scale);
        self.send_scaled().await;
        Ok(())
    }

    async fn end_frame(&mut self) -> Result<(), Self::Error> {
        // Pad a short frame with black lines so the panel keeps its timing
        if self.lines_sent < self.frame_lines() {
            fill_line(&mut self.line, &self.timing, &[], self.scale);
            while self.lines_sent < self.frame_lines() {
                self.send_scaled().await;
            }
        }

        while self.blank_sent < self.timing.blank_lines() {
            fill_blank(&mut self.line, &self.timing, self.timing.in_vsync(self.blank_sent));
            self.send().await;
            self.blank_sent += 1;
        }

        self.lines_sent = 0;
        self.blank_sent = 0;
        Ok(())
    }
}
