//! Capture and scan-out on core 1
//!
//! Line generation runs continuously. A VSYNC rising edge from the
//! handheld preempts it: the source frame is captured with busy-waits and
//! scan-out then resumes at the line it was on, so every panel frame is
//! eventually completed and blanked.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_rp::peripherals::{DMA_CH0, PIO0};

use lcdbridge_core::orchestrator::SharedState;
use lcdbridge_core::traits::OverlaySource;
use lcdbridge_core::video::{
    capture_frame, Compositor, FrameError, Layout, PixelFormat, SourcePins,
};
use lcdbridge_hal::video::ScanlineSink;
use lcdbridge_hal_rp2040::scanout::TOKEN_CAPACITY;
use lcdbridge_hal_rp2040::{DpiScanout, RpInput};
use lcdbridge_osd::OverlayPlane;

use crate::channels::VIDEO_READY;

pub type Scanout = DpiScanout<'static, PIO0, 0, DMA_CH0>;
pub type CapturePins =
    SourcePins<RpInput<'static>, RpInput<'static>, RpInput<'static>, RpInput<'static>>;

/// Everything the video task takes ownership of
pub struct VideoSetup {
    pub scanout: Scanout,
    pub source: CapturePins,
    pub vsync: Input<'static>,
    pub shared: &'static SharedState,
    pub overlay: &'static OverlayPlane,
    pub layout: Layout,
    pub format: PixelFormat,
    /// Packed idle line and plain border color
    pub background: u16,
}

#[embassy_executor::task]
pub async fn video_task(setup: VideoSetup) {
    let VideoSetup {
        mut scanout,
        mut source,
        mut vsync,
        shared,
        overlay,
        layout,
        format,
        background,
    } = setup;

    info!(
        "Video task started: {} lines per frame, overlay {}x{}",
        scanout.frame_lines(),
        overlay.width(),
        overlay.height()
    );

    let compositor = Compositor::new(
        &shared.frame,
        overlay,
        &shared.palettes,
        &shared.glyphs,
        layout,
        format,
        background,
    );

    VIDEO_READY.signal(());

    let mut tokens = [0u16; TOKEN_CAPACITY];
    loop {
        match select(
            vsync.wait_for_rising_edge(),
            compositor.render_frame(&mut scanout, &mut tokens),
        )
        .await
        {
            Either::First(()) => capture_frame(&mut source, &shared.frame),
            Either::Second(Ok(())) => {}
            Either::Second(Err(FrameError::Encode { line, error })) => {
                warn!("Line {} does not fit: {:?}", line, error);
            }
            Either::Second(Err(FrameError::Sink(e))) => {
                warn!("Scan-out rejected frame: {:?}", e);
            }
        }
    }
}
