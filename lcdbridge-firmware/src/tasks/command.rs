//! Menu command tick

use defmt::*;
use embassy_time::{Duration, Ticker};

use lcdbridge_core::orchestrator::{CommandOutcome, CommandProcessor, PwmBacklight, SharedState};
use lcdbridge_hal_rp2040::RpPwmB;
use lcdbridge_osd::Osd;

use crate::channels::VIDEO_READY;

/// Watch the button vector and drive the menu, palettes and backlight
#[embassy_executor::task]
pub async fn command_task(
    mut processor: CommandProcessor,
    mut osd: Osd<'static>,
    mut backlight: PwmBacklight<RpPwmB<'static>>,
    shared: &'static SharedState,
    tick_ms: u16,
) {
    VIDEO_READY.wait().await;
    info!("Command task started ({} ms tick)", tick_ms);

    processor.refresh(&mut osd, &shared.palettes);

    let mut ticker = Ticker::every(Duration::from_millis(tick_ms as u64));
    loop {
        ticker.next().await;

        match processor.tick(
            shared.buttons.snapshot(),
            &mut osd,
            &shared.palettes,
            &mut backlight,
        ) {
            CommandOutcome::Idle => {}
            CommandOutcome::MenuToggled { open: true } => info!("Menu opened"),
            CommandOutcome::MenuToggled { open: false } => info!("Menu closed"),
            CommandOutcome::LineChanged(line) => debug!("Menu line {}", line),
            CommandOutcome::SchemeChanged(scheme) => info!("Color scheme {}", scheme),
            CommandOutcome::ControlChanged(control) => info!("Control scheme {}", control),
            CommandOutcome::BacklightChanged(level) => info!("Backlight {}", level),
        }
    }
}
