//! Controller link tasks
//!
//! The handheld strobes P14 (D-pad) then P15 (buttons) low and reads the
//! four shared lines. Emulation answers each strobe from the button
//! vector; sniffing only records what a physical pad presents.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;

use lcdbridge_core::input::{LinkEmulator, LinkSniffer, Row};
use lcdbridge_core::orchestrator::SharedState;
use lcdbridge_core::traits::OverlaySource;
use lcdbridge_hal_rp2040::{RpInput, RpOutput};
use lcdbridge_osd::OverlayPlane;

/// Drive P10..P13 from the shared button vector
#[embassy_executor::task]
pub async fn link_emulate_task(
    mut dpad_select: Input<'static>,
    mut buttons_select: Input<'static>,
    lines: [RpOutput<'static>; 4],
    shared: &'static SharedState,
    overlay: &'static OverlayPlane,
) {
    info!("Link task started (emulate)");

    let mut link = LinkEmulator::new(lines);

    loop {
        match select(
            dpad_select.wait_for_falling_edge(),
            buttons_select.wait_for_any_edge(),
        )
        .await
        {
            Either::First(()) => {
                link.on_select_falling(Row::Dpad, &shared.buttons, overlay.is_enabled());
            }
            Either::Second(()) if buttons_select.is_low() => {
                if link.on_select_falling(Row::Buttons, &shared.buttons, overlay.is_enabled()) {
                    debug!("Reset combination suppressed");
                }
            }
            Either::Second(()) => link.on_buttons_rising(),
        }
    }
}

/// Record a physical pad into the shared button vector
#[embassy_executor::task]
pub async fn link_sniff_task(
    mut dpad_select: Input<'static>,
    mut buttons_select: Input<'static>,
    lines: [RpInput<'static>; 4],
    shared: &'static SharedState,
) {
    info!("Link task started (sniff)");

    let link = LinkSniffer::new(lines);

    loop {
        match select(
            dpad_select.wait_for_falling_edge(),
            buttons_select.wait_for_falling_edge(),
        )
        .await
        {
            Either::First(()) => link.on_select_falling(Row::Dpad, &shared.buttons),
            Either::Second(()) => link.on_select_falling(Row::Buttons, &shared.buttons),
        }
    }
}
