//! Touch polling task

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker};

use lcdbridge_core::input::{TouchTracker, VirtualGamepad};
use lcdbridge_core::orchestrator::SharedState;
use lcdbridge_drivers::touch::{Gt911, TouchError};

pub type TouchBus = I2c<'static, I2C0, Async>;

/// Poll the GT911 and feed the virtual gamepad
///
/// A failed or not-ready read leaves every button as it was until the next
/// poll.
#[embassy_executor::task]
pub async fn touch_task(
    mut touch: Gt911<TouchBus>,
    shared: &'static SharedState,
    scale: u16,
    poll_ms: u16,
) {
    info!("Touch task started ({} ms poll)", poll_ms);

    let mut tracker = TouchTracker::new();
    let mut gamepad = VirtualGamepad::new(&shared.buttons, &shared.glyphs, scale);
    let mut ticker = Ticker::every(Duration::from_millis(poll_ms as u64));

    loop {
        ticker.next().await;

        match touch.poll(&mut tracker, &mut gamepad).await {
            Ok(points) => trace!("{} touch points", points),
            Err(TouchError::NotReady) => {}
            Err(e) => warn!("Touch read failed: {:?}", e),
        }
    }
}
