//! Cross-core signals
//!
//! Shared display and input state lives in `SharedState`; only the startup
//! handshake needs a wakeup.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Raised by the video task once the panel is being driven
pub static VIDEO_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
