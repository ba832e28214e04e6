//! Embassy tasks
//!
//! The video task owns core 1. Everything else runs on core 0 and talks to
//! it through `SharedState`.

pub mod command;
pub mod link;
pub mod touch;
pub mod video;

pub use command::command_task;
pub use link::{link_emulate_task, link_sniff_task};
pub use touch::touch_task;
pub use video::{video_task, VideoSetup};
