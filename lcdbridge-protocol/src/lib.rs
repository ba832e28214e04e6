//! lcdbridge wire formats
//!
//! Two byte-level protocols cross the bridge's boundaries:
//!
//! - [`scanline`]: the run-length token stream a scan-out engine replays to
//!   produce one panel line. Every line is a sequence of 16-bit tokens:
//!   ```text
//!   ┌───────────┬──────────┬────────────┬──────────────┐
//!   │ COLOR_RUN │ color    │ len - 3    │              │
//!   │ RAW_RUN   │ first px │ len - 3    │ px[1..len]   │
//!   │ RAW_1P    │ color    │            │              │
//!   │ EOL_ALIGN │ (pad to 32-bit boundary)             │
//!   └───────────┴──────────┴────────────┴──────────────┘
//!   ```
//! - [`gt911`]: the register block a GT911 capacitive touch controller
//!   returns over I2C.

#![no_std]
#![deny(unsafe_code)]

pub mod gt911;
pub mod scanline;

pub use gt911::{ReportError, TouchPoint, TouchReport};
pub use scanline::{
    expand, DecodeError, EncodeError, Op, OpIter, Opcode, ScanlineWriter, MAX_LINE_PIXELS,
    MAX_LINE_TOKENS, MIN_RUN,
};
