//! Video sink abstraction
//!
//! A sink consumes one encoded scanline at a time (see
//! `lcdbridge-protocol::scanline` for the token format) and turns it into
//! panel timing. Lines are numbered in scaled units: with a 3x vertical
//! scale, an 480-line panel is fed 160 lines per frame.

/// Consumer of encoded scanlines
#[allow(async_fn_in_trait)]
pub trait ScanlineSink {
    /// Error type for sink operations
    type Error;

    /// Capacity of one line buffer in 16-bit tokens
    fn line_capacity(&self) -> usize;

    /// Number of scaled lines per output frame
    fn frame_lines(&self) -> u16;

    /// Scaled line the sink expects next
    ///
    /// Advances only when [`push_line`](Self::push_line) completes, so a
    /// caller whose push was cancelled resumes at the same line. Equals
    /// [`frame_lines`](Self::frame_lines) once the active area is done.
    fn next_line(&self) -> u16;

    /// Queue one encoded line for output
    ///
    /// Resolves once the sink has accepted the line and the caller may
    /// reuse its buffer.
    async fn push_line(&mut self, tokens: &[u16]) -> Result<(), Self::Error>;

    /// Finish the current frame (vertical blanking)
    ///
    /// Pads any lines not yet pushed with black. A cancelled call picks up
    /// where it stopped when called again; [`next_line`](Self::next_line)
    /// returns to 0 once it completes.
    async fn end_frame(&mut self) -> Result<(), Self::Error>;
}
