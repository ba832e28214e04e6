//! Scanline token encoding and decoding.
//!
//! Token format (all values 16-bit):
//! - `COLOR_RUN color n`: `color` repeated `n + MIN_RUN` times
//! - `RAW_RUN first n px...`: `n + MIN_RUN` literal pixels, the first one
//!   carried in the header, the remaining `n + MIN_RUN - 1` following it
//! - `RAW_1P color`: one literal pixel
//! - `EOL_ALIGN`: end of line; a zero pad token follows when needed so the
//!   line occupies a whole number of 32-bit words
//!
//! Run lengths are stored minus [`MIN_RUN`], the shortest run the scan-out
//! engine can replay.

/// Minimum run length; every encoded length is offset by this value
pub const MIN_RUN: u16 = 3;

/// Widest decoded line: 800 panel columns plus the terminating pixel
pub const MAX_LINE_PIXELS: usize = 801;

/// Token capacity that holds any line of [`MAX_LINE_PIXELS`] pixels
///
/// Literal stretches cost one token per pixel plus a header per run, so a
/// full-width line stays well under this.
pub const MAX_LINE_TOKENS: usize = 1024;

/// Token identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Opcode {
    ColorRun = 0,
    EolAlign = 1,
    RawRun = 2,
    Raw1p = 3,
}

impl Opcode {
    /// Decode a token into an opcode
    pub fn from_token(token: u16) -> Option<Self> {
        match token {
            0 => Some(Self::ColorRun),
            1 => Some(Self::EolAlign),
            2 => Some(Self::RawRun),
            3 => Some(Self::Raw1p),
            _ => None,
        }
    }
}

/// Errors that can occur while encoding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The line does not fit in the provided buffer
    BufferFull,
    /// Requested run is shorter than MIN_RUN
    RunTooShort,
}

/// Writes tokens for one line into a caller-provided buffer
///
/// Every operation checks capacity before writing anything, so a failed
/// call leaves the already-encoded prefix intact and never writes past the
/// end of the buffer.
pub struct ScanlineWriter<'a> {
    buf: &'a mut [u16],
    len: usize,
}

impl<'a> ScanlineWriter<'a> {
    /// Start a new line at the beginning of `buf`
    pub fn new(buf: &'a mut [u16]) -> Self {
        Self { buf, len: 0 }
    }

    /// Number of tokens written so far
    pub fn tokens(&self) -> usize {
        self.len
    }

    fn reserve(&self, tokens: usize) -> Result<(), EncodeError> {
        if self.len + tokens > self.buf.len() {
            Err(EncodeError::BufferFull)
        } else {
            Ok(())
        }
    }

    /// Emit `len` pixels of a single color
    pub fn color_run(&mut self, color: u16, len: u16) -> Result<(), EncodeError> {
        if len < MIN_RUN {
            return Err(EncodeError::RunTooShort);
        }
        self.reserve(3)?;
        self.buf[self.len] = Opcode::ColorRun as u16;
        self.buf[self.len + 1] = color;
        self.buf[self.len + 2] = len - MIN_RUN;
        self.len += 3;
        Ok(())
    }

    /// Emit `len` literal pixels, asking `pixel` for each column in order
    ///
    /// The header is written before the first color is known; column 0 is
    /// back-patched into it once `pixel(0)` returns.
    pub fn raw_run(
        &mut self,
        len: u16,
        mut pixel: impl FnMut(u16) -> u16,
    ) -> Result<(), EncodeError> {
        if len < MIN_RUN {
            return Err(EncodeError::RunTooShort);
        }
        self.reserve(3 + len as usize - 1)?;

        self.buf[self.len] = Opcode::RawRun as u16;
        let first_slot = self.len + 1;
        self.buf[self.len + 2] = len - MIN_RUN;
        self.len += 3;

        self.buf[first_slot] = pixel(0);
        for column in 1..len {
            self.buf[self.len] = pixel(column);
            self.len += 1;
        }
        Ok(())
    }

    /// Emit a single literal pixel
    pub fn raw_1p(&mut self, color: u16) -> Result<(), EncodeError> {
        self.reserve(2)?;
        self.buf[self.len] = Opcode::Raw1p as u16;
        self.buf[self.len + 1] = color;
        self.len += 2;
        Ok(())
    }

    /// Terminate the line with one black pixel and the alignment marker
    ///
    /// Returns the number of 32-bit words the line occupies.
    pub fn finish(mut self) -> Result<usize, EncodeError> {
        let pad = (self.len + 3) % 2;
        self.reserve(3 + pad)?;
        self.raw_1p(0)?;
        self.buf[self.len] = Opcode::EolAlign as u16;
        self.len += 1;
        if pad == 1 {
            self.buf[self.len] = 0;
            self.len += 1;
        }
        Ok(self.len / 2)
    }
}

/// Errors that can occur while decoding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Unknown token where an opcode was expected
    InvalidOpcode(u16),
    /// Tokens ended in the middle of an operation
    Truncated,
    /// Decoded pixels do not fit in the output line
    LineOverflow,
}

/// One decoded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op<'a> {
    ColorRun { color: u16, len: u16 },
    RawRun { first: u16, rest: &'a [u16] },
    Raw1p { color: u16 },
    EolAlign,
}

impl Op<'_> {
    /// Number of pixels this operation produces
    pub fn pixels(&self) -> usize {
        match self {
            Op::ColorRun { len, .. } => *len as usize,
            Op::RawRun { rest, .. } => rest.len() + 1,
            Op::Raw1p { .. } => 1,
            Op::EolAlign => 0,
        }
    }
}

/// Iterator over the operations of one encoded line
///
/// Stops after `EOL_ALIGN`.
pub struct OpIter<'a> {
    tokens: &'a [u16],
    pos: usize,
    done: bool,
}

impl<'a> OpIter<'a> {
    pub fn new(tokens: &'a [u16]) -> Self {
        Self {
            tokens,
            pos: 0,
            done: false,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u16], DecodeError> {
        let end = self.pos + n;
        if end > self.tokens.len() {
            return Err(DecodeError::Truncated);
        }
        let slice = &self.tokens[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn next_op(&mut self) -> Result<Op<'a>, DecodeError> {
        let token = self.take(1)?[0];
        match Opcode::from_token(token).ok_or(DecodeError::InvalidOpcode(token))? {
            Opcode::ColorRun => {
                let args = self.take(2)?;
                Ok(Op::ColorRun {
                    color: args[0],
                    len: args[1] + MIN_RUN,
                })
            }
            Opcode::RawRun => {
                let args = self.take(2)?;
                let len = (args[1] + MIN_RUN) as usize;
                let rest = self.take(len - 1)?;
                Ok(Op::RawRun {
                    first: args[0],
                    rest,
                })
            }
            Opcode::Raw1p => Ok(Op::Raw1p {
                color: self.take(1)?[0],
            }),
            Opcode::EolAlign => Ok(Op::EolAlign),
        }
    }
}

impl<'a> Iterator for OpIter<'a> {
    type Item = Result<Op<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let op = self.next_op();
        if matches!(op, Ok(Op::EolAlign) | Err(_)) {
            self.done = true;
        }
        Some(op)
    }
}

/// Expand an encoded line into literal pixels
///
/// Returns the number of pixels written to `out`.
pub fn expand(tokens: &[u16], out: &mut [u16]) -> Result<usize, DecodeError> {
    let mut x = 0usize;
    for op in OpIter::new(tokens) {
        let op = op?;
        let n = op.pixels();
        if x + n > out.len() {
            return Err(DecodeError::LineOverflow);
        }
        match op {
            Op::ColorRun { color, len } => out[x..x + len as usize].fill(color),
            Op::RawRun { first, rest } => {
                out[x] = first;
                out[x + 1..x + n].copy_from_slice(rest);
            }
            Op::Raw1p { color } => out[x] = color,
            Op::EolAlign => break,
        }
        x += n;
    }
    Ok(x)
}
