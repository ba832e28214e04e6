//! Indexed framebuffer shared between capture and composition
//!
//! Capture writes and composition reads concurrently from different cores
//! without locking. Each cell is a single relaxed atomic byte, so a reader
//! may see a frame that is part old and part new, but never a torn cell.

use core::sync::atomic::{AtomicU8, Ordering};

use super::FB_LEN;

/// Storage for 2-bit color indices
pub trait FrameStore {
    /// Number of cells
    fn len(&self) -> usize;

    /// Write a cell; out-of-range indices are ignored
    fn store(&self, index: usize, value: u8);

    /// Read a cell; out-of-range indices read as 0
    fn load(&self, index: usize) -> u8;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lock-free 144×160 framebuffer
pub struct FrameBuffer {
    cells: [AtomicU8; FB_LEN],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            cells: [const { AtomicU8::new(0) }; FB_LEN],
        }
    }

    /// Set every cell to one index
    pub fn fill(&self, value: u8) {
        for cell in &self.cells {
            cell.store(value & 0x3, Ordering::Relaxed);
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStore for FrameBuffer {
    fn len(&self) -> usize {
        FB_LEN
    }

    #[inline(always)]
    fn store(&self, index: usize, value: u8) {
        if let Some(cell) = self.cells.get(index) {
            cell.store(value & 0x3, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    fn load(&self, index: usize) -> u8 {
        self.cells
            .get(index)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}
