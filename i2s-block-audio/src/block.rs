//! Driver-owned block buffers.
//!
//! Storage is a pair of fixed `[i32; N]` arrays living inside the driver, so
//! no allocator is needed. Only the first `len` slots (`channels × block_size`)
//! form the active block exchanged with the peripheral.

use crate::sample::FixedSample;

/// Read/write block buffer pair with capacity `N` samples each.
pub struct BlockBuffers<const N: usize> {
    read: [FixedSample; N],
    write: [FixedSample; N],
    len: usize,
}

impl<const N: usize> BlockBuffers<N> {
    /// Sample capacity of each buffer.
    pub const CAPACITY: usize = N;

    /// Zeroed buffers with an empty active block.
    pub const fn new() -> Self {
        Self {
            read: [0; N],
            write: [0; N],
            len: 0,
        }
    }

    /// Zero both buffers and set the active block length.
    ///
    /// Returns `false`, leaving the buffers untouched, when `len > N`.
    pub fn allocate(&mut self, len: usize) -> bool {
        if len > N {
            return false;
        }
        self.read.fill(0);
        self.write.fill(0);
        self.len = len;
        true
    }

    /// Zero both buffers and drop the active block.
    pub fn release(&mut self) {
        self.read.fill(0);
        self.write.fill(0);
        self.len = 0;
    }

    /// Active block length in samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no block is active.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last received block.
    pub fn read(&self) -> &[FixedSample] {
        &self.read[..self.len]
    }

    /// Receive target for the peripheral.
    pub fn read_mut(&mut self) -> &mut [FixedSample] {
        &mut self.read[..self.len]
    }

    /// Block queued for transmission.
    pub fn write(&self) -> &[FixedSample] {
        &self.write[..self.len]
    }

    /// Block to fill before the next transmission.
    pub fn write_mut(&mut self) -> &mut [FixedSample] {
        &mut self.write[..self.len]
    }
}

impl<const N: usize> Default for BlockBuffers<N> {
    fn default() -> Self {
        Self::new()
    }
}
