//! Scratch buffers for snapshot-then-composite brush application
//!
//! A brush reads and writes the same canvas, so the canvas is first copied
//! into a scratch buffer that the stamp reads from. Scratch buffers are
//! recycled by shape so steady-state painting does not allocate.

use std::collections::HashMap;
use std::ops::Deref;

use surface_chain_config::TexelFormat;

use crate::constants::MAX_SCRATCH_PER_SHAPE;
use crate::texels::TexelBuffer;

/// Key for pooled buffers: (width, height, format)
type ScratchKey = (u32, u32, TexelFormat);

/// A pool of scratch texel buffers keyed by shape
#[derive(Debug)]
pub struct ScratchPool {
    pool: HashMap<ScratchKey, Vec<TexelBuffer>>,
    /// Maximum number of buffers to keep per key
    max_per_key: usize,
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchPool {
    pub fn new() -> Self {
        Self {
            pool: HashMap::new(),
            max_per_key: MAX_SCRATCH_PER_SHAPE,
        }
    }

    /// Take a scratch buffer holding a snapshot of `source`.
    ///
    /// The buffer goes back to the pool when the returned guard is dropped.
    pub fn snapshot(&mut self, source: &TexelBuffer) -> ScratchTexels<'_> {
        let key: ScratchKey = (source.width, source.height, source.format());
        let mut buffer = self
            .pool
            .get_mut(&key)
            .and_then(|buffers| buffers.pop())
            .unwrap_or_else(|| TexelBuffer::new(source.width, source.height, source.format()));
        buffer.copy_from(source);

        ScratchTexels {
            pool: self,
            buffer,
        }
    }

    /// Return a buffer to the pool.
    /// If the pool is full for this shape, the buffer is simply dropped
    fn release(&mut self, buffer: TexelBuffer) {
        let key: ScratchKey = (buffer.width, buffer.height, buffer.format());
        let entry = self.pool.entry(key).or_default();
        if entry.len() < self.max_per_key {
            entry.push(buffer);
        }
    }

    /// Drop all pooled buffers
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Total number of buffers currently in the pool
    pub fn pooled_count(&self) -> usize {
        self.pool.values().map(|buffers| buffers.len()).sum()
    }
}

/// Scoped scratch buffer, released to its pool on drop
pub struct ScratchTexels<'a> {
    pool: &'a mut ScratchPool,
    buffer: TexelBuffer,
}

impl Deref for ScratchTexels<'_> {
    type Target = TexelBuffer;

    fn deref(&self) -> &TexelBuffer {
        &self.buffer
    }
}

impl Drop for ScratchTexels<'_> {
    fn drop(&mut self) {
        // An empty buffer holds no allocation
        let empty = TexelBuffer::new(0, 0, self.buffer.format());
        let buffer = std::mem::replace(&mut self.buffer, empty);
        self.pool.release(buffer);
    }
}
