//! Pooled scratch buffers
//!
//! Pack assembles the whole encoding in a scratch buffer before handing it
//! to the sink. Buffers up to a threshold (64 KiB by default) are recycled
//! through this pool; larger ones are allocated per call and dropped.
//!
//! # Thread Safety
//!
//! Checkout pops a buffer under a `parking_lot` mutex, so no two calls ever
//! hold the same buffer. The returned [`PooledBuffer`] gives it back on
//! drop, which covers every exit path including errors.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Largest encoding that uses a pooled buffer
pub const DEFAULT_THRESHOLD: usize = 64 * 1024;

/// Most idle buffers kept around
pub const DEFAULT_MAX_POOLED: usize = 32;

/// Recycled scratch buffers
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    threshold: usize,
    max_pooled: usize,
}

impl BufferPool {
    /// Pool with the default threshold and capacity
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_THRESHOLD, DEFAULT_MAX_POOLED)
    }

    /// Pool with an explicit size threshold and idle-buffer cap
    pub fn with_limits(threshold: usize, max_pooled: usize) -> Self {
        BufferPool {
            buffers: Mutex::new(Vec::new()),
            threshold,
            max_pooled,
        }
    }

    /// Check out an empty buffer with room for `size` bytes
    pub fn checkout(&self, size: usize) -> PooledBuffer<'_> {
        if size > self.threshold {
            trace!(size, "unpooled scratch buffer");
            return PooledBuffer {
                buf: Vec::with_capacity(size),
                pool: None,
            };
        }

        let mut buf = self.buffers.lock().pop().unwrap_or_default();
        buf.clear();
        buf.reserve(size);
        PooledBuffer {
            buf,
            pool: Some(self),
        }
    }

    /// Idle buffers currently held
    pub fn available(&self) -> usize {
        self.buffers.lock().len()
    }

    /// Size threshold for pooling
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut buffers = self.buffers.lock();
        if buffers.len() < self.max_pooled {
            buffers.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A checked-out buffer; returns to its pool on drop
#[derive(Debug)]
pub struct PooledBuffer<'p> {
    buf: Vec<u8>,
    pool: Option<&'p BufferPool>,
}

impl PooledBuffer<'_> {
    /// Whether this buffer goes back to a pool
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool {
            pool.give_back(std::mem::take(&mut self.buf));
        }
    }
}
