//! Destination buffer and source cursor used by the codec state machines.
//!
//! Growth policy: a full destination buffer grows to
//! `max(2 * capacity, configured length, MIN_BUFFER_LENGTH)` and never
//! shrinks. Native calls see at most `u32::MAX` bytes per side; larger slices
//! are fed across loop iterations.

use crate::config::MIN_BUFFER_LENGTH;
use crate::error::{BzsError, Result};

/// Clamp a slice length to what one native call accepts.
#[inline]
pub fn consume_size(len: usize) -> usize {
    len.min(u32::MAX as usize)
}

/// Allocates `len` zeroed bytes, reporting failure as [`BzsError::MemError`]
/// instead of aborting.
pub fn try_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    try_resize(&mut data, len)?;
    Ok(data)
}

fn try_resize(data: &mut Vec<u8>, len: usize) -> Result<()> {
    let extra = len.saturating_sub(data.len());
    data.try_reserve_exact(extra).map_err(|_| BzsError::MemError)?;
    data.resize(len, 0);
    Ok(())
}

/// Growable output buffer with a logical used length.
#[derive(Debug)]
pub struct DestinationBuffer {
    data: Vec<u8>,
    used: usize,
    configured: usize,
}

impl DestinationBuffer {
    /// Allocates `initial` bytes (at least [`MIN_BUFFER_LENGTH`]).
    pub fn new(initial: usize) -> Result<Self> {
        let configured = initial.max(MIN_BUFFER_LENGTH);
        Ok(DestinationBuffer {
            data: try_zeroed(configured)?,
            used: 0,
            configured,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    #[inline]
    pub fn spare_len(&self) -> usize {
        self.data.len() - self.used
    }

    /// Writable tail after the used bytes.
    #[inline]
    pub fn spare(&mut self) -> &mut [u8] {
        &mut self.data[self.used..]
    }

    /// Marks `n` more bytes of the spare tail as produced.
    #[inline]
    pub fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.spare_len());
        self.used += n;
    }

    /// Grows the buffer per the growth policy. Returns the new capacity.
    pub fn grow(&mut self) -> Result<usize> {
        let current = self.data.len();
        let target = current
            .saturating_mul(2)
            .max(self.configured)
            .max(MIN_BUFFER_LENGTH);
        try_resize(&mut self.data, target)?;
        crate::displaylevel!(4, "bzs: destination buffer {} -> {} bytes\n", current, target);
        Ok(target)
    }

    /// Grows only when no spare capacity is left.
    #[inline]
    pub fn ensure_spare(&mut self) -> Result<()> {
        if self.spare_len() == 0 {
            self.grow()?;
        }
        Ok(())
    }

    /// Returns the produced bytes and resets the used length; capacity is kept.
    pub fn take(&mut self) -> Vec<u8> {
        let out = self.data[..self.used].to_vec();
        self.used = 0;
        out
    }
}

/// Unconsumed tail of the caller's input within one engine call.
#[derive(Debug, Clone, Copy)]
pub struct SourceCursor<'a> {
    remaining: &'a [u8],
}

impl<'a> SourceCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        SourceCursor { remaining: input }
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.remaining = &self.remaining[n..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_respects_floor() {
        assert_eq!(DestinationBuffer::new(0).unwrap().capacity(), MIN_BUFFER_LENGTH);
        assert_eq!(DestinationBuffer::new(100).unwrap().capacity(), MIN_BUFFER_LENGTH);
        assert_eq!(DestinationBuffer::new(4096).unwrap().capacity(), 4096);
    }

    #[test]
    fn grow_doubles() {
        let mut b = DestinationBuffer::new(512).unwrap();
        assert_eq!(b.grow().unwrap(), 1024);
        assert_eq!(b.grow().unwrap(), 2048);
        assert_eq!(b.capacity(), 2048);
    }

    #[test]
    fn commit_and_take_keep_capacity() {
        let mut b = DestinationBuffer::new(512).unwrap();
        b.spare()[..3].copy_from_slice(b"abc");
        b.commit(3);
        assert_eq!(b.len(), 3);
        assert_eq!(b.spare_len(), 509);
        b.grow().unwrap();
        assert_eq!(b.take(), b"abc");
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 1024);
    }

    #[test]
    fn ensure_spare_only_grows_when_full() {
        let mut b = DestinationBuffer::new(512).unwrap();
        b.ensure_spare().unwrap();
        assert_eq!(b.capacity(), 512);
        b.commit(512);
        b.ensure_spare().unwrap();
        assert_eq!(b.capacity(), 1024);
        assert_eq!(b.spare_len(), 512);
    }

    #[test]
    fn oversized_allocation_is_mem_error() {
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(DestinationBuffer::new(1 << 50), Err(BzsError::MemError)));
        assert!(matches!(try_zeroed(usize::MAX), Err(BzsError::MemError)));
        assert_eq!(try_zeroed(16).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn cursor_advances() {
        let mut c = SourceCursor::new(b"hello");
        c.advance(2);
        assert_eq!(c.remaining(), b"llo");
        c.advance(3);
        assert!(c.is_empty());
    }

    #[test]
    fn consume_size_clamps() {
        assert_eq!(consume_size(10), 10);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(consume_size(usize::MAX), u32::MAX as usize);
    }
}
