/// Forward-reading cursor over an immutable image buffer

use crate::error::{Result, VzError};

/// A read position into an immutable byte buffer
///
/// Decoders own the cursor through `&mut` for the whole decode. Reads
/// move forward; the only way back is `set_position` or a failed
/// `speculate` attempt.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Total buffer length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Is the underlying buffer empty?
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position (clamped to the buffer end)
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// Number of bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Has the cursor consumed the whole buffer?
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Consume exactly `n` bytes
    ///
    /// Fails with `TruncatedRead` (without moving) if fewer remain.
    pub fn advance(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(VzError::truncated(self.pos, n, self.remaining()));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    /// Consume up to and including the first `byte`, or to the end of the buffer
    pub fn advance_until(&mut self, byte: u8) -> &'a [u8] {
        let start = self.pos;
        let end = match self.data[start..].iter().position(|&b| b == byte) {
            Some(i) => start + i + 1,
            None => self.data.len(),
        };
        self.pos = end;
        &self.data[start..end]
    }

    /// Consume everything that is left
    pub fn advance_to_end(&mut self) -> &'a [u8] {
        let start = self.pos;
        self.pos = self.data.len();
        &self.data[start..]
    }

    /// Look at up to `n` bytes without consuming them
    pub fn peek(&self, n: usize) -> &'a [u8] {
        let end = (self.pos + n).min(self.data.len());
        &self.data[self.pos..end]
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.advance(1)?[0])
    }

    /// Read a little-endian 16-bit value
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.advance(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Run a speculative read
    ///
    /// If `attempt` returns `None` the cursor goes back to where it was, so
    /// a failed match never leaves the position advanced.
    pub fn speculate<T, F>(&mut self, attempt: F) -> Option<T>
    where
        F: FnOnce(&mut Self) -> Option<T>,
    {
        let saved = self.pos;
        let result = attempt(self);
        if result.is_none() {
            self.pos = saved;
        }
        result
    }
}
