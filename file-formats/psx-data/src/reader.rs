//! Bounds-checked byte reading over in-memory buffers.
//!
//! Every asset format handled by this workspace is a tightly packed
//! little-endian layout, often with records whose stride is declared by the
//! record itself. The [`Cursor`] keeps explicit position state and refuses
//! to read past the end of its slice, returning
//! [`DataError::UnexpectedEof`] instead.

use crate::error::{DataError, Result};

/// Trait for reading little-endian binary data from a byte source
pub trait ByteRead {
    /// Read a single unsigned 8-bit integer
    fn read_u8(&mut self) -> Result<u8>;

    /// Read an unsigned 16-bit integer, little-endian
    fn read_u16_le(&mut self) -> Result<u16>;

    /// Read a signed 16-bit integer, little-endian
    fn read_i16_le(&mut self) -> Result<i16>;

    /// Read an unsigned 32-bit integer, little-endian
    fn read_u32_le(&mut self) -> Result<u32>;

    /// Read a signed 32-bit integer, little-endian
    fn read_i32_le(&mut self) -> Result<i32>;

    /// Read exactly `n` bytes
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Advance the position by `n` bytes without returning them
    fn skip(&mut self, n: usize) -> Result<()>;
}

/// A cursor over a byte slice with explicit position state
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the beginning of the data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current position from the start of the data
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether the cursor has consumed the whole buffer
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move the cursor to an absolute offset
    pub fn seek_to(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(DataError::UnexpectedEof {
                offset: self.position,
                wanted: offset - self.data.len(),
            });
        }
        self.position = offset;
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DataError::UnexpectedEof {
                offset: self.position,
                wanted: n - self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }
}

impl ByteRead for Cursor<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_i16_le(&mut self) -> Result<i16> {
        let bytes = self.take(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32_le(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n)?;
        Ok(())
    }
}
