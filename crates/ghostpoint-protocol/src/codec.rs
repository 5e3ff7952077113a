//! Little-endian cursors over borrowed report buffers.
//!
//! Control and input reports are written in place into buffers owned by the
//! host, so neither cursor allocates. Every read and write is bounds checked
//! and reports [`ProtocolError::BufferTooSmall`] instead of panicking.

use crate::error::{ProtocolError, ProtocolResult};

/// Sequential reader over a report buffer.
#[derive(Debug, Clone)]
pub struct ReportReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ReportReader<'a> {
    /// Start reading at offset 0.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes left after the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Current cursor offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn take<const N: usize>(&mut self) -> ProtocolResult<[u8; N]> {
        let end = self.position.saturating_add(N);
        let bytes = self
            .data
            .get(self.position..end)
            .ok_or_else(|| ProtocolError::buffer_too_small(end, self.data.len()))?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.position = end;
        Ok(out)
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` at the end of the buffer.
    pub fn read_u8(&mut self) -> ProtocolResult<u8> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    /// Read one signed byte.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` at the end of the buffer.
    pub fn read_i8(&mut self) -> ProtocolResult<i8> {
        Ok(i8::from_le_bytes(self.take::<1>()?))
    }

    /// Read a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if fewer than 2 bytes remain.
    pub fn read_u16_le(&mut self) -> ProtocolResult<u16> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> ProtocolResult<u32> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }
}

/// Sequential writer into a caller-owned report buffer.
#[derive(Debug)]
pub struct ReportWriter<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> ReportWriter<'a> {
    /// Start writing at offset 0.
    #[must_use]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.position
    }

    fn put(&mut self, bytes: &[u8]) -> ProtocolResult<()> {
        let end = self.position.saturating_add(bytes.len());
        let actual = self.buffer.len();
        let slot = self
            .buffer
            .get_mut(self.position..end)
            .ok_or_else(|| ProtocolError::buffer_too_small(end, actual))?;
        slot.copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }

    /// Write one byte.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` at the end of the buffer.
    pub fn write_u8(&mut self, value: u8) -> ProtocolResult<()> {
        self.put(&[value])
    }

    /// Write one signed byte.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` at the end of the buffer.
    pub fn write_i8(&mut self, value: i8) -> ProtocolResult<()> {
        self.put(&value.to_le_bytes())
    }

    /// Write a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if fewer than 2 bytes remain.
    pub fn write_u16_le(&mut self, value: u16) -> ProtocolResult<()> {
        self.put(&value.to_le_bytes())
    }

    /// Write a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if fewer than 4 bytes remain.
    pub fn write_u32_le(&mut self, value: u32) -> ProtocolResult<()> {
        self.put(&value.to_le_bytes())
    }
}
