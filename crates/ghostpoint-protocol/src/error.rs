//! Error types for report encoding and decoding.

use thiserror::Error;

/// Errors produced while reading or writing a report buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The buffer cannot hold the structure being read or written.
    #[error("Buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes the operation needs.
        required: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// The control code byte does not name a known operation.
    #[error("Unknown control code: {0:#04x}")]
    UnknownControlCode(u8),

    /// The report id byte does not match the report being decoded.
    #[error("Unexpected report id: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedReportId {
        /// Report id the decoder expects.
        expected: u8,
        /// Report id found in the buffer.
        actual: u8,
    },
}

impl ProtocolError {
    /// Create a buffer too small error.
    #[must_use]
    pub fn buffer_too_small(required: usize, actual: usize) -> Self {
        Self::BufferTooSmall { required, actual }
    }
}

/// A specialized `Result` type for protocol operations.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
