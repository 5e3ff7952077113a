//! Control report layouts.
//!
//! Every control report starts with a two byte header: the control report id
//! followed by a [`ControlCode`]. The body depends on the code:
//!
//! ```text
//! Move        [id][0x00][buttons][x][y]          x/y sized per mode
//! Info        [id][0x01][flags][capacity: u32]
//! ClearQueue  [id][0x02]
//! Interval    [id][0x03][value: u32]
//! QueueSize   [id][0x04][value: u32]
//! ```
//!
//! All multi-byte fields are little-endian. Responses are written back into
//! the request buffer; a failed request has its code byte replaced with
//! [`ControlCode::Error`].

use serde::{Deserialize, Serialize};

use crate::codec::{ReportReader, ReportWriter};
use crate::error::{ProtocolError, ProtocolResult};
use crate::motion::{COORDINATE_SIZE, MotionMessage, MotionMode};
use crate::{CONTROL_REPORT_ID, FLAG_RELATIVE};

/// Size of the id + code header.
pub const HEADER_SIZE: usize = 2;

/// Offset of the control code byte.
pub const CODE_OFFSET: usize = 1;

/// Operation carried by a control report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlCode {
    /// Queue one motion message.
    Move = 0x00,
    /// Read the capability record.
    Info = 0x01,
    /// Drop every queued message.
    ClearQueue = 0x02,
    /// Exchange the polling interval.
    Interval = 0x03,
    /// Read the current queue depth.
    QueueSize = 0x04,
    /// Failure sentinel written into responses.
    Error = 0xFF,
}

impl ControlCode {
    /// Smallest buffer that can carry this operation.
    #[must_use]
    pub const fn request_size(self) -> usize {
        match self {
            Self::Move => MoveReport::SIZE,
            Self::Info => InfoReport::SIZE,
            Self::Interval | Self::QueueSize => DwordReport::SIZE,
            Self::ClearQueue | Self::Error => HEADER_SIZE,
        }
    }

    /// Raw code byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ControlCode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x00 => Ok(Self::Move),
            0x01 => Ok(Self::Info),
            0x02 => Ok(Self::ClearQueue),
            0x03 => Ok(Self::Interval),
            0x04 => Ok(Self::QueueSize),
            0xFF => Ok(ControlCode::Error),
            other => Err(ProtocolError::UnknownControlCode(other)),
        }
    }
}

/// Largest control report in this build.
pub const CONTROL_REPORT_MAX_SIZE: usize = {
    let mut max = MoveReport::SIZE;
    if InfoReport::SIZE > max {
        max = InfoReport::SIZE;
    }
    if DwordReport::SIZE > max {
        max = DwordReport::SIZE;
    }
    max
};

/// Control report header. The code is kept raw so unknown codes can be
/// reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlHeader {
    /// Report id byte.
    pub report_id: u8,
    /// Raw control code byte.
    pub code: u8,
}

impl ControlHeader {
    /// Decode the header at the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`HEADER_SIZE`].
    pub fn decode(buf: &[u8]) -> ProtocolResult<Self> {
        let mut reader = ReportReader::new(buf);
        Ok(Self {
            report_id: reader.read_u8()?,
            code: reader.read_u8()?,
        })
    }

    /// Interpret the code byte.
    ///
    /// # Errors
    ///
    /// Returns `UnknownControlCode` for bytes outside [`ControlCode`].
    pub fn control_code(&self) -> ProtocolResult<ControlCode> {
        ControlCode::try_from(self.code)
    }

    fn write(writer: &mut ReportWriter<'_>, code: ControlCode) -> ProtocolResult<()> {
        writer.write_u8(CONTROL_REPORT_ID)?;
        writer.write_u8(code.as_u8())
    }

    fn expect_control(reader: &mut ReportReader<'_>) -> ProtocolResult<u8> {
        let report_id = reader.read_u8()?;
        if report_id != CONTROL_REPORT_ID {
            return Err(ProtocolError::UnexpectedReportId {
                expected: CONTROL_REPORT_ID,
                actual: report_id,
            });
        }
        reader.read_u8()
    }
}

/// Replace the code byte of a response with [`ControlCode::Error`].
///
/// # Errors
///
/// Returns `BufferTooSmall` if `buf` has no code byte.
pub fn mark_error(buf: &mut [u8]) -> ProtocolResult<()> {
    let actual = buf.len();
    let code = buf
        .get_mut(CODE_OFFSET)
        .ok_or_else(|| ProtocolError::buffer_too_small(HEADER_SIZE, actual))?;
    *code = ControlCode::Error.as_u8();
    Ok(())
}

/// Move request: one motion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveReport {
    /// Message to queue.
    pub message: MotionMessage,
}

impl MoveReport {
    /// Encoded size in this build.
    pub const SIZE: usize = HEADER_SIZE + 1 + 2 * COORDINATE_SIZE;

    /// Decode the body of a move report. The header is not checked.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`Self::SIZE`].
    pub fn decode(buf: &[u8]) -> ProtocolResult<Self> {
        if buf.len() < Self::SIZE {
            return Err(ProtocolError::buffer_too_small(Self::SIZE, buf.len()));
        }
        let mut reader = ReportReader::new(buf);
        reader.read_u8()?;
        reader.read_u8()?;
        Ok(Self {
            message: MotionMessage::read_body(&mut reader)?,
        })
    }

    /// Encode a complete move request.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`Self::SIZE`].
    pub fn encode(&self, buf: &mut [u8]) -> ProtocolResult<usize> {
        if buf.len() < Self::SIZE {
            return Err(ProtocolError::buffer_too_small(Self::SIZE, buf.len()));
        }
        let mut writer = ReportWriter::new(buf);
        ControlHeader::write(&mut writer, ControlCode::Move)?;
        self.message.write_body(&mut writer)?;
        Ok(writer.written())
    }
}

/// Capability record returned by Info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoReport {
    /// Mode flags. Bit 0 set means relative.
    pub flags: u8,
    /// Total ring capacity (usable capacity is one less).
    pub queue_capacity: u32,
}

impl InfoReport {
    /// Encoded size.
    pub const SIZE: usize = HEADER_SIZE + 1 + 4;

    /// Build the record for a mode and ring capacity.
    #[must_use]
    pub const fn new(mode: MotionMode, queue_capacity: u32) -> Self {
        let flags = if mode.is_relative() { FLAG_RELATIVE } else { 0 };
        Self {
            flags,
            queue_capacity,
        }
    }

    /// Whether the device reports relative motion.
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        self.flags & FLAG_RELATIVE != 0
    }

    /// Mode announced by the flags.
    #[must_use]
    pub const fn mode(&self) -> MotionMode {
        if self.is_relative() {
            MotionMode::Relative
        } else {
            MotionMode::Absolute
        }
    }

    /// Decode a complete info response.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` for short buffers and `UnexpectedReportId`
    /// if the buffer is not a control report.
    pub fn decode(buf: &[u8]) -> ProtocolResult<Self> {
        let mut reader = ReportReader::new(buf);
        ControlHeader::expect_control(&mut reader)?;
        Ok(Self {
            flags: reader.read_u8()?,
            queue_capacity: reader.read_u32_le()?,
        })
    }

    /// Encode a complete info report, header included.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`Self::SIZE`].
    pub fn encode(&self, buf: &mut [u8]) -> ProtocolResult<usize> {
        if buf.len() < Self::SIZE {
            return Err(ProtocolError::buffer_too_small(Self::SIZE, buf.len()));
        }
        let mut writer = ReportWriter::new(buf);
        ControlHeader::write(&mut writer, ControlCode::Info)?;
        writer.write_u8(self.flags)?;
        writer.write_u32_le(self.queue_capacity)?;
        Ok(writer.written())
    }
}

/// Request or response carrying a single `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwordReport {
    /// Raw code byte. [`ControlCode::Error`] marks a rejected request.
    pub code: u8,
    /// Payload.
    pub value: u32,
}

impl DwordReport {
    /// Encoded size.
    pub const SIZE: usize = HEADER_SIZE + 4;

    const VALUE_OFFSET: usize = HEADER_SIZE;

    /// Build a request.
    #[must_use]
    pub const fn new(code: ControlCode, value: u32) -> Self {
        Self {
            code: code.as_u8(),
            value,
        }
    }

    /// Whether the device replaced the code with the error sentinel.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code == ControlCode::Error.as_u8()
    }

    /// Decode a complete dword report.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` for short buffers and `UnexpectedReportId`
    /// if the buffer is not a control report.
    pub fn decode(buf: &[u8]) -> ProtocolResult<Self> {
        let mut reader = ReportReader::new(buf);
        let code = ControlHeader::expect_control(&mut reader)?;
        Ok(Self {
            code,
            value: reader.read_u32_le()?,
        })
    }

    /// Encode a complete dword report.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`Self::SIZE`].
    pub fn encode(&self, buf: &mut [u8]) -> ProtocolResult<usize> {
        if buf.len() < Self::SIZE {
            return Err(ProtocolError::buffer_too_small(Self::SIZE, buf.len()));
        }
        let mut writer = ReportWriter::new(buf);
        writer.write_u8(CONTROL_REPORT_ID)?;
        writer.write_u8(self.code)?;
        writer.write_u32_le(self.value)?;
        Ok(writer.written())
    }

    /// Read only the value field of a dword report in place.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`Self::SIZE`].
    pub fn read_value(buf: &[u8]) -> ProtocolResult<u32> {
        let body = buf
            .get(Self::VALUE_OFFSET..)
            .ok_or_else(|| ProtocolError::buffer_too_small(Self::SIZE, buf.len()))?;
        ReportReader::new(body)
            .read_u32_le()
            .map_err(|_| ProtocolError::buffer_too_small(Self::SIZE, buf.len()))
    }

    /// Overwrite only the value field of a dword report in place.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `buf` is shorter than [`Self::SIZE`].
    pub fn write_value(buf: &mut [u8], value: u32) -> ProtocolResult<()> {
        let actual = buf.len();
        let body = buf
            .get_mut(Self::VALUE_OFFSET..Self::SIZE)
            .ok_or_else(|| ProtocolError::buffer_too_small(Self::SIZE, actual))?;
        body.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Buttons;

    #[test]
    fn test_control_code_roundtrip() {
        for code in [
            ControlCode::Move,
            ControlCode::Info,
            ControlCode::ClearQueue,
            ControlCode::Interval,
            ControlCode::QueueSize,
            ControlCode::Error,
        ] {
            assert_eq!(ControlCode::try_from(code.as_u8()), Ok(code));
        }
        assert_eq!(
            ControlCode::try_from(0x05),
            Err(ProtocolError::UnknownControlCode(0x05))
        );
    }

    #[test]
    fn test_report_sizes() {
        assert_eq!(InfoReport::SIZE, 7);
        assert_eq!(DwordReport::SIZE, 6);
        assert_eq!(ControlCode::ClearQueue.request_size(), HEADER_SIZE);
        assert_eq!(ControlCode::Interval.request_size(), 6);
        assert_eq!(CONTROL_REPORT_MAX_SIZE, 7);
        #[cfg(not(feature = "absolute"))]
        assert_eq!(MoveReport::SIZE, 5);
        #[cfg(feature = "absolute")]
        assert_eq!(MoveReport::SIZE, 7);
    }

    #[test]
    fn test_header_decode() -> ProtocolResult<()> {
        let header = ControlHeader::decode(&[0x02, 0x03, 0xAA])?;
        assert_eq!(header.report_id, CONTROL_REPORT_ID);
        assert_eq!(header.control_code()?, ControlCode::Interval);
        assert!(ControlHeader::decode(&[0x02]).is_err());
        Ok(())
    }

    #[test]
    fn test_move_report_layout() -> ProtocolResult<()> {
        let report = MoveReport {
            message: MotionMessage::new(1, 2, Buttons::LEFT),
        };
        let mut buf = [0u8; MoveReport::SIZE];
        assert_eq!(report.encode(&mut buf)?, MoveReport::SIZE);
        assert_eq!(buf.get(..3), Some(&[0x02, 0x00, 0x01][..]));
        assert_eq!(MoveReport::decode(&buf)?, report);
        Ok(())
    }

    #[test]
    fn test_move_decode_short_buffer() {
        let buf = [0x02, 0x00, 0x01];
        assert_eq!(
            MoveReport::decode(&buf),
            Err(ProtocolError::buffer_too_small(MoveReport::SIZE, 3))
        );
    }

    #[test]
    fn test_info_report_layout() -> ProtocolResult<()> {
        let info = InfoReport::new(MotionMode::Relative, 1024);
        let mut buf = [0u8; InfoReport::SIZE];
        info.encode(&mut buf)?;
        assert_eq!(buf, [0x02, 0x01, 0x01, 0x00, 0x04, 0x00, 0x00]);
        let decoded = InfoReport::decode(&buf)?;
        assert!(decoded.is_relative());
        assert_eq!(decoded.queue_capacity, 1024);

        let absolute = InfoReport::new(MotionMode::Absolute, 4);
        assert_eq!(absolute.flags, 0);
        assert_eq!(absolute.mode(), MotionMode::Absolute);
        Ok(())
    }

    #[test]
    fn test_dword_in_place() -> ProtocolResult<()> {
        let mut buf = [0u8; DwordReport::SIZE];
        DwordReport::new(ControlCode::Interval, 10_000).encode(&mut buf)?;
        assert_eq!(DwordReport::read_value(&buf)?, 10_000);

        DwordReport::write_value(&mut buf, 8000)?;
        mark_error(&mut buf)?;
        let response = DwordReport::decode(&buf)?;
        assert!(response.is_error());
        assert_eq!(response.value, 8000);
        Ok(())
    }

    #[test]
    fn test_dword_rejects_foreign_report_id() {
        let buf = [0x01, 0x03, 0, 0, 0, 0];
        assert_eq!(
            DwordReport::decode(&buf),
            Err(ProtocolError::UnexpectedReportId {
                expected: 0x02,
                actual: 0x01
            })
        );
    }

    #[test]
    fn test_mark_error_needs_code_byte() {
        let mut buf = [0x02];
        assert!(mark_error(&mut buf).is_err());
        assert_eq!(buf, [0x02]);
    }
}
