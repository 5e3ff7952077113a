//! Pointer input reports.
//!
//! Layout: `[report id 0x01][buttons][x][y]`, with x/y one byte each in
//! relative mode and little-endian `u16` in absolute mode. An idle report is
//! the report id followed by zeros: no buttons, no motion.

use crate::POINTER_REPORT_ID;
use crate::codec::{ReportReader, ReportWriter};
use crate::error::{ProtocolError, ProtocolResult};
use crate::motion::{COORDINATE_SIZE, MotionMessage};

/// Input report size in this build, report id included.
pub const INPUT_REPORT_SIZE: usize = 1 + 1 + 2 * COORDINATE_SIZE;

/// A decoded pointer input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReport {
    /// Report id byte.
    pub report_id: u8,
    /// Buttons and coordinates.
    pub message: MotionMessage,
}

impl InputReport {
    /// Decode an input report.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedReportId` unless byte 0 is the pointer report id,
    /// or `BufferTooSmall` for short buffers.
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < INPUT_REPORT_SIZE {
            return Err(ProtocolError::buffer_too_small(
                INPUT_REPORT_SIZE,
                data.len(),
            ));
        }
        let mut reader = ReportReader::new(data);
        let report_id = reader.read_u8()?;
        if report_id != POINTER_REPORT_ID {
            return Err(ProtocolError::UnexpectedReportId {
                expected: POINTER_REPORT_ID,
                actual: report_id,
            });
        }
        Ok(Self {
            report_id,
            message: MotionMessage::read_body(&mut reader)?,
        })
    }

    /// Whether this carries no buttons and no motion.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.message == MotionMessage::default()
    }
}

/// Format one motion message as an input report.
///
/// Returns the number of bytes written, always [`INPUT_REPORT_SIZE`].
///
/// # Errors
///
/// Returns `BufferTooSmall` if `out` cannot hold a full report; nothing is
/// written in that case.
pub fn write_motion_report(out: &mut [u8], message: &MotionMessage) -> ProtocolResult<usize> {
    if out.len() < INPUT_REPORT_SIZE {
        return Err(ProtocolError::buffer_too_small(
            INPUT_REPORT_SIZE,
            out.len(),
        ));
    }
    let mut writer = ReportWriter::new(out);
    writer.write_u8(POINTER_REPORT_ID)?;
    message.write_body(&mut writer)?;
    Ok(writer.written())
}

/// Format an idle report: pointer report id, everything else zero.
///
/// # Errors
///
/// Returns `BufferTooSmall` if `out` cannot hold a full report.
pub fn write_idle_report(out: &mut [u8]) -> ProtocolResult<usize> {
    write_motion_report(out, &MotionMessage::default())
}
