//! Control request dispatch.
//!
//! A control request is a get-feature on the control report. The device
//! validates the buffer for the requested code before touching anything,
//! performs the operation, and writes its response back into the same
//! buffer. Requests that are understood but cannot be honored complete with
//! the code byte replaced by `0xFF`.

use ghostpoint_protocol::{
    CONTROL_REPORT_ID, ControlCode, ControlHeader, DwordReport, HEADER_SIZE, MoveReport,
    mark_error,
};
use tracing::{debug, trace, warn};

use crate::device::VirtualMouse;
use crate::error::{DeviceError, DeviceResult, ErrorCategory};

/// Why a well-formed request was answered with the error sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The queue had no free slot; the message was dropped.
    QueueFull,
    /// The requested interval is below the floor; the interval is unchanged.
    IntervalBelowFloor,
}

impl RejectReason {
    /// Classification, in the same terms as [`DeviceError::category`].
    #[must_use]
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::QueueFull => ErrorCategory::ResourceExhausted,
            Self::IntervalBelowFloor => ErrorCategory::Validation,
        }
    }
}

/// Result of a dispatched control request. In both cases the response is
/// already in the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// The request was carried out.
    Completed(ControlCode),
    /// The request was refused; the code byte now reads `0xFF`.
    Rejected(ControlCode, RejectReason),
}

impl ControlOutcome {
    /// Whether the request was carried out.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl VirtualMouse {
    /// Handle a get-feature request.
    ///
    /// `report_id` is the report the host addressed; only the control report
    /// is served. Checks run in order: report id, lifecycle state, header
    /// size, control code, body size. A failing check leaves the buffer and
    /// the device untouched.
    ///
    /// # Errors
    ///
    /// - `UnsupportedReportId` for any report other than the control report
    /// - `NotReady` unless the device is `Started`
    /// - `BufferTooSmall` if the buffer cannot hold the header or the body
    ///   the code requires
    /// - `UnsupportedControlCode` for unknown codes and for the error
    ///   sentinel itself
    pub fn get_feature(&self, report_id: u8, buffer: &mut [u8]) -> DeviceResult<ControlOutcome> {
        if report_id != CONTROL_REPORT_ID {
            debug!(report_id, "get-feature for unsupported report");
            return Err(DeviceError::UnsupportedReportId(report_id));
        }

        let lifecycle = self.lifecycle.read();
        lifecycle.ensure_operational()?;

        let header = ControlHeader::decode(buffer)
            .map_err(|_| DeviceError::buffer_too_small(HEADER_SIZE, buffer.len()))?;
        let code = match header.control_code() {
            Ok(ControlCode::Error) | Err(_) => {
                debug!(code = header.code, "unsupported control code");
                return Err(DeviceError::UnsupportedControlCode(header.code));
            }
            Ok(code) => code,
        };

        let required = code.request_size();
        if buffer.len() < required {
            return Err(DeviceError::buffer_too_small(required, buffer.len()));
        }

        trace!(?code, len = buffer.len(), "control request");
        let outcome = match code {
            ControlCode::Move => self.control_move(buffer)?,
            ControlCode::Info => {
                self.capability.encode(buffer)?;
                ControlOutcome::Completed(code)
            }
            ControlCode::ClearQueue => {
                self.queue.clear();
                debug!("queue cleared");
                ControlOutcome::Completed(code)
            }
            ControlCode::Interval => self.control_interval(buffer)?,
            ControlCode::QueueSize => {
                let depth = u32::try_from(self.queue.depth()).unwrap_or(u32::MAX);
                DwordReport::write_value(buffer, depth)?;
                ControlOutcome::Completed(code)
            }
            ControlCode::Error => return Err(DeviceError::UnsupportedControlCode(header.code)),
        };
        drop(lifecycle);
        Ok(outcome)
    }

    fn control_move(&self, buffer: &mut [u8]) -> DeviceResult<ControlOutcome> {
        let request = MoveReport::decode(buffer)?;
        if self.queue.enqueue(request.message) {
            return Ok(ControlOutcome::Completed(ControlCode::Move));
        }
        warn!(depth = self.queue.depth(), "queue full, move dropped");
        mark_error(buffer)?;
        Ok(ControlOutcome::Rejected(
            ControlCode::Move,
            RejectReason::QueueFull,
        ))
    }

    fn control_interval(&self, buffer: &mut [u8]) -> DeviceResult<ControlOutcome> {
        let requested = DwordReport::read_value(buffer)?;
        let exchange = self.poll.exchange(requested);
        DwordReport::write_value(buffer, exchange.previous_us)?;

        if exchange.accepted {
            debug!(
                previous_us = exchange.previous_us,
                interval_us = requested,
                "poll interval changed"
            );
            return Ok(ControlOutcome::Completed(ControlCode::Interval));
        }

        // Zero is the conventional "just tell me" request; anything else
        // below the floor is a caller mistake.
        if requested != 0 {
            warn!(
                requested_us = requested,
                floor_us = self.poll.floor_us(),
                "interval below floor rejected"
            );
        }
        mark_error(buffer)?;
        Ok(ControlOutcome::Rejected(
            ControlCode::Interval,
            RejectReason::IntervalBelowFloor,
        ))
    }
}
