//! Prelude for ghostpoint-protocol.
//!
//! Re-exports the report types and ids most callers need.

pub use crate::control::{
    ControlCode, ControlHeader, DwordReport, HEADER_SIZE, InfoReport, MoveReport, mark_error,
};
pub use crate::descriptor::{DeviceAttributes, HidDescriptor, REPORT_DESCRIPTOR};
pub use crate::error::{ProtocolError, ProtocolResult};
pub use crate::input::{INPUT_REPORT_SIZE, InputReport, write_idle_report, write_motion_report};
pub use crate::motion::{Buttons, Coordinate, MotionMessage, MotionMode, WireCoordinate};
pub use crate::{CONTROL_REPORT_ID, FLAG_RELATIVE, POINTER_REPORT_ID};
