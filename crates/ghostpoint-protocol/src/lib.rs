//! # ghostpoint-protocol
//!
//! Wire formats for the ghostpoint virtual mouse.
//!
//! The device exposes two reports on one HID interface:
//!
//! - **Pointer input report** (id `0x01`): buttons plus X/Y, read by the host
//!   on every poll. See [`input`].
//! - **Control report** (id `0x02`, vendor usage page `0xFF00`, usage `0x07`):
//!   a feature report a privileged client uses to inject motion and tune the
//!   device. See [`control`].
//!
//! Coordinates are relative signed bytes by default. Enabling the `absolute`
//! feature switches every crate in the build to 16-bit absolute positions.
//!
//! ## Example
//!
//! ```rust
//! use ghostpoint_protocol::prelude::*;
//!
//! let mut buf = [0u8; DwordReport::SIZE];
//! DwordReport::new(ControlCode::Interval, 10_000).encode(&mut buf)?;
//! assert_eq!(buf[0], CONTROL_REPORT_ID);
//! assert_eq!(DwordReport::read_value(&buf)?, 10_000);
//! # Ok::<(), ProtocolError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

pub mod codec;
pub mod control;
pub mod descriptor;
pub mod error;
pub mod input;
pub mod motion;

pub mod prelude;

pub use codec::{ReportReader, ReportWriter};
pub use control::{
    CONTROL_REPORT_MAX_SIZE, ControlCode, ControlHeader, DwordReport, HEADER_SIZE, InfoReport,
    MoveReport, mark_error,
};
pub use descriptor::{DeviceAttributes, HidDescriptor, REPORT_DESCRIPTOR};
pub use error::{ProtocolError, ProtocolResult};
pub use input::{INPUT_REPORT_SIZE, InputReport, write_idle_report, write_motion_report};
pub use motion::{Buttons, COORDINATE_SIZE, Coordinate, MotionMessage, MotionMode, WireCoordinate};

/// Report id of the pointer input report.
pub const POINTER_REPORT_ID: u8 = 0x01;

/// Report id of the control feature report.
pub const CONTROL_REPORT_ID: u8 = 0x02;

/// Vendor usage page hosting the control collection.
pub const VENDOR_USAGE_PAGE: u16 = 0xFF00;

/// Usage of the control collection inside [`VENDOR_USAGE_PAGE`].
pub const CONTROL_USAGE: u8 = 0x07;

/// Info flag bit: the device reports relative motion.
pub const FLAG_RELATIVE: u8 = 0x01;
