//! Host requests outside the control and read paths.
//!
//! Descriptors and attributes are static and served in any lifecycle state,
//! since the host asks for them before it starts the device. Everything in
//! [`HostRequest`] is refused with `NotSupported`.

use core::fmt;

use ghostpoint_protocol::{DeviceAttributes, HidDescriptor, REPORT_DESCRIPTOR};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::device::VirtualMouse;
use crate::error::{DeviceError, DeviceResult};

/// Host requests the device declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostRequest {
    /// Output report write.
    WriteReport,
    /// Feature report write.
    SetFeature,
    /// String descriptor lookup.
    GetString,
    /// Device activation notification.
    Activate,
    /// Device deactivation notification.
    Deactivate,
    /// Any request code the device does not know.
    Other(u32),
}

impl fmt::Display for HostRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteReport => f.write_str("write report"),
            Self::SetFeature => f.write_str("set feature"),
            Self::GetString => f.write_str("get string"),
            Self::Activate => f.write_str("activate"),
            Self::Deactivate => f.write_str("deactivate"),
            Self::Other(code) => write!(f, "request {code:#x}"),
        }
    }
}

fn copy_prefix(source: &[u8], out: &mut [u8]) -> DeviceResult<usize> {
    if out.is_empty() {
        return Err(DeviceError::buffer_too_small(1, 0));
    }
    let len = source.len().min(out.len());
    match (out.get_mut(..len), source.get(..len)) {
        (Some(dst), Some(src)) => {
            dst.copy_from_slice(src);
            Ok(len)
        }
        _ => Err(DeviceError::buffer_too_small(len, out.len())),
    }
}

impl VirtualMouse {
    /// Copy the HID descriptor into `out`, truncated to its length.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `out` is empty.
    pub fn hid_descriptor(&self, out: &mut [u8]) -> DeviceResult<usize> {
        copy_prefix(&HidDescriptor::for_build().to_bytes(), out)
    }

    /// Copy the report descriptor into `out`, truncated to its length.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `out` is empty.
    pub fn report_descriptor(&self, out: &mut [u8]) -> DeviceResult<usize> {
        copy_prefix(REPORT_DESCRIPTOR, out)
    }

    /// Vendor, product and version ids.
    #[must_use]
    pub fn attributes(&self) -> DeviceAttributes {
        self.attributes
    }

    /// Write the attributes record into `out`.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `out` cannot hold the whole record.
    pub fn device_attributes(&self, out: &mut [u8]) -> DeviceResult<usize> {
        Ok(self.attributes.encode(out)?)
    }

    /// Refuse a request the device does not implement.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub fn unsupported_request(&self, request: HostRequest) -> DeviceResult<usize> {
        debug!(%request, "host request not supported");
        Err(DeviceError::NotSupported(request))
    }
}
