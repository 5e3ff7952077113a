//! Static capability announcement: report descriptor, HID descriptor and
//! device attributes.
//!
//! The report descriptor declares two top-level collections. The first is a
//! standard mouse on report id 1 (three buttons, X and Y). The second is a
//! vendor collection on usage page `0xFF00`, usage `0x07`, exposing the
//! control report (id 2) as a feature report large enough for the biggest
//! control request.

use serde::{Deserialize, Serialize};

use crate::codec::ReportWriter;
use crate::control::CONTROL_REPORT_MAX_SIZE;
use crate::error::{ProtocolError, ProtocolResult};
use crate::{CONTROL_REPORT_ID, CONTROL_USAGE, POINTER_REPORT_ID, VENDOR_USAGE_PAGE};

const VENDOR_PAGE: [u8; 2] = VENDOR_USAGE_PAGE.to_le_bytes();

// Bytes after the report id in the feature report.
const CONTROL_PAYLOAD: u8 = (CONTROL_REPORT_MAX_SIZE - 1) as u8;

macro_rules! mouse_descriptor {
    ($($axes:expr),+ $(,)?) => {
        [
            0x05, 0x01, // Usage Page (Generic Desktop)
            0x09, 0x02, // Usage (Mouse)
            0xA1, 0x01, // Collection (Application)
            0x85, POINTER_REPORT_ID,
            0x09, 0x01, //   Usage (Pointer)
            0xA1, 0x00, //   Collection (Physical)
            0x05, 0x09, //     Usage Page (Button)
            0x19, 0x01, //     Usage Minimum (1)
            0x29, 0x03, //     Usage Maximum (3)
            0x15, 0x00, //     Logical Minimum (0)
            0x25, 0x01, //     Logical Maximum (1)
            0x95, 0x03, //     Report Count (3)
            0x75, 0x01, //     Report Size (1)
            0x81, 0x02, //     Input (Data, Var, Abs)
            0x95, 0x01, //     Report Count (1)
            0x75, 0x05, //     Report Size (5)
            0x81, 0x03, //     Input (Const) padding
            0x05, 0x01, //     Usage Page (Generic Desktop)
            0x09, 0x30, //     Usage (X)
            0x09, 0x31, //     Usage (Y)
            $($axes,)+
            0xC0,       //   End Collection
            0xC0,       // End Collection
            0x06, VENDOR_PAGE[0], VENDOR_PAGE[1],
            0x09, CONTROL_USAGE,
            0xA1, 0x01, // Collection (Application)
            0x85, CONTROL_REPORT_ID,
            0x15, 0x00, //   Logical Minimum (0)
            0x26, 0xFF, 0x00, // Logical Maximum (255)
            0x75, 0x08, //   Report Size (8)
            0x95, CONTROL_PAYLOAD,
            0x09, CONTROL_USAGE,
            0xB1, 0x02, //   Feature (Data, Var, Abs)
            0xC0,       // End Collection
        ]
    };
}

#[cfg(not(feature = "absolute"))]
const DESCRIPTOR: &[u8] = &mouse_descriptor![
    0x15, 0x81, // Logical Minimum (-127)
    0x25, 0x7F, // Logical Maximum (127)
    0x75, 0x08, // Report Size (8)
    0x95, 0x02, // Report Count (2)
    0x81, 0x06, // Input (Data, Var, Rel)
];

#[cfg(feature = "absolute")]
const DESCRIPTOR: &[u8] = &mouse_descriptor![
    0x16, 0x01, 0x00, // Logical Minimum (1)
    0x26, 0xFF, 0x7F, // Logical Maximum (32767)
    0x75, 0x10, // Report Size (16)
    0x95, 0x02, // Report Count (2)
    0x81, 0x02, // Input (Data, Var, Abs)
];

/// Report descriptor for the build mode.
pub const REPORT_DESCRIPTOR: &[u8] = DESCRIPTOR;

/// Class descriptor type for a HID descriptor.
pub const HID_DESCRIPTOR_TYPE: u8 = 0x21;

/// Class descriptor type for a report descriptor.
pub const REPORT_DESCRIPTOR_TYPE: u8 = 0x22;

/// HID class descriptor pointing at [`REPORT_DESCRIPTOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HidDescriptor {
    /// HID specification release, BCD.
    pub bcd_hid: u16,
    /// Country code, 0 for not localized.
    pub country_code: u8,
    /// Length of the report descriptor.
    pub report_length: u16,
}

impl HidDescriptor {
    /// Encoded length.
    pub const SIZE: usize = 9;

    /// Descriptor for this build.
    #[must_use]
    pub fn for_build() -> Self {
        Self {
            bcd_hid: 0x0100,
            country_code: 0,
            report_length: u16::try_from(REPORT_DESCRIPTOR.len()).unwrap_or(u16::MAX),
        }
    }

    /// Encode into exactly [`Self::SIZE`] bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let [bcd_lo, bcd_hi] = self.bcd_hid.to_le_bytes();
        let [len_lo, len_hi] = self.report_length.to_le_bytes();
        [
            9, // bLength, mirrors SIZE
            HID_DESCRIPTOR_TYPE,
            bcd_lo,
            bcd_hi,
            self.country_code,
            1, // one class descriptor follows
            REPORT_DESCRIPTOR_TYPE,
            len_lo,
            len_hi,
        ]
    }
}

/// Identity the device presents to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    /// USB vendor id.
    pub vendor_id: u16,
    /// USB product id.
    pub product_id: u16,
    /// Device release number.
    pub version: u16,
}

impl Default for DeviceAttributes {
    fn default() -> Self {
        Self {
            vendor_id: 0xF00D,
            product_id: 0xDEAD,
            version: 0x0102,
        }
    }
}

impl DeviceAttributes {
    /// Encoded length: vendor, product, version.
    pub const SIZE: usize = 6;

    /// Write the attributes record.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `out` is shorter than [`Self::SIZE`].
    pub fn encode(&self, out: &mut [u8]) -> ProtocolResult<usize> {
        if out.len() < Self::SIZE {
            return Err(ProtocolError::buffer_too_small(Self::SIZE, out.len()));
        }
        let mut writer = ReportWriter::new(out);
        writer.write_u16_le(self.vendor_id)?;
        writer.write_u16_le(self.product_id)?;
        writer.write_u16_le(self.version)?;
        Ok(writer.written())
    }
}
