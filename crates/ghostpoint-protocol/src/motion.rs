//! Motion messages and the build-time pointer mode.
//!
//! The device reports either relative deltas (signed bytes) or absolute
//! positions (16-bit). The mode is chosen with the `absolute` cargo feature
//! and cannot change at runtime; [`Coordinate`] and [`MotionMode::BUILD`]
//! follow it.

use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::codec::{ReportReader, ReportWriter};
use crate::error::ProtocolResult;

/// Coordinate type carried by motion messages in this build.
#[cfg(not(feature = "absolute"))]
pub type Coordinate = i8;

/// Coordinate type carried by motion messages in this build.
#[cfg(feature = "absolute")]
pub type Coordinate = u16;

/// Wire size of one coordinate in this build.
pub const COORDINATE_SIZE: usize = core::mem::size_of::<Coordinate>();

/// Pointer reporting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Signed 8-bit deltas in [-127, 127].
    Relative,
    /// 16-bit positions in [1, 32767].
    Absolute,
}

impl MotionMode {
    /// Mode selected by the `absolute` feature.
    pub const BUILD: Self = if cfg!(feature = "absolute") {
        Self::Absolute
    } else {
        Self::Relative
    };

    /// Whether this is relative mode.
    #[must_use]
    pub const fn is_relative(self) -> bool {
        matches!(self, Self::Relative)
    }

    /// Inclusive coordinate range a client should accept in this mode.
    #[must_use]
    pub const fn coordinate_range(self) -> (i32, i32) {
        match self {
            Self::Relative => (-127, 127),
            Self::Absolute => (1, 32_767),
        }
    }

    /// Wire size of one coordinate in this mode.
    #[must_use]
    pub const fn coordinate_size(self) -> usize {
        match self {
            Self::Relative => 1,
            Self::Absolute => 2,
        }
    }
}

/// A coordinate type that can travel in a report.
pub trait WireCoordinate: Copy + Default + core::fmt::Debug + PartialEq + Send + 'static {
    /// Mode this coordinate type belongs to.
    const MODE: MotionMode;

    /// Read one coordinate.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if the reader is exhausted.
    fn read(reader: &mut ReportReader<'_>) -> ProtocolResult<Self>;

    /// Write one coordinate.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if the writer is full.
    fn write(self, writer: &mut ReportWriter<'_>) -> ProtocolResult<()>;

    /// Convert a caller-supplied value, or `None` if it does not fit the
    /// wire type. Range policy is left to the caller.
    fn from_i32(value: i32) -> Option<Self>;

    /// Widen to `i32` for display and arithmetic.
    fn to_i32(self) -> i32;
}

impl WireCoordinate for i8 {
    const MODE: MotionMode = MotionMode::Relative;

    fn read(reader: &mut ReportReader<'_>) -> ProtocolResult<Self> {
        reader.read_i8()
    }

    fn write(self, writer: &mut ReportWriter<'_>) -> ProtocolResult<()> {
        writer.write_i8(self)
    }

    fn from_i32(value: i32) -> Option<Self> {
        i8::try_from(value).ok()
    }

    fn to_i32(self) -> i32 {
        i32::from(self)
    }
}

impl WireCoordinate for u16 {
    const MODE: MotionMode = MotionMode::Absolute;

    fn read(reader: &mut ReportReader<'_>) -> ProtocolResult<Self> {
        reader.read_u16_le()
    }

    fn write(self, writer: &mut ReportWriter<'_>) -> ProtocolResult<()> {
        writer.write_u16_le(self)
    }

    fn from_i32(value: i32) -> Option<Self> {
        u16::try_from(value).ok()
    }

    fn to_i32(self) -> i32 {
        i32::from(self)
    }
}

/// Pointer button bitmask.
///
/// Bits outside the three defined buttons are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Buttons(u8);

impl Buttons {
    /// No buttons pressed.
    pub const NONE: Self = Self(0);
    /// Primary button.
    pub const LEFT: Self = Self(0x01);
    /// Secondary button.
    pub const RIGHT: Self = Self(0x02);
    /// Middle button.
    pub const MIDDLE: Self = Self(0x04);

    /// Wrap a raw button byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw button byte.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One injected pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionMessage {
    /// Button state.
    pub buttons: Buttons,
    /// Horizontal delta or position.
    pub x: Coordinate,
    /// Vertical delta or position.
    pub y: Coordinate,
}

impl MotionMessage {
    /// Create a motion message.
    #[must_use]
    pub const fn new(x: Coordinate, y: Coordinate, buttons: Buttons) -> Self {
        Self { buttons, x, y }
    }

    pub(crate) fn read_body(reader: &mut ReportReader<'_>) -> ProtocolResult<Self> {
        let buttons = Buttons::from_bits(reader.read_u8()?);
        let x = Coordinate::read(reader)?;
        let y = Coordinate::read(reader)?;
        Ok(Self { buttons, x, y })
    }

    pub(crate) fn write_body(&self, writer: &mut ReportWriter<'_>) -> ProtocolResult<()> {
        writer.write_u8(self.buttons.bits())?;
        self.x.write(writer)?;
        self.y.write(writer)
    }
}
