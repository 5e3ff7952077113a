//! Client error types.

use core::fmt;

use ghostpoint_device::DeviceError;
use ghostpoint_protocol::ProtocolError;
use thiserror::Error;

/// Failure moving a request to or from the device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The device is gone or was never opened.
    #[error("virtual mouse was not found or could not be opened")]
    Disconnected,

    /// The device refused the request.
    #[error("get-feature request failed: {0}")]
    Device(#[from] DeviceError),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ProtocolError),

    /// A request buffer without a report id byte.
    #[error("request buffer is empty")]
    EmptyRequest,
}

/// Client error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The device could not be reached or described itself unexpectedly.
    #[error("client initialization failed: {0}")]
    InitFailed(String),

    /// A coordinate outside the range of the device's motion mode.
    #[error("coordinates ({x}, {y}) do not lie in [{min}, {max}]")]
    CoordinateOutOfRange {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
        /// Smallest accepted coordinate.
        min: i32,
        /// Largest accepted coordinate.
        max: i32,
    },

    /// The device refused an interval below its floor.
    #[error("poll interval {requested_us}us is too small (still {current_us}us)")]
    IntervalTooSmall {
        /// Interval asked for.
        requested_us: u32,
        /// Interval still in effect.
        current_us: u32,
    },

    /// The device queue had no free slot.
    #[error("message queue is full")]
    QueueFull,

    /// The request never got a usable answer.
    #[error("communication failed: {0}")]
    CommunicationFailed(#[from] TransportError),
}

/// Numeric result codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResultCode {
    /// Success.
    Ok = 0,
    /// Initialization failed.
    InitFailed = 1,
    /// A parameter was out of range.
    InvalidParameter = 2,
    /// The device queue was full.
    QueueFull = 3,
    /// The transport failed.
    CommunicationFailed = 4,
}

impl ResultCode {
    /// Numeric value of the code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Code for any client result.
    #[must_use]
    pub fn of<T>(result: &ClientResult<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.code(),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::InitFailed => "init failed",
            Self::InvalidParameter => "invalid parameter",
            Self::QueueFull => "queue full",
            Self::CommunicationFailed => "communication failed",
        };
        write!(f, "{name} ({})", self.as_u8())
    }
}

impl ClientError {
    /// Create an initialization error.
    #[must_use]
    pub fn init_failed(reason: impl Into<String>) -> Self {
        Self::InitFailed(reason.into())
    }

    /// Result code for this error.
    #[must_use]
    pub fn code(&self) -> ResultCode {
        match self {
            Self::InitFailed(_) => ResultCode::InitFailed,
            Self::CoordinateOutOfRange { .. } | Self::IntervalTooSmall { .. } => {
                ResultCode::InvalidParameter
            }
            Self::QueueFull => ResultCode::QueueFull,
            Self::CommunicationFailed(_) => ResultCode::CommunicationFailed,
        }
    }

    /// Whether retrying the same call later can succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::QueueFull | Self::CommunicationFailed(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
