//! Error types for device operations.
//!
//! Two kinds of failure exist. Requests the device refuses outright come
//! back as [`DeviceError`]. Requests that were understood but could not be
//! honored (a full queue, an interval below the floor) complete normally
//! with the control code replaced by the error sentinel; those are described
//! by [`RejectReason`](crate::control::RejectReason).

use core::fmt;

use ghostpoint_protocol::ProtocolError;
use thiserror::Error;

use crate::host::HostRequest;
use crate::lifecycle::{DeviceState, LifecycleEvent};

/// Errors returned by device operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device is not in `Started`.
    #[error("Device not ready: state is {state}")]
    NotReady {
        /// State at the time of the request.
        state: DeviceState,
    },

    /// The lifecycle event is not valid in the current state.
    #[error("Invalid transition: {event} while {from}")]
    InvalidTransition {
        /// State the device was in.
        from: DeviceState,
        /// Event that was refused.
        event: LifecycleEvent,
    },

    /// A caller buffer is smaller than the structure it must hold.
    #[error("Buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required.
        required: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// The control code is not one the device implements.
    #[error("Unsupported control code: {0:#04x}")]
    UnsupportedControlCode(u8),

    /// A feature request addressed a report other than the control report.
    #[error("Unsupported report id: {0:#04x}")]
    UnsupportedReportId(u8),

    /// A host request the device does not implement.
    #[error("Request not supported: {0}")]
    NotSupported(HostRequest),

    /// A read is already waiting for the poll timer.
    #[error("A read is already pending")]
    ReadAlreadyPending,

    /// Timer or storage could not be set up.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The pending read was cancelled by device teardown.
    #[error("Read cancelled")]
    Cancelled,
}

impl DeviceError {
    /// Create a not ready error.
    #[must_use]
    pub fn not_ready(state: DeviceState) -> Self {
        Self::NotReady { state }
    }

    /// Create a buffer too small error.
    #[must_use]
    pub fn buffer_too_small(required: usize, actual: usize) -> Self {
        Self::BufferTooSmall { required, actual }
    }

    /// Create an allocation failure error.
    #[must_use]
    pub fn allocation_failure(reason: impl Into<String>) -> Self {
        Self::AllocationFailure(reason.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Classification of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BufferTooSmall { .. } | Self::InvalidConfiguration(_) => ErrorCategory::Validation,
            Self::NotReady { .. } | Self::InvalidTransition { .. } | Self::ReadAlreadyPending => {
                ErrorCategory::State
            }
            Self::UnsupportedControlCode(_)
            | Self::UnsupportedReportId(_)
            | Self::NotSupported(_) => ErrorCategory::Unsupported,
            Self::AllocationFailure(_) => ErrorCategory::Allocation,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// Whether retrying later can succeed. Only a read cancelled by
    /// teardown is final: the device it belonged to is gone.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl From<ProtocolError> for DeviceError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::BufferTooSmall { required, actual } => {
                Self::BufferTooSmall { required, actual }
            }
            ProtocolError::UnknownControlCode(code) => Self::UnsupportedControlCode(code),
            ProtocolError::UnexpectedReportId { actual, .. } => Self::UnsupportedReportId(actual),
        }
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or undersized input.
    Validation,
    /// A bounded resource is exhausted.
    ResourceExhausted,
    /// The operation is not valid in the current lifecycle state.
    State,
    /// Setup of timers or storage failed.
    Allocation,
    /// The request is outside what the device implements.
    Unsupported,
    /// The operation was abandoned by teardown.
    Cancelled,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::ResourceExhausted => "resource exhausted",
            Self::State => "state",
            Self::Allocation => "allocation",
            Self::Unsupported => "unsupported",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A specialized `Result` type for device operations.
pub type DeviceResult<T> = std::result::Result<T, DeviceError>;
