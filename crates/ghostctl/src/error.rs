//! Error types for ghostctl

use ghostpoint_client::ClientError;
use ghostpoint_device::DeviceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for an error that ends the program.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::UnknownCommand(_) | Self::InvalidArgument(_) => 2,
            Self::Client(e) if e.code() == ghostpoint_client::ResultCode::InitFailed => 3,
            Self::InvalidConfiguration(_)
            | Self::JsonError(_)
            | Self::Device(DeviceError::InvalidConfiguration(_)) => 4,
            Self::Device(_) | Self::Client(_) => 5,
            Self::IoError(_) => 1,
        }
    }

    /// Whether the REPL can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownCommand(_) | Self::InvalidArgument(_) | Self::Client(_) => true,
            Self::Device(e) => e.is_recoverable(),
            Self::InvalidConfiguration(_) | Self::IoError(_) | Self::JsonError(_) => false,
        }
    }
}
