//! Error types for queue construction.

use thiserror::Error;

/// Errors that can occur when creating a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Ring size below the minimum of two slots.
    #[error("Invalid queue capacity {0}: need at least 2 slots")]
    InvalidCapacity(usize),
}

/// A specialized `Result` type for queue operations.
pub type QueueResult<T> = std::result::Result<T, QueueError>;
