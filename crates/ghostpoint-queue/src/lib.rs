//! # ghostpoint-queue
//!
//! Bounded message queue between the ghostpoint control path (producer) and
//! the poll timer (consumer).
//!
//! ## Guarantees
//!
//! - **Fixed storage**: the ring is allocated once in [`MessageQueue::new`]
//! - **Bounded waits**: every operation holds the lock for one index update
//!   and one copy
//! - **No torn records**: messages are copied in and out under the lock
//! - **Drop on overflow**: a full ring rejects the new message and leaves the
//!   queued ones intact
//!
//! ## Example
//!
//! ```rust
//! use ghostpoint_queue::{MessageQueue, DEFAULT_CAPACITY};
//!
//! let queue = MessageQueue::<(i8, i8)>::new(DEFAULT_CAPACITY)?;
//! assert!(queue.enqueue((1, 2)));
//! assert_eq!(queue.depth(), 1);
//! assert_eq!(queue.dequeue(), Some((1, 2)));
//! # Ok::<(), ghostpoint_queue::QueueError>(())
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]

pub mod counters;
pub mod error;
pub mod queue;

pub use counters::{QueueCounterSnapshot, QueueCounters};
pub use error::{QueueError, QueueResult};
pub use queue::{DEFAULT_CAPACITY, MIN_CAPACITY, MessageQueue};
