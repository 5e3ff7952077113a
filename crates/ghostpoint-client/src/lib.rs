//! # ghostpoint-client
//!
//! Drives a ghostpoint virtual mouse through its control report: queue
//! pointer motion, clear the queue, read the queue depth and tune the poll
//! interval.
//!
//! Requests travel over a [`ControlTransport`]. [`LoopbackTransport`] talks
//! to an in-process [`VirtualMouse`](ghostpoint_device::VirtualMouse);
//! [`transport::mock::MockTransport`] replays scripted responses for tests.
//!
//! Every failure maps to a stable numeric [`ResultCode`]:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | ok |
//! | 1 | init failed |
//! | 2 | invalid parameter |
//! | 3 | queue full |
//! | 4 | communication failed |

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]

pub mod client;
pub mod error;
pub mod transport;

pub mod prelude;

pub use client::{DeviceInfo, MouseClient};
pub use error::{ClientError, ClientResult, ResultCode, TransportError};
pub use transport::{ControlTransport, LoopbackTransport};
