//! # ghostpoint-device
//!
//! A virtual pointing device whose motion is injected through a control
//! report instead of coming from hardware.
//!
//! A privileged client sends control requests (move, info, clear, interval,
//! queue size) as get-feature requests on the control report. Move requests
//! land in a bounded queue. The host reads pointer input reports; each read
//! is held for one poll interval by a tokio timer, then completed with the
//! oldest queued message or, if there is none, an idle report.
//!
//! ## Architecture
//!
//! - [`device`] - [`VirtualMouse`] and its lifecycle entry points
//! - [`lifecycle`] - state machine gating every other operation
//! - [`control`] - control request validation and dispatch
//! - [`reader`] - timer-driven reads and the single pending-read slot
//! - [`poll`] - the shared poll interval and its floor
//! - [`host`] - descriptors, attributes and unsupported host requests
//! - [`config`] - construction-time tunables
//! - [`stats`] - counters for diagnostics
//! - [`error`] - device error types
//!
//! ## Concurrency
//!
//! Control requests may arrive on any thread while a poll timer fires on a
//! runtime worker. The queue has its own short lock, the interval is a
//! relaxed atomic, the pending read has a one-slot mutex, and the lifecycle
//! state is a `RwLock` held shared by operations and exclusively by
//! transitions. Teardown (`Remove`) flips the state to `Deleted` under the
//! write lock, cancels the pending read and then frees the queue.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ghostpoint_device::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mouse = Arc::new(VirtualMouse::new(DeviceConfig::default())?);
//! mouse.start()?;
//!
//! // Nothing queued: the read completes with an idle report.
//! let completion = mouse.begin_read(vec![0; INPUT_REPORT_SIZE])?.await?;
//! assert_eq!(completion.kind, ReportKind::Idle);
//!
//! mouse.remove();
//! # Ok(())
//! # }
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]

pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod poll;
pub mod reader;
pub mod stats;

pub mod prelude;

pub use config::{DeviceConfig, DeviceConfigBuilder};
pub use control::{ControlOutcome, RejectReason};
pub use device::VirtualMouse;
pub use error::{DeviceError, DeviceResult, ErrorCategory};
pub use host::HostRequest;
pub use lifecycle::{DeviceState, Lifecycle, LifecycleEvent, Transition};
pub use poll::{IntervalExchange, PollConfig};
pub use reader::{ReadCompletion, ReadHandle, ReportKind};
pub use stats::DeviceStats;
