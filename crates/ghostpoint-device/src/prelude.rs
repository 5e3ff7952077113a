//! Prelude for ghostpoint-device.
//!
//! Re-exports the device, its configuration and errors, plus the protocol
//! types needed to build requests.
//!
//! # Example
//!
//! ```rust
//! use ghostpoint_device::prelude::*;
//!
//! let mouse = VirtualMouse::new(DeviceConfig::builder().queue_capacity(4).build()?)?;
//! mouse.start()?;
//! assert_eq!(mouse.capability().queue_capacity, 4);
//! # Ok::<(), DeviceError>(())
//! ```

pub use crate::config::{DeviceConfig, DeviceConfigBuilder};
pub use crate::control::{ControlOutcome, RejectReason};
pub use crate::device::VirtualMouse;
pub use crate::error::{DeviceError, DeviceResult, ErrorCategory};
pub use crate::host::HostRequest;
pub use crate::lifecycle::{DeviceState, LifecycleEvent};
pub use crate::reader::{ReadCompletion, ReadHandle, ReportKind};
pub use crate::stats::DeviceStats;

pub use ghostpoint_protocol::prelude::*;
