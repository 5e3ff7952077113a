//! Prelude for ghostpoint-client.

pub use crate::client::{DeviceInfo, MouseClient};
pub use crate::error::{ClientError, ClientResult, ResultCode, TransportError};
pub use crate::transport::{ControlTransport, LoopbackTransport};

pub use ghostpoint_protocol::{Buttons, MotionMode};
