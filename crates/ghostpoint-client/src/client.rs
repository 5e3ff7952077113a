//! The control client.

use ghostpoint_protocol::{
    Buttons, CONTROL_REPORT_ID, ControlCode, ControlHeader, Coordinate, DwordReport, InfoReport,
    MotionMessage, MotionMode, MoveReport, WireCoordinate,
};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult, TransportError};
use crate::transport::ControlTransport;

/// What the device said about itself at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Motion mode the device was built for.
    pub mode: MotionMode,
    /// Ring size reported by the device.
    pub queue_capacity: u32,
}

impl DeviceInfo {
    /// Whether the device reports relative motion.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.mode.is_relative()
    }
}

impl From<InfoReport> for DeviceInfo {
    fn from(report: InfoReport) -> Self {
        Self {
            mode: report.mode(),
            queue_capacity: report.queue_capacity,
        }
    }
}

/// Sends control requests to one virtual mouse.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use ghostpoint_client::prelude::*;
/// use ghostpoint_device::{DeviceConfig, VirtualMouse};
///
/// let device = Arc::new(VirtualMouse::new(DeviceConfig::default())?);
/// device.start()?;
///
/// let client = MouseClient::connect(LoopbackTransport::new(device))?;
/// client.send_move(10, 4, Buttons::LEFT)?;
/// assert_eq!(client.queue_size()?, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct MouseClient<T> {
    transport: T,
    info: DeviceInfo,
}

fn dword_request(code: ControlCode, value: u32) -> ClientResult<[u8; DwordReport::SIZE]> {
    let mut buf = [0u8; DwordReport::SIZE];
    DwordReport::new(code, value)
        .encode(&mut buf)
        .map_err(TransportError::from)?;
    Ok(buf)
}

fn response_code(buf: &[u8]) -> ClientResult<u8> {
    Ok(ControlHeader::decode(buf)
        .map_err(TransportError::from)?
        .code)
}

impl<T: ControlTransport> MouseClient<T> {
    /// Ask the device for its capabilities and keep them.
    ///
    /// # Errors
    ///
    /// Returns `InitFailed` if the device cannot be reached, answers with a
    /// malformed record or uses a different motion mode than this build.
    pub fn connect(transport: T) -> ClientResult<Self> {
        let mut buf = [0u8; InfoReport::SIZE];
        buf[0] = CONTROL_REPORT_ID;
        buf[1] = ControlCode::Info.as_u8();

        transport
            .get_feature(&mut buf)
            .map_err(|e| ClientError::init_failed(e.to_string()))?;
        let report =
            InfoReport::decode(&buf).map_err(|e| ClientError::init_failed(e.to_string()))?;

        let info = DeviceInfo::from(report);
        if info.mode != MotionMode::BUILD {
            return Err(ClientError::init_failed(format!(
                "device reports {:?} motion, client was built for {:?}",
                info.mode,
                MotionMode::BUILD
            )));
        }

        info!(
            mode = ?info.mode,
            queue_capacity = info.queue_capacity,
            "connected to virtual mouse"
        );
        Ok(Self { transport, info })
    }

    /// Capabilities cached at connect time.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        self.info
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Queue one pointer message.
    ///
    /// Relative devices take deltas in `[-127, 127]`; absolute devices take
    /// positions in `[1, 32767]` on both axes.
    ///
    /// # Errors
    ///
    /// - `CoordinateOutOfRange` if either coordinate is outside the mode's
    ///   range; nothing is sent
    /// - `QueueFull` if the device had no room
    /// - `CommunicationFailed` if the request did not complete
    pub fn send_move(&self, x: i32, y: i32, buttons: Buttons) -> ClientResult<()> {
        let (min, max) = self.info.mode.coordinate_range();
        let in_range = |v: i32| (min..=max).contains(&v);
        let out_of_range = || ClientError::CoordinateOutOfRange { x, y, min, max };

        if !in_range(x) || !in_range(y) {
            return Err(out_of_range());
        }
        let wire_x = Coordinate::from_i32(x).ok_or_else(out_of_range)?;
        let wire_y = Coordinate::from_i32(y).ok_or_else(out_of_range)?;

        let mut buf = [0u8; MoveReport::SIZE];
        MoveReport {
            message: MotionMessage::new(wire_x, wire_y, buttons),
        }
        .encode(&mut buf)
        .map_err(TransportError::from)?;
        self.transport.get_feature(&mut buf)?;

        if response_code(&buf)? == ControlCode::Move.as_u8() {
            Ok(())
        } else {
            debug!(x, y, "device queue full");
            Err(ClientError::QueueFull)
        }
    }

    /// Drop every queued message.
    ///
    /// # Errors
    ///
    /// Returns `CommunicationFailed` if the request did not complete.
    pub fn clear_queue(&self) -> ClientResult<()> {
        let mut buf = [CONTROL_REPORT_ID, ControlCode::ClearQueue.as_u8()];
        self.transport.get_feature(&mut buf)?;
        Ok(())
    }

    /// Messages currently queued on the device.
    ///
    /// # Errors
    ///
    /// Returns `CommunicationFailed` if the request did not complete.
    pub fn queue_size(&self) -> ClientResult<u32> {
        let mut buf = dword_request(ControlCode::QueueSize, 0)?;
        self.transport.get_feature(&mut buf)?;
        Ok(DwordReport::read_value(&buf).map_err(TransportError::from)?)
    }

    /// Current poll interval in microseconds.
    ///
    /// Sends an interval request with value 0, which the device always
    /// refuses and answers with the interval in effect.
    ///
    /// # Errors
    ///
    /// Returns `CommunicationFailed` if the request did not complete.
    pub fn interval(&self) -> ClientResult<u32> {
        let mut buf = dword_request(ControlCode::Interval, 0)?;
        self.transport.get_feature(&mut buf)?;
        Ok(DwordReport::read_value(&buf).map_err(TransportError::from)?)
    }

    /// Change the poll interval.
    ///
    /// # Errors
    ///
    /// - `IntervalTooSmall` if the device refused the value as below its floor
    /// - `CommunicationFailed` if the request did not complete
    pub fn set_interval(&self, interval_us: u32) -> ClientResult<()> {
        let mut buf = dword_request(ControlCode::Interval, interval_us)?;
        self.transport.get_feature(&mut buf)?;
        let response = DwordReport::decode(&buf).map_err(TransportError::from)?;

        if response.is_error() {
            warn!(
                requested_us = interval_us,
                current_us = response.value,
                "poll interval too small"
            );
            return Err(ClientError::IntervalTooSmall {
                requested_us: interval_us,
                current_us: response.value,
            });
        }
        debug!(
            previous_us = response.value,
            interval_us, "poll interval changed"
        );
        Ok(())
    }
}
