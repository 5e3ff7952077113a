//! Host-side poll loop.
//!
//! Plays the part of the HID stack: keeps exactly one read outstanding,
//! prints every motion report and re-issues the read as soon as it
//! completes. The loop ends when the device stops accepting reads.

use std::sync::Arc;

use ghostpoint_device::{DeviceError, ReportKind, VirtualMouse};
use ghostpoint_protocol::INPUT_REPORT_SIZE;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::output;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub motion_reports: u64,
    pub idle_reports: u64,
}

pub fn spawn(device: Arc<VirtualMouse>) -> JoinHandle<PollSummary> {
    tokio::spawn(poll_loop(device))
}

pub async fn poll_loop(device: Arc<VirtualMouse>) -> PollSummary {
    let mut summary = PollSummary::default();
    let mut buffer = vec![0u8; INPUT_REPORT_SIZE];

    loop {
        let read = match device.begin_read(buffer) {
            Ok(read) => read,
            Err(e) => {
                debug!(error = %e, "device no longer accepts reads");
                break;
            }
        };

        match read.await {
            Ok(completion) => {
                match completion.kind {
                    ReportKind::Motion(message) => {
                        summary.motion_reports = summary.motion_reports.saturating_add(1);
                        println!("{}", output::motion_line(&message));
                    }
                    ReportKind::Idle => {
                        summary.idle_reports = summary.idle_reports.saturating_add(1);
                        trace!("idle");
                    }
                }
                buffer = completion.buffer;
            }
            Err(DeviceError::Cancelled) => {
                debug!("pending read cancelled by teardown");
                break;
            }
            Err(e) => {
                debug!(error = %e, "read failed");
                break;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostpoint_device::DeviceConfig;
    use ghostpoint_protocol::{
        Buttons, CONTROL_REPORT_ID, Coordinate, MotionMessage, MoveReport, WireCoordinate,
    };
    use std::time::Duration;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[tokio::test(start_paused = true)]
    async fn test_loop_drains_then_stops_on_remove() -> TestResult {
        let device = Arc::new(VirtualMouse::new(DeviceConfig::default())?);
        device.start()?;

        let one = Coordinate::from_i32(1).ok_or("coordinate")?;
        let mut request = [0u8; MoveReport::SIZE];
        MoveReport {
            message: MotionMessage::new(one, one, Buttons::LEFT),
        }
        .encode(&mut request)?;
        device.get_feature(CONTROL_REPORT_ID, &mut request)?;

        let poller = spawn(Arc::clone(&device));
        tokio::time::sleep(Duration::from_millis(20)).await;
        device.remove();

        let summary = poller.await?;
        assert_eq!(summary.motion_reports, 1);
        assert!(summary.idle_reports >= 1);
        assert_eq!(device.queue_depth(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_loop_exits_when_device_not_started() -> TestResult {
        let device = Arc::new(VirtualMouse::new(DeviceConfig::default())?);
        let summary = poll_loop(device).await;
        assert_eq!(summary, PollSummary::default());
        Ok(())
    }
}
