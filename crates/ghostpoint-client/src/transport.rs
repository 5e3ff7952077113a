//! How control requests reach the device.
//!
//! A transport performs one get-feature round trip: the buffer goes out
//! holding a request and comes back holding the response, in place.

use std::sync::Arc;

use ghostpoint_device::VirtualMouse;
use tracing::trace;

use crate::error::TransportError;

/// One get-feature round trip on the control report.
pub trait ControlTransport: Send + Sync {
    /// Send `buffer` as a get-feature request; the response overwrites it.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request cannot be delivered or the
    /// device refuses it outright.
    fn get_feature(&self, buffer: &mut [u8]) -> Result<(), TransportError>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for Arc<T> {
    fn get_feature(&self, buffer: &mut [u8]) -> Result<(), TransportError> {
        (**self).get_feature(buffer)
    }
}

impl<T: ControlTransport + ?Sized> ControlTransport for &T {
    fn get_feature(&self, buffer: &mut [u8]) -> Result<(), TransportError> {
        (**self).get_feature(buffer)
    }
}

/// In-process transport straight into a [`VirtualMouse`].
///
/// The report id is taken from byte 0 of the request, as a HID stack would.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    device: Arc<VirtualMouse>,
}

impl LoopbackTransport {
    /// Wrap a shared device.
    #[must_use]
    pub fn new(device: Arc<VirtualMouse>) -> Self {
        Self { device }
    }

    /// The device behind this transport.
    #[must_use]
    pub fn device(&self) -> &Arc<VirtualMouse> {
        &self.device
    }
}

impl ControlTransport for LoopbackTransport {
    fn get_feature(&self, buffer: &mut [u8]) -> Result<(), TransportError> {
        let report_id = *buffer.first().ok_or(TransportError::EmptyRequest)?;
        let outcome = self.device.get_feature(report_id, buffer)?;
        trace!(?outcome, "loopback get-feature");
        Ok(())
    }
}

/// Scripted transport for tests.
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::Mutex;

    use super::ControlTransport;
    use crate::error::TransportError;

    /// Replays queued responses and records every request it sees.
    ///
    /// With no response queued, a request is echoed back unchanged, which
    /// reads as success for every control code.
    #[derive(Debug)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
        requests: Mutex<Vec<Vec<u8>>>,
        connected: AtomicBool,
    }

    impl MockTransport {
        /// A connected transport with nothing scripted.
        #[must_use]
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                connected: AtomicBool::new(true),
            }
        }

        /// Queue the bytes the next request will be answered with.
        pub fn push_response(&self, response: impl Into<Vec<u8>>) {
            self.responses.lock().push_back(Ok(response.into()));
        }

        /// Queue a failure for the next request.
        pub fn push_error(&self, error: TransportError) {
            self.responses.lock().push_back(Err(error));
        }

        /// Every request received so far, as sent.
        #[must_use]
        pub fn requests(&self) -> Vec<Vec<u8>> {
            self.requests.lock().clone()
        }

        /// Fail every following request with `Disconnected`.
        pub fn disconnect(&self) {
            self.connected.store(false, Ordering::Release);
        }

        /// Undo [`disconnect`](Self::disconnect).
        pub fn reconnect(&self) {
            self.connected.store(true, Ordering::Release);
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ControlTransport for MockTransport {
        fn get_feature(&self, buffer: &mut [u8]) -> Result<(), TransportError> {
            if !self.connected.load(Ordering::Acquire) {
                return Err(TransportError::Disconnected);
            }
            self.requests.lock().push(buffer.to_vec());

            let Some(response) = self.responses.lock().pop_front() else {
                return Ok(());
            };
            let response = response?;
            let len = response.len().min(buffer.len());
            if let (Some(dst), Some(src)) = (buffer.get_mut(..len), response.get(..len)) {
                dst.copy_from_slice(src);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;
    use ghostpoint_device::prelude::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_loopback_routes_by_report_id() -> TestResult {
        let device = Arc::new(VirtualMouse::new(DeviceConfig::default())?);
        device.start()?;
        let transport = LoopbackTransport::new(Arc::clone(&device));

        let mut request = [0u8; DwordReport::SIZE];
        DwordReport::new(ControlCode::QueueSize, 9).encode(&mut request)?;
        transport.get_feature(&mut request)?;
        assert_eq!(DwordReport::read_value(&request)?, 0);

        let mut wrong = [POINTER_REPORT_ID, 0x00];
        assert_eq!(
            transport.get_feature(&mut wrong),
            Err(TransportError::Device(DeviceError::UnsupportedReportId(
                POINTER_REPORT_ID
            )))
        );
        assert_eq!(
            transport.get_feature(&mut []),
            Err(TransportError::EmptyRequest)
        );
        Ok(())
    }

    #[test]
    fn test_mock_replays_and_records() -> TestResult {
        let transport = MockTransport::new();
        transport.push_response([0x02, 0xFF]);
        transport.push_error(TransportError::Disconnected);

        let mut first = [0x02, 0x00, 0x05];
        transport.get_feature(&mut first)?;
        assert_eq!(first, [0x02, 0xFF, 0x05]);

        let mut second = [0x02, 0x02];
        assert!(transport.get_feature(&mut second).is_err());

        let mut third = [0x02, 0x04];
        transport.get_feature(&mut third)?;
        assert_eq!(third, [0x02, 0x04]);

        assert_eq!(transport.requests().len(), 3);
        Ok(())
    }

    #[test]
    fn test_mock_disconnect() {
        let transport = Arc::new(MockTransport::new());
        transport.disconnect();
        let mut buf = [0x02, 0x02];
        assert_eq!(
            transport.get_feature(&mut buf),
            Err(TransportError::Disconnected)
        );
        assert!(transport.requests().is_empty());
        transport.reconnect();
        assert!(transport.get_feature(&mut buf).is_ok());
    }
}
