//! The virtual mouse and its lifecycle entry points.
//!
//! Control dispatch lives in [`control`](crate::control), the read path in
//! [`reader`](crate::reader) and the remaining host requests in
//! [`host`](crate::host); all of them are methods on [`VirtualMouse`].

use ghostpoint_protocol::{DeviceAttributes, InfoReport, MotionMessage, MotionMode};
use ghostpoint_queue::MessageQueue;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::DeviceConfig;
use crate::error::{DeviceError, DeviceResult};
use crate::lifecycle::{DeviceState, Lifecycle, LifecycleEvent, Transition};
use crate::poll::PollConfig;
use crate::reader::PendingSlot;
use crate::stats::{DeviceStats, ReadCounters};

/// One virtual pointing device.
///
/// Share it behind an `Arc`: control requests arrive on arbitrary threads
/// while the poll timer runs as a tokio task.
///
/// # Locking
///
/// The lifecycle sits behind a `RwLock`. Control requests and timer
/// completions hold a read guard for their (bounded) duration; lifecycle
/// events take the write guard. Teardown therefore waits for any in-flight
/// operation before it releases the queue, and nothing can start once the
/// state reads `Deleted`. The pending-read slot has its own mutex and is
/// never held while the lifecycle write guard is requested.
///
/// # Example
///
/// ```rust
/// use ghostpoint_device::prelude::*;
///
/// let mouse = VirtualMouse::new(DeviceConfig::default())?;
/// mouse.start()?;
/// assert_eq!(mouse.state(), DeviceState::Started);
///
/// let mut request = [0u8; DwordReport::SIZE];
/// DwordReport::new(ControlCode::QueueSize, 0).encode(&mut request)?;
/// mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;
/// assert_eq!(DwordReport::read_value(&request)?, 0);
///
/// mouse.remove();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct VirtualMouse {
    pub(crate) lifecycle: RwLock<Lifecycle>,
    pub(crate) queue: MessageQueue<MotionMessage>,
    pub(crate) poll: PollConfig,
    pub(crate) pending: PendingSlot,
    pub(crate) capability: InfoReport,
    pub(crate) attributes: DeviceAttributes,
    pub(crate) reads: ReadCounters,
    config: DeviceConfig,
}

impl VirtualMouse {
    /// Create a device in `NotStarted`.
    ///
    /// The queue ring is allocated here and never again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the configuration does not validate
    /// and `AllocationFailure` if the queue cannot be built.
    pub fn new(config: DeviceConfig) -> DeviceResult<Self> {
        config.validate()?;
        let queue = MessageQueue::new(config.queue_capacity)
            .map_err(|e| DeviceError::allocation_failure(e.to_string()))?;
        let capacity = u32::try_from(config.queue_capacity)
            .map_err(|e| DeviceError::invalid_configuration(e.to_string()))?;

        debug!(
            mode = ?MotionMode::BUILD,
            capacity,
            interval_us = config.default_interval_us,
            "virtual mouse created"
        );

        Ok(Self {
            lifecycle: RwLock::new(Lifecycle::new()),
            queue,
            poll: PollConfig::new(config.default_interval_us, config.min_interval_us),
            pending: PendingSlot::default(),
            capability: InfoReport::new(MotionMode::BUILD, capacity),
            attributes: DeviceAttributes::default(),
            reads: ReadCounters::default(),
            config,
        })
    }

    /// Configuration the device was built with.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.lifecycle.read().current()
    }

    /// Capability record returned by the Info control request.
    #[must_use]
    pub fn capability(&self) -> InfoReport {
        self.capability
    }

    /// Current poll interval in microseconds.
    #[must_use]
    pub fn interval_us(&self) -> u32 {
        self.poll.interval_us()
    }

    /// Messages currently queued.
    #[must_use]
    pub fn queue_depth(&self) -> usize {
        self.queue.depth()
    }

    /// Snapshot of counters and state.
    #[must_use]
    pub fn stats(&self) -> DeviceStats {
        DeviceStats::new(
            self.state(),
            self.queue.depth(),
            self.poll.interval_us(),
            self.queue.counters(),
            &self.reads,
        )
    }

    /// Apply a lifecycle event. `Remove` also tears the device down.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the event is not valid in the current
    /// state; the state is unchanged.
    pub fn handle_event(&self, event: LifecycleEvent) -> DeviceResult<Transition> {
        let transition = {
            let mut lifecycle = self.lifecycle.write();
            lifecycle.apply(event)
        };

        match &transition {
            Ok(t) if t.changed() => {
                info!(from = %t.from, to = %t.to, %event, "device state changed");
            }
            Ok(t) => debug!(state = %t.from, %event, "lifecycle event left state unchanged"),
            Err(e) => warn!(error = %e, "lifecycle event refused"),
        }

        if event == LifecycleEvent::Remove && transition.is_ok() {
            self.teardown();
        }
        transition
    }

    /// `NotStarted`/`Stopped` to `Started`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from any other state.
    pub fn start(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::Start).map(drop)
    }

    /// `Started`/`StopPending` to `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from any other state.
    pub fn stop(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::Stop).map(drop)
    }

    /// `Started` to `StopPending`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from any other state.
    pub fn query_stop(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::QueryStop).map(drop)
    }

    /// `StopPending` back to the saved previous state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` only on a deleted device.
    pub fn cancel_stop(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::CancelStop).map(drop)
    }

    /// `Started`/`Stopped` to `RemovePending`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from any other state.
    pub fn query_remove(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::QueryRemove).map(drop)
    }

    /// `RemovePending` back to the saved previous state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` only on a deleted device.
    pub fn cancel_remove(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::CancelRemove).map(drop)
    }

    /// The device vanished.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from `NotStarted`, `SurpriseRemovePending`
    /// and `Deleted`.
    pub fn surprise_removal(&self) -> DeviceResult<()> {
        self.handle_event(LifecycleEvent::SurpriseRemoval).map(drop)
    }

    /// Tear the device down: state becomes `Deleted`, a pending read is
    /// cancelled and the queue storage is freed. Safe to call repeatedly.
    pub fn remove(&self) {
        if let Err(e) = self.handle_event(LifecycleEvent::Remove) {
            // Remove is accepted from every state.
            warn!(error = %e, "remove refused");
        }
    }

    fn teardown(&self) {
        self.cancel_pending_read();
        self.queue.release();
        debug!("device torn down");
    }
}

impl Drop for VirtualMouse {
    fn drop(&mut self) {
        if !self.lifecycle.get_mut().current().is_terminal() {
            self.remove();
        }
    }
}
