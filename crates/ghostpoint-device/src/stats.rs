//! Read-path counters and the combined device snapshot.

use core::sync::atomic::{AtomicU64, Ordering};

use ghostpoint_queue::QueueCounterSnapshot;

use crate::lifecycle::DeviceState;

#[derive(Debug, Default)]
pub(crate) struct ReadCounters {
    motion: AtomicU64,
    idle: AtomicU64,
    not_ready: AtomicU64,
    cancelled: AtomicU64,
}

impl ReadCounters {
    pub(crate) fn inc_motion(&self) {
        self.motion.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_idle(&self) {
        self.idle.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_not_ready(&self) {
        self.not_ready.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time view of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStats {
    /// Lifecycle state.
    pub state: DeviceState,
    /// Messages waiting in the queue.
    pub queue_depth: usize,
    /// Current poll interval (microseconds).
    pub interval_us: u32,
    /// Queue traffic.
    pub queue: QueueCounterSnapshot,
    /// Reads completed with a queued message.
    pub motion_reports: u64,
    /// Reads completed with an idle report.
    pub idle_reports: u64,
    /// Reads failed because the device had left `Started`.
    pub not_ready_reads: u64,
    /// Reads cancelled by teardown.
    pub cancelled_reads: u64,
}

impl DeviceStats {
    pub(crate) fn new(
        state: DeviceState,
        queue_depth: usize,
        interval_us: u32,
        queue: QueueCounterSnapshot,
        reads: &ReadCounters,
    ) -> Self {
        Self {
            state,
            queue_depth,
            interval_us,
            queue,
            motion_reports: reads.motion.load(Ordering::Relaxed),
            idle_reports: reads.idle.load(Ordering::Relaxed),
            not_ready_reads: reads.not_ready.load(Ordering::Relaxed),
            cancelled_reads: reads.cancelled.load(Ordering::Relaxed),
        }
    }
}
