//! Relaxed atomic counters for queue traffic.
//!
//! Counters are bumped after the ring lock is released. They are diagnostics
//! only: a snapshot taken while producers are running may disagree with
//! [`MessageQueue::depth`](crate::MessageQueue::depth) by a few messages.

use core::sync::atomic::{AtomicU64, Ordering};

/// Snapshot returned by [`QueueCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueCounterSnapshot {
    /// Messages accepted by `enqueue`.
    pub enqueued: u64,
    /// Messages refused because the ring was full.
    pub rejected: u64,
    /// Messages handed out by `dequeue`.
    pub dequeued: u64,
    /// Calls to `clear`.
    pub clears: u64,
}

/// Traffic counters for one queue.
///
/// All operations use `Ordering::Relaxed`; the counters never guard other
/// memory.
#[derive(Debug, Default)]
pub struct QueueCounters {
    enqueued: AtomicU64,
    rejected: AtomicU64,
    dequeued: AtomicU64,
    clears: AtomicU64,
}

impl QueueCounters {
    /// Create zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            dequeued: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn inc_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_dequeued(&self) {
        self.dequeued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_clears(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// Read every counter.
    #[must_use]
    pub fn snapshot(&self) -> QueueCounterSnapshot {
        QueueCounterSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dequeued: self.dequeued.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }

    /// Read every counter and reset them to zero.
    pub fn snapshot_and_reset(&self) -> QueueCounterSnapshot {
        QueueCounterSnapshot {
            enqueued: self.enqueued.swap(0, Ordering::Relaxed),
            rejected: self.rejected.swap(0, Ordering::Relaxed),
            dequeued: self.dequeued.swap(0, Ordering::Relaxed),
            clears: self.clears.swap(0, Ordering::Relaxed),
        }
    }
}
