//! Timer-driven report reads.
//!
//! The host hands the device a buffer with [`VirtualMouse::begin_read`]. The
//! device parks it as the single pending read and arms a one-shot tokio
//! timer for the current poll interval. When the timer fires, one queued
//! message (or an idle report if the queue is empty) is written into the
//! buffer and the read completes. The host re-issues reads to keep polling.
//!
//! A pending read is resolved exactly once. Resolution means taking it out
//! of the slot under the slot lock; the timer and teardown race for that,
//! and whichever loses finds the slot empty. Timers also carry a generation
//! number so a late timer can never complete a newer read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use ghostpoint_protocol::{
    INPUT_REPORT_SIZE, MotionMessage, write_idle_report, write_motion_report,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

use crate::device::VirtualMouse;
use crate::error::{DeviceError, DeviceResult};

type Completion = oneshot::Sender<DeviceResult<ReadCompletion>>;

/// What a completed read carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// A queued message was drained.
    Motion(MotionMessage),
    /// The queue was empty.
    Idle,
}

/// A finished read: the caller's buffer, now holding an input report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCompletion {
    /// The buffer passed to `begin_read`.
    pub buffer: Vec<u8>,
    /// Bytes of `buffer` holding the report. Always the full report size.
    pub bytes_written: usize,
    /// Motion or idle.
    pub kind: ReportKind,
}

impl ReadCompletion {
    /// The report bytes.
    #[must_use]
    pub fn report(&self) -> &[u8] {
        self.buffer.get(..self.bytes_written).unwrap_or(&self.buffer)
    }
}

/// Future for one pending read.
///
/// Resolves when the poll timer fires, or with
/// [`DeviceError::Cancelled`] if the device is torn down first. Dropping the
/// handle abandons the read; the device then skips the drain so no queued
/// message is lost.
#[derive(Debug)]
#[must_use = "a read handle does nothing unless awaited"]
pub struct ReadHandle {
    receiver: oneshot::Receiver<DeviceResult<ReadCompletion>>,
}

impl Future for ReadHandle {
    type Output = DeviceResult<ReadCompletion>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(DeviceError::Cancelled)))
    }
}

#[derive(Debug)]
struct PendingRead {
    generation: u64,
    buffer: Vec<u8>,
    completion: Completion,
    timer: AbortHandle,
}

/// The one-slot home of the pending read.
#[derive(Debug, Default)]
pub(crate) struct PendingSlot {
    slot: Mutex<Option<PendingRead>>,
    generation: AtomicU64,
}

impl PendingSlot {
    fn take(&self) -> Option<PendingRead> {
        self.slot.lock().take()
    }

    fn take_generation(&self, generation: u64) -> Option<PendingRead> {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|p| p.generation == generation) {
            slot.take()
        } else {
            None
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl VirtualMouse {
    /// Queue a read and arm the poll timer.
    ///
    /// Must be called from inside a tokio runtime; the timer runs as a task
    /// on it.
    ///
    /// # Errors
    ///
    /// - `NotReady` unless the device is `Started`
    /// - `BufferTooSmall` if `buffer` cannot hold an input report (no timer
    ///   is armed)
    /// - `ReadAlreadyPending` if the previous read has not completed
    /// - `AllocationFailure` if no tokio runtime is available
    pub fn begin_read(self: &Arc<Self>, buffer: Vec<u8>) -> DeviceResult<ReadHandle> {
        let lifecycle = self.lifecycle.read();
        lifecycle.ensure_operational()?;

        if buffer.len() < INPUT_REPORT_SIZE {
            return Err(DeviceError::buffer_too_small(
                INPUT_REPORT_SIZE,
                buffer.len(),
            ));
        }

        let runtime = Handle::try_current()
            .map_err(|e| DeviceError::allocation_failure(format!("poll timer: {e}")))?;
        let interval = self.poll.interval();

        let mut slot = self.pending.slot.lock();
        if slot.is_some() {
            return Err(DeviceError::ReadAlreadyPending);
        }

        let generation = self.pending.generation.fetch_add(1, Ordering::Relaxed);
        let (completion, receiver) = oneshot::channel();
        let device = Arc::clone(self);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            device.complete_read(generation);
        });

        *slot = Some(PendingRead {
            generation,
            buffer,
            completion,
            timer: timer.abort_handle(),
        });
        drop(slot);
        drop(lifecycle);

        trace!(generation, ?interval, "read armed");
        Ok(ReadHandle { receiver })
    }

    /// Whether a read is waiting for its timer.
    #[must_use]
    pub fn has_pending_read(&self) -> bool {
        self.pending.is_pending()
    }

    fn complete_read(&self, generation: u64) {
        let Some(pending) = self.pending.take_generation(generation) else {
            trace!(generation, "timer fired after read was resolved");
            return;
        };
        let PendingRead {
            mut buffer,
            completion,
            ..
        } = pending;

        if completion.is_closed() {
            debug!(generation, "read abandoned by caller");
            return;
        }

        let result = self
            .fill_report(&mut buffer)
            .map(|(bytes_written, kind)| ReadCompletion {
                buffer,
                bytes_written,
                kind,
            });

        if completion.send(result).is_err() {
            debug!(generation, "reader went away before completion");
        }
    }

    fn fill_report(&self, buffer: &mut [u8]) -> DeviceResult<(usize, ReportKind)> {
        let lifecycle = self.lifecycle.read();
        if let Err(e) = lifecycle.ensure_operational() {
            self.reads.inc_not_ready();
            return Err(e);
        }

        if let Some(message) = self.queue.dequeue() {
            let written = write_motion_report(buffer, &message)?;
            self.reads.inc_motion();
            trace!(?message, "motion report");
            Ok((written, ReportKind::Motion(message)))
        } else {
            let written = write_idle_report(buffer)?;
            self.reads.inc_idle();
            trace!("idle report");
            Ok((written, ReportKind::Idle))
        }
    }

    pub(crate) fn cancel_pending_read(&self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        pending.timer.abort();
        self.reads.inc_cancelled();
        debug!(generation = pending.generation, "pending read cancelled");
        if pending.completion.send(Err(DeviceError::Cancelled)).is_err() {
            trace!("cancelled read had no listener");
        }
    }
}
