//! Bounded ring queue.
//!
//! A ring of `C` slots with one slot always left unused, so that
//! `head == tail` means empty and `(tail + 1) % C == head` means full without
//! a separate length field. Usable capacity is therefore `C - 1`.
//!
//! # Locking
//!
//! One [`parking_lot::Mutex`] guards the indices and the slots. Every
//! critical section is an index update plus a copy of one `T`; nothing inside
//! allocates, iterates over the ring, or takes another lock. Contended
//! callers spin briefly before parking, so a producer on the control path is
//! never held up for longer than one such section.

use parking_lot::Mutex;

use crate::counters::{QueueCounterSnapshot, QueueCounters};
use crate::error::{QueueError, QueueResult};

/// Default ring size.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Smallest ring that can hold one message.
pub const MIN_CAPACITY: usize = 2;

#[derive(Debug)]
struct Ring<T> {
    slots: Box<[T]>,
    head: usize,
    tail: usize,
}

impl<T: Copy> Ring<T> {
    fn push(&mut self, message: T) -> bool {
        let len = self.slots.len();
        if len == 0 {
            return false;
        }
        let next = (self.tail + 1) % len;
        if next == self.head {
            return false;
        }
        match self.slots.get_mut(self.tail) {
            Some(slot) => *slot = message,
            None => return false,
        }
        self.tail = next;
        true
    }

    fn pop(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }
        let message = *self.slots.get(self.head)?;
        self.head = (self.head + 1) % self.slots.len();
        Some(message)
    }

    fn depth(&self) -> usize {
        let len = self.slots.len();
        if len == 0 {
            return 0;
        }
        (self.tail + len - self.head) % len
    }
}

/// Fixed-capacity FIFO shared between one producer and one consumer.
///
/// Messages are copied in and out; the queue never hands out references into
/// its storage, so a reader can never observe a half-written record.
///
/// # Example
///
/// ```rust
/// use ghostpoint_queue::MessageQueue;
///
/// let queue = MessageQueue::<u32>::new(4)?;
/// assert!(queue.enqueue(1));
/// assert!(queue.enqueue(2));
/// assert!(queue.enqueue(3));
/// assert!(!queue.enqueue(4)); // one slot stays unused
///
/// assert_eq!(queue.dequeue(), Some(1));
/// assert_eq!(queue.depth(), 2);
/// # Ok::<(), ghostpoint_queue::QueueError>(())
/// ```
#[derive(Debug)]
pub struct MessageQueue<T> {
    ring: Mutex<Ring<T>>,
    capacity: usize,
    counters: QueueCounters,
}

impl<T: Copy + Default> MessageQueue<T> {
    /// Allocate a ring of `capacity` slots.
    ///
    /// This is the only allocation the queue performs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCapacity` if `capacity` is below [`MIN_CAPACITY`].
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity < MIN_CAPACITY {
            return Err(QueueError::InvalidCapacity(capacity));
        }
        Ok(Self {
            ring: Mutex::new(Ring {
                slots: vec![T::default(); capacity].into_boxed_slice(),
                head: 0,
                tail: 0,
            }),
            capacity,
            counters: QueueCounters::new(),
        })
    }

    /// Append a message.
    ///
    /// Returns `false` without touching the ring if it is full or has been
    /// released.
    #[must_use = "a full queue drops the message"]
    pub fn enqueue(&self, message: T) -> bool {
        let accepted = self.ring.lock().push(message);
        if accepted {
            self.counters.inc_enqueued();
        } else {
            self.counters.inc_rejected();
        }
        accepted
    }

    /// Remove the oldest message, or `None` if the ring is empty.
    pub fn dequeue(&self) -> Option<T> {
        let message = self.ring.lock().pop();
        if message.is_some() {
            self.counters.inc_dequeued();
        }
        message
    }

    /// Drop every queued message. Never fails.
    pub fn clear(&self) {
        {
            let mut ring = self.ring.lock();
            ring.head = 0;
            ring.tail = 0;
        }
        self.counters.inc_clears();
    }

    /// Number of queued messages, in `[0, capacity - 1]`.
    ///
    /// This is a snapshot; it may be stale by the time the caller looks at it.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ring.lock().depth()
    }

    /// Whether no messages are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// Whether the next `enqueue` would be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        let ring = self.ring.lock();
        let len = ring.slots.len();
        len == 0 || (ring.tail + 1) % len == ring.head
    }

    /// Ring size `C` as configured, including the unused slot.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Messages the ring can hold at once: `C - 1`.
    #[must_use]
    pub fn usable_capacity(&self) -> usize {
        self.capacity - 1
    }

    /// Free the ring storage.
    ///
    /// Afterwards `enqueue` returns `false`, `dequeue` returns `None` and
    /// `depth` is 0. Calling it again is a no-op.
    pub fn release(&self) {
        let storage = {
            let mut ring = self.ring.lock();
            ring.head = 0;
            ring.tail = 0;
            std::mem::take(&mut ring.slots)
        };
        drop(storage);
    }

    /// Whether [`release`](Self::release) has run.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.ring.lock().slots.is_empty()
    }

    /// Traffic counters.
    #[must_use]
    pub fn counters(&self) -> QueueCounterSnapshot {
        self.counters.snapshot()
    }
}
