//! Device lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//!   NotStarted ──Start──▶ Started ──QueryStop──▶ StopPending ──Stop──▶ Stopped
//!                          │ ▲ ▲                     │                   │ │
//!                          │ │ └─────CancelStop──────┘                   │ │
//!                          │ └────────────────Start──────────────────────┘ │
//!                          ├──Stop──────────────────────────▶ Stopped      │
//!                          └──QueryRemove──▶ RemovePending ◀──QueryRemove──┘
//!                                                 │
//!                                   CancelRemove ─┴─▶ previous state
//!
//!   Started | StopPending | Stopped | RemovePending ──SurpriseRemoval──▶ SurpriseRemovePending
//!   any ──Remove──▶ Deleted (terminal)
//! ```
//!
//! Only `Started` admits control requests and reads. The machine remembers
//! one previous state, which is where `CancelStop` and `CancelRemove`
//! return to. There is no stack: a query issued while another query is
//! pending is refused rather than nested.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};

/// Lifecycle state of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceState {
    /// Created, not yet started.
    NotStarted,
    /// Serving control requests and reads.
    Started,
    /// The host asked whether the device may stop.
    StopPending,
    /// Stopped; may be started again.
    Stopped,
    /// The host asked whether the device may be removed.
    RemovePending,
    /// The device vanished without a query.
    SurpriseRemovePending,
    /// Torn down. Terminal.
    Deleted,
}

impl DeviceState {
    /// Whether control requests and reads are admitted.
    #[must_use]
    pub const fn is_operational(self) -> bool {
        matches!(self, Self::Started)
    }

    /// Whether the state can never be left.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Lifecycle notification from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Bring the device up.
    Start,
    /// Take the device down.
    Stop,
    /// Ask whether a stop is acceptable.
    QueryStop,
    /// Abandon a queried stop.
    CancelStop,
    /// Ask whether removal is acceptable.
    QueryRemove,
    /// Abandon a queried removal.
    CancelRemove,
    /// The device disappeared.
    SurpriseRemoval,
    /// Final teardown.
    Remove,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a successful [`Lifecycle::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State before the event.
    pub from: DeviceState,
    /// State after the event. Equal to `from` for no-op events.
    pub to: DeviceState,
    /// The event applied.
    pub event: LifecycleEvent,
}

impl Transition {
    /// Whether the state actually changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Current state plus the single saved previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    current: DeviceState,
    previous: DeviceState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A fresh machine in `NotStarted`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: DeviceState::NotStarted,
            previous: DeviceState::NotStarted,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn current(&self) -> DeviceState {
        self.current
    }

    /// Saved previous state.
    #[must_use]
    pub const fn previous(&self) -> DeviceState {
        self.previous
    }

    /// Fail with `NotReady` unless the device is `Started`.
    ///
    /// # Errors
    ///
    /// Returns `NotReady` carrying the current state.
    pub fn ensure_operational(&self) -> DeviceResult<()> {
        if self.current.is_operational() {
            Ok(())
        } else {
            Err(DeviceError::not_ready(self.current))
        }
    }

    /// Apply an event.
    ///
    /// Cancel events that arrive when the matching query is not pending are
    /// accepted as no-ops, as is `Remove` on an already deleted device.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the event is not valid in the current
    /// state. The state is left unchanged.
    pub fn apply(&mut self, event: LifecycleEvent) -> DeviceResult<Transition> {
        use DeviceState::{
            Deleted, NotStarted, RemovePending, Started, StopPending, Stopped,
            SurpriseRemovePending,
        };
        use LifecycleEvent::{
            CancelRemove, CancelStop, QueryRemove, QueryStop, Remove, Start, Stop,
            SurpriseRemoval,
        };

        let from = self.current;
        let to = match (event, from) {
            (Remove, _) => Deleted,
            (_, Deleted) => return Err(DeviceError::InvalidTransition { from, event }),
            (Start, NotStarted | Stopped) => Started,
            (Stop, Started | StopPending) => Stopped,
            (QueryStop, Started) => StopPending,
            (QueryRemove, Started | Stopped) => RemovePending,
            (CancelStop, StopPending) | (CancelRemove, RemovePending) => self.previous,
            (CancelStop | CancelRemove, _) => from,
            (SurpriseRemoval, Started | StopPending | Stopped | RemovePending) => {
                SurpriseRemovePending
            }
            _ => return Err(DeviceError::InvalidTransition { from, event }),
        };

        if to != from {
            self.previous = from;
            self.current = to;
        }
        Ok(Transition { from, to, event })
    }
}
