//! Poll interval shared between the control path and the read path.
//!
//! The interval is a lone `AtomicU32` read with relaxed ordering. A change
//! races benignly with an in-flight timer: it only affects the next timer
//! armed by [`begin_read`](crate::VirtualMouse::begin_read).

use core::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Outcome of [`PollConfig::exchange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalExchange {
    /// Interval before the call (microseconds).
    pub previous_us: u32,
    /// Whether the requested value was stored.
    pub accepted: bool,
}

/// Current poll interval plus its floor.
#[derive(Debug)]
pub struct PollConfig {
    interval_us: AtomicU32,
    floor_us: u32,
}

impl PollConfig {
    /// Create with a starting interval and a floor.
    #[must_use]
    pub const fn new(interval_us: u32, floor_us: u32) -> Self {
        Self {
            interval_us: AtomicU32::new(interval_us),
            floor_us,
        }
    }

    /// Current interval in microseconds.
    #[must_use]
    pub fn interval_us(&self) -> u32 {
        self.interval_us.load(Ordering::Relaxed)
    }

    /// Current interval as a `Duration`.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_micros(u64::from(self.interval_us()))
    }

    /// Smallest accepted interval in microseconds.
    #[must_use]
    pub const fn floor_us(&self) -> u32 {
        self.floor_us
    }

    /// Store `requested_us` if it is at or above the floor, and report the
    /// interval that was in effect before. A rejected request leaves the
    /// interval untouched, which makes `0` a pure read.
    pub fn exchange(&self, requested_us: u32) -> IntervalExchange {
        if requested_us >= self.floor_us {
            IntervalExchange {
                previous_us: self.interval_us.swap(requested_us, Ordering::Relaxed),
                accepted: true,
            }
        } else {
            IntervalExchange {
                previous_us: self.interval_us(),
                accepted: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_at_floor() {
        let poll = PollConfig::new(8000, 5000);
        let result = poll.exchange(5000);
        assert_eq!(
            result,
            IntervalExchange {
                previous_us: 8000,
                accepted: true
            }
        );
        assert_eq!(poll.interval_us(), 5000);
    }

    #[test]
    fn test_exchange_below_floor() {
        let poll = PollConfig::new(8000, 5000);
        let result = poll.exchange(4999);
        assert!(!result.accepted);
        assert_eq!(result.previous_us, 8000);
        assert_eq!(poll.interval_us(), 8000);
    }

    #[test]
    fn test_zero_peeks() {
        let poll = PollConfig::new(8000, 5000);
        assert_eq!(poll.exchange(0).previous_us, 8000);
        assert_eq!(poll.interval(), Duration::from_millis(8));
    }

    #[test]
    fn test_previous_tracks_last_store() {
        let poll = PollConfig::new(8000, 5000);
        assert!(poll.exchange(10_000).accepted);
        assert_eq!(poll.exchange(12_000).previous_us, 10_000);
        assert_eq!(poll.floor_us(), 5000);
    }
}
