//! Time management for the step engine
//!
//! Provides clock implementations for the `TimeSource` trait:
//! - Monotonic clock (for timers and sample timestamps)
//! - System clock (wall time, for persistence stamps)
//! - Mock clock (shared, advanceable; for tests and simulations)
//!
//! And the interval timer the scheduler uses for batch dispatch and idle checks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub use crate::traits::TimeSource;

/// Timestamp in milliseconds (since an arbitrary monotonic origin, or the Unix
/// epoch for wall clocks)
pub type Timestamp = u64;

/// Monotonic time source measuring milliseconds since construction
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    /// Start a clock at zero
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Wall clock time source (milliseconds since the Unix epoch)
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Controllable time source
///
/// Clones share the same clock, so a test can keep one handle and advance the
/// time seen by a scheduler that owns another.
#[derive(Debug, Clone)]
pub struct MockTimeSource {
    current: Arc<AtomicU64>,
}

impl MockTimeSource {
    /// Create a clock reading `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, timestamp: Timestamp) {
        self.current.store(timestamp, Ordering::Relaxed);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.current.fetch_add(ms, Ordering::Relaxed);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.current.load(Ordering::Relaxed)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Periodic timer driven by explicit polling
///
/// There is no background thread: the owner calls `poll(now)` from its event
/// loop and acts when it returns `true`. A late poll fires once, however many
/// periods were missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period_ms: u64,
    next_due: Option<Timestamp>,
}

impl IntervalTimer {
    /// Create a disarmed timer; a zero period is raised to 1 ms
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms: if period_ms == 0 { 1 } else { period_ms },
            next_due: None,
        }
    }

    /// Start (or restart) the timer so it first fires one period after `now`
    pub fn arm(&mut self, now: Timestamp) {
        self.next_due = Some(now.saturating_add(self.period_ms));
    }

    /// Stop the timer; pending firings are dropped
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether the timer will fire again
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Timer period in milliseconds
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Next due time, if armed
    pub fn next_due(&self) -> Option<Timestamp> {
        self.next_due
    }

    /// Fire if due, rescheduling the next deadline
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let next = due.saturating_add(self.period_ms);
                self.next_due = Some(if next <= now { now + 1 } else { next });
                true
            }
            _ => false,
        }
    }
}
