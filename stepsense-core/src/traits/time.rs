//! Time Source Abstraction
//!
//! This module provides the `TimeSource` trait which abstracts time handling
//! across platforms and test environments.
//!
//! ## Common Implementations
//!
//! - `MonotonicTime`: Milliseconds since the clock was created
//! - `SystemTime`: Wall clock time (may jump due to NTP)
//! - `MockTimeSource`: Controllable time for testing

use crate::time::Timestamp;

/// Source of time for the engine
///
/// The scheduler's timers and the motion source's release of samples both
/// read the same source, so sample timestamps and timer deadlines compare.
///
/// ## Example Implementation
///
/// ```rust
/// use stepsense_core::traits::TimeSource;
/// use stepsense_core::time::Timestamp;
///
/// struct TickCounter {
///     ticks: u64,
/// }
///
/// impl TimeSource for TickCounter {
///     fn now(&self) -> Timestamp {
///         self.ticks * 10 // 100 Hz tick
///     }
///
///     fn is_wall_clock(&self) -> bool {
///         false
///     }
///
///     fn precision_ms(&self) -> u32 {
///         10
///     }
/// }
/// ```
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    ///
    /// Monotonic sources count from an arbitrary origin; wall clock sources
    /// count from the Unix epoch.
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Smallest time difference this source can measure, in milliseconds
    fn precision_ms(&self) -> u32;
}
