//! Buffer Sizes
//!
//! Fixed capacities for the bounded buffers owned by the detector and the
//! scheduler. All buffers are allocated once, inline.

/// Raw magnitudes kept for the adaptive threshold statistics.
pub const ACTIVITY_HISTORY_SIZE: usize = 100;

/// Largest moving-average window the detector accepts.
///
/// The magnitude window holds twice this many samples.
pub const MAX_FILTER_WINDOW: usize = 32;

/// Capacity of the magnitude window (2 × `MAX_FILTER_WINDOW`).
pub const MAGNITUDE_BUFFER_CAPACITY: usize = 2 * MAX_FILTER_WINDOW;

/// Samples the scheduler buffers before dispatching a batch early.
///
/// 100 Hz for 10 s. Longer intervals at high rates dispatch when full.
pub const MAX_BATCH_SAMPLES: usize = 1024;
