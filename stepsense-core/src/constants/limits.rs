//! Configuration Defaults and Clamp Ranges
//!
//! Out-of-range configuration is never rejected; the merge clamps each field
//! into the range below.

use super::time::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

// ===== SENSITIVITY =====

/// Default threshold multiplier.
pub const DEFAULT_SENSITIVITY: f32 = 1.0;
/// Lowest accepted sensitivity.
pub const SENSITIVITY_MIN: f32 = 0.5;
/// Highest accepted sensitivity.
pub const SENSITIVITY_MAX: f32 = 2.0;

// ===== REFRACTORY PERIOD =====

/// Default minimum spacing between accepted steps (ms).
///
/// Collapses the two acceleration lobes of one footfall into one event.
pub const DEFAULT_MIN_STEP_INTERVAL_MS: u64 = 300;
/// Shortest accepted refractory period (ms).
pub const MIN_STEP_INTERVAL_MIN_MS: u64 = 50;
/// Longest accepted refractory period (ms).
pub const MIN_STEP_INTERVAL_MAX_MS: u64 = 2000;

// ===== SAMPLING =====

/// Default processing rate (Hz).
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 20;
/// Slowest accepted rate (Hz).
pub const SAMPLE_RATE_MIN_HZ: u32 = 1;
/// Fastest accepted rate (Hz).
pub const SAMPLE_RATE_MAX_HZ: u32 = 100;

// ===== FILTER WINDOW =====

/// Default moving-average window (samples).
pub const DEFAULT_FILTER_WINDOW: usize = 10;
/// Smallest window; the peak test needs three buffered samples.
pub const FILTER_WINDOW_MIN: usize = 3;
/// Largest window.
pub const FILTER_WINDOW_MAX: usize = super::buffers::MAX_FILTER_WINDOW;

// ===== BATCHING =====

/// Default batch dispatch period (ms).
pub const DEFAULT_BATCH_INTERVAL_MS: u64 = 5000;
/// Shortest batch period (ms).
pub const BATCH_INTERVAL_MIN_MS: u64 = 100;
/// Longest batch period (ms).
pub const BATCH_INTERVAL_MAX_MS: u64 = MS_PER_MINUTE;

// ===== IDLE =====

/// Default inactivity before the scheduler goes idle (ms).
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 5 * MS_PER_MINUTE;
/// Shortest idle timeout (ms).
pub const IDLE_TIMEOUT_MIN_MS: u64 = MS_PER_SECOND;
/// Longest idle timeout (ms).
pub const IDLE_TIMEOUT_MAX_MS: u64 = MS_PER_HOUR;
