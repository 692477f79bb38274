//! Scheduling Constants
//!
//! Power-state machine, gravity estimation and timer periods used by the
//! sensor scheduler.

// ===== POWER STATE =====

/// Motion magnitude that counts as activity.
///
/// Evaluated on the motion component (after gravity removal). Any sample
/// above it refreshes the idle timer and wakes an idle scheduler.
pub const WAKE_MAGNITUDE_THRESHOLD: f32 = 1.5;

/// Reference sample rate the power model is normalised to (Hz).
pub const POWER_REFERENCE_RATE_HZ: f32 = 20.0;

/// Relative processing cost while idle.
pub const IDLE_POWER_FACTOR: f32 = 0.1;

/// Saving credited to batched dispatch.
pub const BATCHING_POWER_FACTOR: f32 = 0.8;

// ===== GRAVITY ESTIMATION =====

/// Weight of the previous gravity estimate.
///
/// gravity' = 0.8 · gravity + 0.2 · raw
pub const GRAVITY_FILTER_ALPHA: f32 = 0.8;

// ===== TIMERS =====

/// Period of the idle check timer (ms).
///
/// Shortened to the idle timeout when that is smaller.
pub const IDLE_CHECK_INTERVAL_MS: u64 = 1000;

/// Period between calibration checkpoints written by a session (ms).
pub const CHECKPOINT_INTERVAL_MS: u64 = super::time::MS_PER_MINUTE;

/// Most samples pulled from the source in one poll.
///
/// Keeps a single poll short even if a source backs up.
pub const MAX_SAMPLES_PER_POLL: usize = 4096;
