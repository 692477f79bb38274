//! Constants for StepSense Core
//!
//! Centralised, documented constants used by the detector and the scheduler.
//! Every tunable that is not part of the runtime configuration lives here.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Detection**: Threshold floor, plausibility band, restore warmup
//! - **Scheduling**: Wake threshold, power model factors, timer periods
//! - **Buffers**: Fixed capacities for bounded buffers
//! - **Time**: Unit conversions
//! - **Limits**: Clamp ranges applied when configuration is merged

/// Step detection algorithm constants.
pub mod detection;

/// Scheduler, power-state and timer constants.
pub mod scheduling;

/// Fixed buffer capacities.
pub mod buffers;

/// Time unit conversions.
pub mod time;

/// Configuration defaults and clamp ranges.
pub mod limits;

// Re-export commonly used constants for convenience
pub use detection::{
    THRESHOLD_FLOOR, THRESHOLD_STDDEV_FACTOR,
    PLAUSIBLE_PEAK_MIN, PLAUSIBLE_PEAK_MAX,
};

pub use scheduling::{
    WAKE_MAGNITUDE_THRESHOLD, GRAVITY_FILTER_ALPHA,
    IDLE_CHECK_INTERVAL_MS, CHECKPOINT_INTERVAL_MS,
};

pub use buffers::{ACTIVITY_HISTORY_SIZE, MAX_FILTER_WINDOW, MAX_BATCH_SAMPLES};

pub use time::{MS_PER_SECOND, MS_PER_MINUTE, MS_PER_HOUR};
