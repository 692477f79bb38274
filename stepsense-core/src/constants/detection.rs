//! Step Detection Constants
//!
//! Values that shape the adaptive threshold and the acceptance gates of the
//! step detector. Units follow the motion source (typically m/s² of linear
//! acceleration).

// ===== ADAPTIVE THRESHOLD =====

/// Lowest value the adaptive threshold may take.
///
/// A stationary device produces a near-constant history whose standard
/// deviation collapses to zero. Without a floor the threshold would follow
/// the mean down and sensor noise would register as steps.
pub const THRESHOLD_FLOOR: f32 = 0.8;

/// Multiplier applied to the activity standard deviation.
///
/// threshold = mean + 1.5 · stddev · sensitivity
pub const THRESHOLD_STDDEV_FACTOR: f32 = 1.5;

// ===== PLAUSIBILITY GATE =====

/// Smallest peak magnitude accepted as a footfall.
pub const PLAUSIBLE_PEAK_MIN: f32 = 0.5;

/// Largest peak magnitude accepted as a footfall.
///
/// Hand gestures, drops and vehicle vibration produce larger spikes.
pub const PLAUSIBLE_PEAK_MAX: f32 = 4.0;

// ===== CALIBRATION RESTORE =====

/// Real samples needed before a restored threshold stops influencing the
/// computed one.
///
/// The restored threshold is blended linearly with the computed threshold
/// over this many samples (one second at the default 20 Hz).
pub const RESTORE_WARMUP_SAMPLES: usize = 20;
