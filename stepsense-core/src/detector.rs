//! Signal Filter and Step Detector
//!
//! ## Overview
//!
//! A stateful detector that consumes samples one at a time and decides, per
//! sample, whether a footfall has just been confirmed. It owns every piece of
//! adaptive state: the magnitude window, the activity history, the threshold and
//! the step count.
//!
//! ## Algorithm
//!
//! For each sample:
//!
//! 1. `magnitude = √(x² + y² + z²)`, appended to the magnitude window
//!    (capacity `2 × filter_window`) and the activity history (last 100).
//! 2. Cold start: fewer than `filter_window` buffered magnitudes ⇒ no step.
//! 3. Low-pass: moving average of the newest `filter_window` magnitudes. This is
//!    the detector's activity level, reported through `filtered_magnitude()`.
//! 4. Adaptive threshold: `max(0.8, mean + 1.5 · stddev · sensitivity)` over the
//!    activity history.
//! 5. Peak test on the three newest magnitudes `(prev, curr, next)`:
//!    `curr > prev && curr > next && curr > threshold`.
//! 6. Refractory gate: reject if `now − last_step < min_step_interval`.
//! 7. Plausibility gate: reject peaks outside `[0.5, 4.0]`.
//! 8. Accept: increment the count and remember `now` as the last step time.
//!
//! ```text
//!   magnitude
//!       │        curr
//!       │        ╱╲
//!       │  prev ╱  ╲ next       ← confirmed when `next` arrives
//!       │──────╱────╲──────── threshold
//!       │     ╱      ╲
//!       └───────────────────── time
//! ```
//!
//! ### Detection Lag
//!
//! A peak can only be recognised once the sample after it is buffered, so every
//! step is reported one sample interval after the footfall (50 ms at 20 Hz). The
//! refractory gate measures time at the confirming sample.
//!
//! ### Why the Peak Test Reads Raw Magnitudes
//!
//! A moving average spanning a whole gait period is flat: at 20 Hz with a
//! 10-sample window, a 2 Hz walk averages out completely. The peak test therefore
//! reads the raw buffered magnitudes and the average serves as the activity level.
//!
//! ## Calibration
//!
//! `calibration_data()` snapshots the threshold, sensitivity, mean activity and
//! count. `restore_calibration()` seeds the threshold directly, reseeds the history
//! with one synthetic sample at the stored mean activity, and blends the seeded
//! threshold into the computed one over the next 20 real samples so detection
//! resumes near the previous operating point instead of at the floor.

use crate::buffer::CircularBuffer;
use crate::calibration::CalibrationRecord;
use crate::config::{clamp_sensitivity, DetectorConfig};
use crate::constants::buffers::{ACTIVITY_HISTORY_SIZE, MAGNITUDE_BUFFER_CAPACITY};
use crate::constants::detection::{
    PLAUSIBLE_PEAK_MAX, PLAUSIBLE_PEAK_MIN, RESTORE_WARMUP_SAMPLES, THRESHOLD_FLOOR,
    THRESHOLD_STDDEV_FACTOR,
};
use crate::sample::Sample;
use crate::time::Timestamp;

/// A confirmed footfall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    /// Cumulative count including this step
    pub count: u64,
    /// Timestamp of the confirming sample
    pub timestamp: Timestamp,
}

/// Adaptive-threshold peak detector
#[derive(Clone)]
pub struct StepDetector {
    config: DetectorConfig,

    /// Newest raw magnitudes, capacity 2 × filter window
    magnitudes: CircularBuffer<f32, MAGNITUDE_BUFFER_CAPACITY>,

    /// Last 100 raw magnitudes for the threshold statistics
    activity: CircularBuffer<f32, ACTIVITY_HISTORY_SIZE>,

    threshold: f32,
    filtered: f32,

    step_count: u64,
    last_step: Option<StepEvent>,

    /// Threshold carried over from a restored snapshot, and how many real
    /// samples have arrived since
    seeded_threshold: Option<f32>,
    samples_since_restore: usize,
}

impl StepDetector {
    /// Create a detector; out-of-range parameters are clamped
    pub fn new(config: DetectorConfig) -> Self {
        let config = config.clamped();

        Self {
            magnitudes: CircularBuffer::with_limit(2 * config.filter_window_size),
            activity: CircularBuffer::new(),
            threshold: THRESHOLD_FLOOR,
            filtered: 0.0,
            step_count: 0,
            last_step: None,
            seeded_threshold: None,
            samples_since_restore: 0,
            config,
        }
    }

    /// Feed one sample; returns `true` when a step was confirmed by it
    ///
    /// Non-finite axes are treated as a zero vector. Never fails.
    pub fn process_sample(&mut self, sample: &Sample) -> bool {
        let magnitude = sample.sanitized().magnitude();

        self.magnitudes.push(magnitude);
        self.activity.push(magnitude);
        self.threshold = self.next_threshold();

        let window = self.config.filter_window_size;
        if self.magnitudes.len() < window {
            return false;
        }

        self.filtered = self.magnitudes.mean_of_newest(window);

        let (Some(prev), Some(curr), Some(next)) = (
            self.magnitudes.newest(2),
            self.magnitudes.newest(1),
            self.magnitudes.newest(0),
        ) else {
            return false;
        };

        if !(curr > prev && curr > next && curr > self.threshold) {
            return false;
        }

        if let Some(last) = self.last_step {
            if sample.timestamp.saturating_sub(last.timestamp) < self.config.min_step_interval_ms {
                return false;
            }
        }

        if !(PLAUSIBLE_PEAK_MIN..=PLAUSIBLE_PEAK_MAX).contains(&curr) {
            return false;
        }

        self.step_count = self.step_count.saturating_add(1);
        self.last_step = Some(StepEvent {
            count: self.step_count,
            timestamp: sample.timestamp,
        });
        true
    }

    /// Cumulative step count
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Most recently accepted step
    pub fn last_step(&self) -> Option<StepEvent> {
        self.last_step
    }

    /// Zero the count and clear all buffered signal state
    ///
    /// The sensitivity and other configuration survive. Replaying the same
    /// samples after a reset reproduces the same count.
    pub fn reset_step_count(&mut self) {
        self.step_count = 0;
        self.last_step = None;
        self.magnitudes.clear();
        self.activity.clear();
        self.threshold = THRESHOLD_FLOOR;
        self.filtered = 0.0;
        self.seeded_threshold = None;
        self.samples_since_restore = 0;
    }

    /// Change the threshold multiplier, clamped to [0.5, 2.0]
    ///
    /// Takes effect from the next sample; NaN is ignored.
    pub fn update_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_nan() {
            return;
        }
        self.config.sensitivity = clamp_sensitivity(sensitivity);
    }

    /// Apply new detection parameters without losing buffered state
    ///
    /// A smaller filter window keeps the newest magnitudes that still fit.
    pub fn apply_config(&mut self, config: DetectorConfig) {
        let config = config.clamped();
        self.magnitudes.set_capacity(2 * config.filter_window_size);
        self.config = config;
    }

    /// Snapshot of the adaptive state
    pub fn calibration_data(&self) -> CalibrationRecord {
        CalibrationRecord {
            threshold: self.threshold,
            sensitivity: self.config.sensitivity,
            average_activity: self.activity.mean(),
            step_count: self.step_count,
        }
    }

    /// Adopt a snapshot taken earlier, replacing the current state
    pub fn restore_calibration(&mut self, record: &CalibrationRecord) {
        let record = record.sanitized();

        self.reset_step_count();
        self.config.sensitivity = record.sensitivity;
        self.activity.push(record.average_activity);
        self.threshold = record.threshold;
        self.seeded_threshold = Some(record.threshold);
        self.step_count = record.step_count;
    }

    /// Current adaptive threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Moving average of the newest `filter_window` magnitudes
    pub fn filtered_magnitude(&self) -> f32 {
        self.filtered
    }

    /// Current sensitivity multiplier
    pub fn sensitivity(&self) -> f32 {
        self.config.sensitivity
    }

    /// Active detection parameters
    pub fn config(&self) -> DetectorConfig {
        self.config
    }

    /// Magnitudes currently held in the window
    pub fn buffered_samples(&self) -> usize {
        self.magnitudes.len()
    }

    fn next_threshold(&mut self) -> f32 {
        let computed = (self.activity.mean()
            + THRESHOLD_STDDEV_FACTOR * self.activity.std_dev() * self.config.sensitivity)
            .max(THRESHOLD_FLOOR);

        let Some(seed) = self.seeded_threshold else {
            return computed;
        };

        self.samples_since_restore += 1;
        if self.samples_since_restore >= RESTORE_WARMUP_SAMPLES {
            self.seeded_threshold = None;
            return computed;
        }

        let weight = self.samples_since_restore as f32 / RESTORE_WARMUP_SAMPLES as f32;
        seed * (1.0 - weight) + computed * weight
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl core::fmt::Debug for StepDetector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepDetector")
            .field("config", &self.config)
            .field("step_count", &self.step_count)
            .field("threshold", &self.threshold)
            .field("filtered", &self.filtered)
            .field("buffered", &self.magnitudes.len())
            .finish()
    }
}
