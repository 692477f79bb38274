//! Tracker configuration
//!
//! `TrackerConfig` is the complete, always-valid configuration of a tracking
//! session. Changes arrive as a `ConfigUpdate` whose fields are all optional and
//! are applied by one pure merge that clamps every field into range. Nothing in
//! the configuration surface is ever rejected.
//!
//! ```rust
//! use stepsense_core::{ConfigUpdate, TrackerConfig};
//!
//! let update: ConfigUpdate = serde_json::from_str(r#"{"sensitivity": 5.0, "sampleRate": 10}"#).unwrap();
//! let config = TrackerConfig::default().merged(&update);
//!
//! assert_eq!(config.sensitivity, 2.0); // clamped
//! assert_eq!(config.sample_rate_hz, 10);
//! ```

use crate::constants::limits::*;
use crate::constants::time::MS_PER_SECOND;

/// Full configuration of a tracking session
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrackerConfig {
    /// Threshold multiplier, [0.5, 2.0]
    pub sensitivity: f32,
    /// Refractory period between accepted steps (ms)
    pub min_step_interval_ms: u64,
    /// Target processing rate; faster samples are dropped (Hz)
    pub sample_rate_hz: u32,
    /// Moving-average window (samples)
    pub filter_window_size: usize,
    /// Batch dispatch period (ms)
    pub batch_interval_ms: u64,
    /// Inactivity before going idle (ms)
    pub idle_timeout_ms: u64,
    /// Discard sub-wake samples while idle
    pub enable_sleep_mode: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            min_step_interval_ms: DEFAULT_MIN_STEP_INTERVAL_MS,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            filter_window_size: DEFAULT_FILTER_WINDOW,
            batch_interval_ms: DEFAULT_BATCH_INTERVAL_MS,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            enable_sleep_mode: true,
        }
    }
}

impl TrackerConfig {
    /// Apply `update` on top of `self`, clamping every field
    ///
    /// Absent fields and a NaN sensitivity keep the current value.
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        let sensitivity = match update.sensitivity {
            Some(value) if !value.is_nan() => value,
            _ => self.sensitivity,
        };

        Self {
            sensitivity,
            min_step_interval_ms: update.min_step_interval_ms.unwrap_or(self.min_step_interval_ms),
            sample_rate_hz: update.sample_rate_hz.unwrap_or(self.sample_rate_hz),
            filter_window_size: update.filter_window_size.unwrap_or(self.filter_window_size),
            batch_interval_ms: update.batch_interval_ms.unwrap_or(self.batch_interval_ms),
            idle_timeout_ms: update.idle_timeout_ms.unwrap_or(self.idle_timeout_ms),
            enable_sleep_mode: update.enable_sleep_mode.unwrap_or(self.enable_sleep_mode),
        }
        .clamped()
    }

    /// The same configuration with every field forced into its valid range
    pub fn clamped(self) -> Self {
        let sensitivity = if self.sensitivity.is_nan() {
            DEFAULT_SENSITIVITY
        } else {
            clamp_sensitivity(self.sensitivity)
        };

        Self {
            sensitivity,
            min_step_interval_ms: self
                .min_step_interval_ms
                .clamp(MIN_STEP_INTERVAL_MIN_MS, MIN_STEP_INTERVAL_MAX_MS),
            sample_rate_hz: self.sample_rate_hz.clamp(SAMPLE_RATE_MIN_HZ, SAMPLE_RATE_MAX_HZ),
            filter_window_size: self.filter_window_size.clamp(FILTER_WINDOW_MIN, FILTER_WINDOW_MAX),
            batch_interval_ms: self
                .batch_interval_ms
                .clamp(BATCH_INTERVAL_MIN_MS, BATCH_INTERVAL_MAX_MS),
            idle_timeout_ms: self.idle_timeout_ms.clamp(IDLE_TIMEOUT_MIN_MS, IDLE_TIMEOUT_MAX_MS),
            enable_sleep_mode: self.enable_sleep_mode,
        }
    }

    /// Minimum spacing between processed samples (ms)
    pub fn sample_interval_ms(&self) -> u64 {
        MS_PER_SECOND / self.sample_rate_hz.max(1) as u64
    }

    /// The subset of the configuration the detector consumes
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            sensitivity: self.sensitivity,
            min_step_interval_ms: self.min_step_interval_ms,
            filter_window_size: self.filter_window_size,
        }
    }
}

/// Partial configuration; `None` leaves a field unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ConfigUpdate {
    /// New threshold multiplier
    pub sensitivity: Option<f32>,
    /// New refractory period (ms)
    #[cfg_attr(feature = "serde", serde(alias = "minStepInterval"))]
    pub min_step_interval_ms: Option<u64>,
    /// New processing rate (Hz)
    #[cfg_attr(feature = "serde", serde(alias = "sampleRate"))]
    pub sample_rate_hz: Option<u32>,
    /// New moving-average window (samples)
    pub filter_window_size: Option<usize>,
    /// New batch period (ms)
    #[cfg_attr(feature = "serde", serde(alias = "batchInterval"))]
    pub batch_interval_ms: Option<u64>,
    /// New idle timeout (ms)
    #[cfg_attr(feature = "serde", serde(alias = "idleTimeout"))]
    pub idle_timeout_ms: Option<u64>,
    /// New sleep mode flag
    pub enable_sleep_mode: Option<bool>,
}

impl ConfigUpdate {
    /// True when the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Detection parameters handed to the step detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Threshold multiplier, [0.5, 2.0]
    pub sensitivity: f32,
    /// Refractory period between accepted steps (ms)
    pub min_step_interval_ms: u64,
    /// Moving-average window (samples), [3, 32]
    pub filter_window_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        TrackerConfig::default().detector_config()
    }
}

impl DetectorConfig {
    /// The same parameters forced into their valid ranges
    pub fn clamped(self) -> Self {
        let sensitivity = if self.sensitivity.is_nan() {
            DEFAULT_SENSITIVITY
        } else {
            clamp_sensitivity(self.sensitivity)
        };

        Self {
            sensitivity,
            min_step_interval_ms: self
                .min_step_interval_ms
                .clamp(MIN_STEP_INTERVAL_MIN_MS, MIN_STEP_INTERVAL_MAX_MS),
            filter_window_size: self.filter_window_size.clamp(FILTER_WINDOW_MIN, FILTER_WINDOW_MAX),
        }
    }
}

/// Clamp a sensitivity into [0.5, 2.0]; NaN maps to the lower bound
pub fn clamp_sensitivity(value: f32) -> f32 {
    if value.is_nan() {
        return SENSITIVITY_MIN;
    }
    value.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
}
