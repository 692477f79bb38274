//! Calibration snapshot exchanged with persistence
//!
//! The detector's adaptive state collapses into four numbers. A snapshot taken
//! with `StepDetector::calibration_data` and handed back through
//! `StepDetector::restore_calibration` lets a restarted session resume counting
//! with a threshold close to where it left off.
//!
//! Serialised form (camelCase JSON):
//!
//! ```json
//! { "threshold": 1.5, "sensitivity": 1.2, "averageActivity": 1.0, "stepCount": 100 }
//! ```

use crate::config::clamp_sensitivity;
use crate::constants::detection::THRESHOLD_FLOOR;

/// Serializable snapshot of the detector's adaptive variables
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalibrationRecord {
    /// Adaptive threshold at snapshot time
    pub threshold: f32,
    /// Sensitivity multiplier in effect
    pub sensitivity: f32,
    /// Mean of the activity history
    pub average_activity: f32,
    /// Cumulative step count
    pub step_count: u64,
}

impl Default for CalibrationRecord {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD_FLOOR,
            sensitivity: 1.0,
            average_activity: 0.0,
            step_count: 0,
        }
    }
}

impl CalibrationRecord {
    /// The same record with values a detector can safely adopt
    ///
    /// Non-finite numbers fall back to the defaults, the threshold is raised to
    /// the floor and the sensitivity is clamped.
    pub fn sanitized(self) -> Self {
        let threshold = if self.threshold.is_finite() {
            self.threshold.max(THRESHOLD_FLOOR)
        } else {
            THRESHOLD_FLOOR
        };
        let sensitivity = if self.sensitivity.is_finite() {
            clamp_sensitivity(self.sensitivity)
        } else {
            1.0
        };
        let average_activity = if self.average_activity.is_finite() {
            self.average_activity.max(0.0)
        } else {
            0.0
        };

        Self {
            threshold,
            sensitivity,
            average_activity,
            step_count: self.step_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_repairs_bad_values() {
        let record = CalibrationRecord {
            threshold: 0.1,
            sensitivity: f32::INFINITY,
            average_activity: f32::NAN,
            step_count: 7,
        }
        .sanitized();

        assert_eq!(record.threshold, THRESHOLD_FLOOR);
        assert_eq!(record.sensitivity, 1.0);
        assert_eq!(record.average_activity, 0.0);
        assert_eq!(record.step_count, 7);
    }

    #[test]
    fn json_shape() {
        let record = CalibrationRecord {
            threshold: 1.5,
            sensitivity: 1.25,
            average_activity: 1.0,
            step_count: 100,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"threshold":1.5,"sensitivity":1.25,"averageActivity":1.0,"stepCount":100}"#
        );

        let back: CalibrationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
