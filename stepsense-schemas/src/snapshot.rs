//! Versioned calibration snapshot

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stepsense_core::CalibrationRecord;

use crate::SchemaError;

/// Current snapshot layout
pub const SNAPSHOT_VERSION: u32 = 1;

/// A calibration record stamped with its day and write time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationSnapshot {
    /// Layout version, see [`SNAPSHOT_VERSION`]
    pub version: u32,
    /// Local calendar day the step count belongs to
    pub date: NaiveDate,
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// The detector state
    pub record: CalibrationRecord,
}

impl CalibrationSnapshot {
    /// Stamp `record` with the current layout version
    pub fn new(record: CalibrationRecord, date: NaiveDate, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            date,
            saved_at,
            record,
        }
    }

    /// Parse a snapshot, rejecting layouts this build does not know
    pub fn from_json(bytes: &[u8]) -> Result<Self, SchemaError> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SchemaError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<Vec<u8>, SchemaError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_snapshot() -> CalibrationSnapshot {
        CalibrationSnapshot::new(
            CalibrationRecord {
                threshold: 1.25,
                sensitivity: 1.0,
                average_activity: 0.5,
                step_count: 4321,
            },
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 0).unwrap(),
        )
    }

    #[test]
    fn json_uses_camel_case_and_iso_dates() {
        let json = String::from_utf8(sample_snapshot().to_json().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["date"], "2026-10-17");
        assert_eq!(value["savedAt"], "2026-10-17T08:30:00Z");
        assert_eq!(value["record"]["stepCount"], 4321);
        assert_eq!(value["record"]["averageActivity"], 0.5);
    }

    #[test]
    fn parses_written_snapshot() {
        let snapshot = sample_snapshot();
        let parsed = CalibrationSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn rejects_unknown_version() {
        let json = br#"{
            "version": 7,
            "date": "2026-10-17",
            "savedAt": "2026-10-17T08:30:00Z",
            "record": {"threshold": 1.0, "sensitivity": 1.0, "averageActivity": 0.0, "stepCount": 0}
        }"#;

        assert!(matches!(
            CalibrationSnapshot::from_json(json),
            Err(SchemaError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            CalibrationSnapshot::from_json(b"{\"version\": 1"),
            Err(SchemaError::Parse(_))
        ));
    }
}
