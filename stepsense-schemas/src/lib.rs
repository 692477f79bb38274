//! Calibration Snapshot Schema and JSON File Store
//!
//! ## Overview
//!
//! The step engine performs no I/O. This crate is its persistence collaborator:
//! it wraps a `CalibrationRecord` in a versioned, date-keyed snapshot, decides
//! whether a stored snapshot is still fresh enough to restore, and keeps one
//! JSON file per calendar day on disk.
//!
//! ## Snapshot Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "date": "2026-10-17",
//!   "savedAt": "2026-10-17T08:30:00Z",
//!   "record": {
//!     "threshold": 1.21,
//!     "sensitivity": 1.0,
//!     "averageActivity": 0.47,
//!     "stepCount": 4321
//!   }
//! }
//! ```
//!
//! `date` is the local calendar day the steps belong to; `savedAt` is the UTC
//! instant of the write and drives the freshness check.
//!
//! ## Freshness
//!
//! A snapshot is restored only when it was written within the last hour and
//! belongs to today. Anything else means the session starts from zero: the
//! threshold would be tuned to an activity level that no longer applies, and a
//! new day starts a new count.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stepsense_schemas::JsonFileStore;
//! use stepsense_core::CalibrationStore;
//!
//! let mut store = JsonFileStore::new("/var/lib/stepsense");
//! if let Ok(Some(record)) = store.load() {
//!     println!("resuming at {} steps", record.step_count);
//! }
//! ```

pub mod clock;
pub mod freshness;
pub mod snapshot;
pub mod store;

pub use clock::{ManualClock, SystemClock, WallClock};
pub use freshness::FreshnessPolicy;
pub use snapshot::{CalibrationSnapshot, SNAPSHOT_VERSION};
pub use store::JsonFileStore;

use stepsense_core::StoreError;

/// Snapshot and file store errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum SchemaError {
    /// Reading, writing or renaming a snapshot file failed
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid snapshot document
    #[error("Malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// The snapshot was written by a newer or unknown format version
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

impl From<SchemaError> for StoreError {
    fn from(error: SchemaError) -> Self {
        match error {
            SchemaError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                StoreError::Unavailable
            }
            SchemaError::Io(_) => StoreError::Io("calibration file could not be read or written"),
            SchemaError::Parse(_) => StoreError::Format("calibration snapshot is not valid JSON"),
            SchemaError::UnsupportedVersion(_) => {
                StoreError::Format("calibration snapshot version is not supported")
            }
        }
    }
}
