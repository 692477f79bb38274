//! Calibration Persistence Collaborator

use crate::calibration::CalibrationRecord;
use crate::errors::StoreError;

/// Durable store for calibration snapshots
///
/// The store owns the schema, the key (typically the calendar date) and the
/// freshness policy. The engine only hands records over and takes them back.
pub trait CalibrationStore {
    /// Latest record still fresh enough to restore
    ///
    /// `Ok(None)` means nothing usable is stored and the session should start
    /// from zero.
    fn load(&mut self) -> Result<Option<CalibrationRecord>, StoreError>;

    /// Persist a snapshot, replacing the previous one for the same key
    fn save(&mut self, record: &CalibrationRecord) -> Result<(), StoreError>;
}
