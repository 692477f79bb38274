//! Restore freshness policy

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::snapshot::CalibrationSnapshot;

/// Decides whether a stored snapshot may seed a new session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// Oldest snapshot still restored
    pub max_age: Duration,
    /// Only restore snapshots from the current calendar day
    pub same_day: bool,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(1),
            same_day: true,
        }
    }
}

impl FreshnessPolicy {
    /// Whether `snapshot` is fresh at `now`, given the local `today`
    ///
    /// Snapshots stamped in the future (clock moved backwards) are stale.
    pub fn is_fresh(&self, snapshot: &CalibrationSnapshot, now: DateTime<Utc>, today: NaiveDate) -> bool {
        let age = now.signed_duration_since(snapshot.saved_at);
        if age < Duration::zero() || age > self.max_age {
            return false;
        }
        !self.same_day || snapshot.date == today
    }
}
