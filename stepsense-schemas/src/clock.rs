//! Wall clocks for snapshot timestamps
//!
//! The store needs real dates (calendar day, age of a snapshot), unlike the
//! engine's millisecond `TimeSource`. Tests swap in `ManualClock`.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Source of the current instant and the user's local offset
pub trait WallClock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Offset used to decide which calendar day an instant belongs to
    fn local_offset(&self) -> FixedOffset;

    /// Local calendar day of `instant`
    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.local_offset()).date_naive()
    }
}

/// The operating system clock and time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        Local::now().offset().fix()
    }
}

/// Settable clock sharing its instant between clones
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Clock frozen at `start`, with UTC as the local offset
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
            offset: Utc.fix(),
        }
    }

    /// Use `offset` to decide calendar days
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Jump to `instant`
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis.store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    /// Move forward by `delta`
    pub fn advance(&self, delta: chrono::Duration) {
        self.millis.fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_is_shared() {
        let start = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(chrono::Duration::minutes(90));
        assert_eq!(clock.now(), start + chrono::Duration::minutes(90));
    }

    #[test]
    fn local_date_follows_offset() {
        // 23:30 UTC is already the next day at UTC+2
        let instant = Utc.with_ymd_and_hms(2026, 10, 17, 23, 30, 0).unwrap();
        let clock = ManualClock::new(instant)
            .with_offset(FixedOffset::east_opt(2 * 3600).unwrap());

        assert_eq!(clock.local_date(instant), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }
}
