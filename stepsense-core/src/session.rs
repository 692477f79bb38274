//! Tracking session composition root
//!
//! Ties one scheduler to one calibration store. Opening a session restores the
//! stored calibration when the store still considers it fresh, otherwise the
//! session starts from zero. While running, `poll()` writes a checkpoint every
//! minute; `close()` writes a final one and hands the store back.
//!
//! Persistence never interferes with counting: store failures are logged and
//! the session carries on.

use crate::access::MotionAccess;
use crate::calibration::CalibrationRecord;
use crate::config::{ConfigUpdate, TrackerConfig};
use crate::constants::scheduling::CHECKPOINT_INTERVAL_MS;
use crate::detector::StepDetector;
use crate::errors::StoreError;
use crate::scheduler::{OptimizationStatus, SensorScheduler};
use crate::time::IntervalTimer;
use crate::traits::{CalibrationStore, MotionSource, TimeSource};

/// A scheduler plus its calibration store
pub struct TrackingSession<S: MotionSource, T: TimeSource, P: CalibrationStore> {
    scheduler: SensorScheduler<S, T>,
    store: P,
    checkpoint_timer: IntervalTimer,
    restored: bool,
}

impl<S: MotionSource, T: TimeSource, P: CalibrationStore> TrackingSession<S, T, P> {
    /// Compose a stopped session, restoring calibration from `store` if possible
    ///
    /// A restored record's sensitivity replaces the one in `config`.
    pub fn open(config: TrackerConfig, source: S, clock: T, access: MotionAccess, mut store: P) -> Self {
        let detector = StepDetector::new(config.detector_config());
        let mut scheduler = SensorScheduler::new(config, detector, source, clock, access);

        let restored = match store.load() {
            Ok(Some(record)) => {
                scheduler.detector_mut().restore_calibration(&record);
                let sensitivity = scheduler.detector().sensitivity();
                scheduler.update_configuration(&ConfigUpdate {
                    sensitivity: Some(sensitivity),
                    ..ConfigUpdate::default()
                });
                log_info!(
                    "Calibration restored: {} steps, threshold {}",
                    record.step_count,
                    record.threshold
                );
                true
            }
            Ok(None) => {
                log_info!("No fresh calibration, starting from zero");
                false
            }
            Err(e) => {
                log_warn!("Calibration load failed, starting from zero: {}", e);
                false
            }
        };

        if !restored {
            scheduler.detector_mut().reset_step_count();
        }

        Self {
            scheduler,
            store,
            checkpoint_timer: IntervalTimer::new(CHECKPOINT_INTERVAL_MS),
            restored,
        }
    }

    /// Start monitoring; see [`SensorScheduler::start_monitoring`]
    pub fn start<F, G>(&mut self, on_step: F, on_status: G) -> bool
    where
        F: FnMut(u64) + 'static,
        G: FnMut(bool) + 'static,
    {
        if !self.scheduler.start_monitoring(on_step, on_status) {
            return false;
        }
        if !self.checkpoint_timer.is_armed() {
            self.checkpoint_timer.arm(self.scheduler.clock().now());
        }
        true
    }

    /// Drive the scheduler and write a checkpoint when one is due
    pub fn poll(&mut self) {
        self.scheduler.poll();

        let now = self.scheduler.clock().now();
        if self.checkpoint_timer.poll(now) {
            self.checkpoint_logged();
        }
    }

    /// Stop monitoring and checkpoint; the session can be started again
    pub fn stop(&mut self) {
        self.scheduler.stop_monitoring();
        self.checkpoint_timer.cancel();
        self.checkpoint_logged();
    }

    /// Stop, write a final checkpoint and return the store
    pub fn close(mut self) -> P {
        self.stop();
        self.store
    }

    /// Save the detector's current calibration
    pub fn checkpoint(&mut self) -> Result<CalibrationRecord, StoreError> {
        let record = self.scheduler.detector().calibration_data();
        self.store.save(&record)?;
        Ok(record)
    }

    /// Zero the count (day rollover) and persist the empty state
    pub fn reset_step_count(&mut self) {
        self.scheduler.detector_mut().reset_step_count();
        self.checkpoint_logged();
    }

    /// Merge a partial configuration into the running scheduler
    pub fn update_configuration(&mut self, update: &ConfigUpdate) {
        self.scheduler.update_configuration(update);
    }

    /// Cumulative step count
    pub fn step_count(&self) -> u64 {
        self.scheduler.detector().step_count()
    }

    /// Whether `open` found a record to restore
    pub fn was_restored(&self) -> bool {
        self.restored
    }

    /// Scheduler status snapshot
    pub fn status(&self) -> OptimizationStatus {
        self.scheduler.optimization_status()
    }

    /// The scheduler
    pub fn scheduler(&self) -> &SensorScheduler<S, T> {
        &self.scheduler
    }

    /// Mutable scheduler access, e.g. to forward pushed samples
    pub fn scheduler_mut(&mut self) -> &mut SensorScheduler<S, T> {
        &mut self.scheduler
    }

    /// The calibration store
    pub fn store(&self) -> &P {
        &self.store
    }

    fn checkpoint_logged(&mut self) {
        match self.checkpoint() {
            Ok(record) => log_debug!("Checkpoint at {} steps", record.step_count),
            Err(e) => log_warn!("Checkpoint failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::source::MemorySource;
    use crate::time::MockTimeSource;

    #[derive(Default)]
    struct MemoryStore {
        stored: Option<CalibrationRecord>,
        saves: usize,
        fail_writes: bool,
    }

    impl CalibrationStore for MemoryStore {
        fn load(&mut self) -> Result<Option<CalibrationRecord>, StoreError> {
            Ok(self.stored)
        }

        fn save(&mut self, record: &CalibrationRecord) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Io("disk full"));
            }
            self.stored = Some(*record);
            self.saves += 1;
            Ok(())
        }
    }

    struct BrokenStore;

    impl CalibrationStore for BrokenStore {
        fn load(&mut self) -> Result<Option<CalibrationRecord>, StoreError> {
            Err(StoreError::Format("truncated"))
        }

        fn save(&mut self, _record: &CalibrationRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    fn gait(count: u64) -> Vec<Sample> {
        (1..=count)
            .map(|i| {
                let y = if i % 10 == 0 { 2.0 } else { 0.3 };
                Sample::new(0.0, y, 0.0, i * 50)
            })
            .collect()
    }

    #[test]
    fn restores_fresh_record() {
        let clock = MockTimeSource::new(0);
        let store = MemoryStore {
            stored: Some(CalibrationRecord {
                threshold: 1.5,
                sensitivity: 1.2,
                average_activity: 1.0,
                step_count: 100,
            }),
            ..MemoryStore::default()
        };

        let session = TrackingSession::open(
            TrackerConfig::default(),
            MemorySource::linear(Vec::new(), clock.clone()),
            clock,
            MotionAccess::Granted,
            store,
        );

        assert!(session.was_restored());
        assert_eq!(session.step_count(), 100);
        assert_eq!(session.scheduler().detector().threshold(), 1.5);
        assert_eq!(session.scheduler().config().sensitivity, 1.2);
    }

    #[test]
    fn load_failure_starts_from_zero() {
        let clock = MockTimeSource::new(0);
        let mut session = TrackingSession::open(
            TrackerConfig::default(),
            MemorySource::linear(gait(40), clock.clone()),
            clock.clone(),
            MotionAccess::Granted,
            BrokenStore,
        );

        assert!(!session.was_restored());
        assert_eq!(session.step_count(), 0);

        // Save failures do not stop counting
        assert!(session.start(|_| {}, |_| {}));
        clock.set(2_000);
        session.poll();
        session.stop();
        assert!(session.step_count() > 0);
    }

    #[test]
    fn checkpoints_every_minute_and_on_close() {
        let clock = MockTimeSource::new(0);
        let mut session = TrackingSession::open(
            TrackerConfig::default(),
            MemorySource::linear(gait(40), clock.clone()),
            clock.clone(),
            MotionAccess::Granted,
            MemoryStore::default(),
        );

        session.start(|_| {}, |_| {});
        clock.set(59_999);
        session.poll();
        assert_eq!(session.store().saves, 0);

        clock.set(60_000);
        session.poll();
        assert_eq!(session.store().saves, 1);

        let steps = session.step_count();
        let store = session.close();
        assert_eq!(store.saves, 2);
        assert_eq!(store.stored.map(|r| r.step_count), Some(steps));
    }

    #[test]
    fn reset_persists_zero() {
        let clock = MockTimeSource::new(0);
        let store = MemoryStore {
            stored: Some(CalibrationRecord {
                step_count: 42,
                ..CalibrationRecord::default()
            }),
            ..MemoryStore::default()
        };
        let mut session = TrackingSession::open(
            TrackerConfig::default(),
            MemorySource::linear(Vec::new(), clock.clone()),
            clock,
            MotionAccess::Granted,
            store,
        );
        assert_eq!(session.step_count(), 42);

        session.reset_step_count();
        assert_eq!(session.step_count(), 0);
        assert_eq!(session.store().stored.map(|r| r.step_count), Some(0));
    }

    #[test]
    fn failed_writes_are_reported_to_direct_callers() {
        let clock = MockTimeSource::new(0);
        let mut session = TrackingSession::open(
            TrackerConfig::default(),
            MemorySource::linear(Vec::new(), clock.clone()),
            clock,
            MotionAccess::Granted,
            MemoryStore {
                fail_writes: true,
                ..MemoryStore::default()
            },
        );

        assert_eq!(session.checkpoint(), Err(StoreError::Io("disk full")));
    }
}
