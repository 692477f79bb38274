//! Scheduler integration tests
//!
//! Replay generated signals through `MemorySource` against a mock clock and
//! check what the application would observe through the callbacks and the
//! status report.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use common::{constant, drive, replay_scheduler, vertical, walking};
use stepsense_core::time::MockTimeSource;
use stepsense_core::{
    AccelerationKind, AccessError, CalibrationRecord, CapabilityGate, ConfigUpdate, MemorySource,
    MotionAccess, PowerState, Sample, SensorScheduler, StepDetector, TrackerConfig,
};

type Recorded<T> = Rc<RefCell<Vec<T>>>;

fn recorder<T: 'static>() -> (Recorded<T>, impl FnMut(T)) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |value| sink.borrow_mut().push(value))
}

#[test]
fn quiet_device_goes_idle_after_timeout() {
    let config = TrackerConfig {
        idle_timeout_ms: 5000,
        ..TrackerConfig::default()
    };
    let (mut scheduler, clock) =
        replay_scheduler(config, constant(0.1, 50, 10_000, 50), AccelerationKind::Linear);
    let (steps, on_step) = recorder();

    assert!(scheduler.start_monitoring(on_step, |_| {}));

    drive(&mut scheduler, &clock, 4950, 50);
    assert_eq!(scheduler.power_state(), PowerState::Active);

    drive(&mut scheduler, &clock, 5000, 50);
    assert_eq!(scheduler.power_state(), PowerState::Idle);

    drive(&mut scheduler, &clock, 10_000, 50);
    scheduler.stop_monitoring();

    assert!(steps.borrow().is_empty());
    assert_eq!(scheduler.detector().step_count(), 0);

    let status = scheduler.optimization_status();
    assert!(status.stats.discarded_idle > 0);
    assert!((status.power_estimate - 0.08).abs() < 1e-6);
}

#[test]
fn walking_wakes_idle_scheduler_within_one_sample() {
    let config = TrackerConfig {
        idle_timeout_ms: 1000,
        ..TrackerConfig::default()
    };
    let mut samples = constant(0.1, 50, 2000, 50);
    samples.push(vertical(2.0, 2050));
    let (mut scheduler, clock) = replay_scheduler(config, samples, AccelerationKind::Linear);

    scheduler.start_monitoring(|_| {}, |_| {});
    drive(&mut scheduler, &clock, 2000, 50);
    assert_eq!(scheduler.power_state(), PowerState::Idle);

    drive(&mut scheduler, &clock, 2050, 50);
    assert_eq!(scheduler.power_state(), PowerState::Active);
    assert_eq!(scheduler.optimization_status().last_motion_at, 2050);
}

#[test]
fn walking_reports_cumulative_count_per_batch() {
    let config = TrackerConfig {
        batch_interval_ms: 1000,
        ..TrackerConfig::default()
    };
    let (mut scheduler, clock) =
        replay_scheduler(config, walking(10, 61), AccelerationKind::Linear);
    let (counts, on_step) = recorder();

    scheduler.start_monitoring(on_step, |_| {});
    drive(&mut scheduler, &clock, 4000, 50);

    // Confirmations at 550..3050; batches at 1000, 2000, 3000, 4000
    assert_eq!(*counts.borrow(), vec![1, 3, 5, 6]);
    assert_eq!(scheduler.optimization_status().stats.batches_dispatched, 4);
}

#[test]
fn lower_sample_rate_halves_processing() {
    // 10 Hz processing of a 20 Hz stream keeps every other sample
    let config = TrackerConfig {
        sample_rate_hz: 10,
        ..TrackerConfig::default()
    };
    let (mut scheduler, clock) =
        replay_scheduler(config, walking(10, 61), AccelerationKind::Linear);

    scheduler.start_monitoring(|_| {}, |_| {});
    drive(&mut scheduler, &clock, 3100, 50);
    scheduler.stop_monitoring();

    let stats = scheduler.optimization_status().stats;
    assert_eq!(stats.accepted, 31);
    assert_eq!(stats.throttled, 31);
}

#[test]
fn reconfiguration_keeps_calibration() {
    let (mut scheduler, clock) =
        replay_scheduler(TrackerConfig::default(), walking(10, 121), AccelerationKind::Linear);
    let (status, on_status) = recorder();

    scheduler.start_monitoring(|_| {}, on_status);
    drive(&mut scheduler, &clock, 3000, 50);
    scheduler.update_configuration(&ConfigUpdate {
        filter_window_size: Some(8),
        batch_interval_ms: Some(1000),
        ..ConfigUpdate::default()
    });

    // Pending samples were flushed by the restart
    let before = scheduler.detector().step_count();
    assert!(before >= 5);
    assert_eq!(scheduler.detector().config().filter_window_size, 8);

    drive(&mut scheduler, &clock, 7000, 50);
    assert_eq!(scheduler.detector().step_count(), 12);
    assert_eq!(*status.borrow(), vec![true, false, true]);
}

#[test]
fn config_from_json_partial() {
    let update: ConfigUpdate =
        serde_json::from_str(r#"{"sampleRate": 500, "idleTimeout": 10, "enableSleepMode": false}"#)
            .unwrap();
    let (mut scheduler, _clock) =
        replay_scheduler(TrackerConfig::default(), Vec::new(), AccelerationKind::Linear);

    scheduler.update_configuration(&update);

    let status = scheduler.optimization_status();
    assert_eq!(status.sample_rate_hz, 100);
    assert_eq!(status.idle_timeout_ms, 1000);
    assert!(!status.sleep_mode_enabled);
}

/// Device held upright: gravity on z, steps on y
fn upright(samples: Vec<Sample>) -> Vec<Sample> {
    samples
        .into_iter()
        .map(|s| Sample { z: 9.81, ..s })
        .collect()
}

#[test]
fn gravity_inclusive_walk_counts_like_linear() {
    let (mut linear, linear_clock) =
        replay_scheduler(TrackerConfig::default(), walking(10, 400), AccelerationKind::Linear);
    let (mut raw, raw_clock) = replay_scheduler(
        TrackerConfig::default(),
        upright(walking(10, 400)),
        AccelerationKind::GravityInclusive,
    );

    linear.start_monitoring(|_| {}, |_| {});
    raw.start_monitoring(|_| {}, |_| {});
    drive(&mut linear, &linear_clock, 21_000, 100);
    drive(&mut raw, &raw_clock, 21_000, 100);

    // 40 footfalls; the first is lost to the cold start
    let expected = linear.detector().step_count();
    let steps = raw.detector().step_count();
    assert!(steps >= 37, "counted {steps} of 40");
    assert!(steps <= expected);
    assert!(raw.detector().filtered_magnitude() < 1.0);
}

#[test]
fn gravity_inclusive_walk_survives_reconfiguration() {
    let (mut scheduler, clock) = replay_scheduler(
        TrackerConfig::default(),
        upright(walking(10, 400)),
        AccelerationKind::GravityInclusive,
    );
    let (statuses, on_status) = recorder();

    scheduler.start_monitoring(|_| {}, on_status);
    drive(&mut scheduler, &clock, 10_000, 100);
    let before = scheduler.detector().step_count();
    assert!(before >= 18, "counted {before} before reconfiguring");

    scheduler.update_configuration(&ConfigUpdate {
        sensitivity: Some(1.2),
        ..ConfigUpdate::default()
    });
    drive(&mut scheduler, &clock, 21_000, 100);

    let after = scheduler.detector().step_count() - before;
    assert!(after >= 18, "counted {after} after reconfiguring");
    assert_eq!(*statuses.borrow(), vec![true, false, true]);
}

#[test]
fn gravity_inclusive_walk_counts_across_restarts() {
    let (mut scheduler, clock) = replay_scheduler(
        TrackerConfig::default(),
        upright(walking(10, 600)),
        AccelerationKind::GravityInclusive,
    );

    let mut totals = Vec::new();
    for round in 1..=6u64 {
        assert!(scheduler.start_monitoring(|_| {}, |_| {}));
        drive(&mut scheduler, &clock, round * 5_000, 100);
        scheduler.stop_monitoring();
        totals.push(scheduler.detector().step_count());
    }

    // Ten footfalls per five-second round
    let mut previous = 0;
    for total in totals {
        assert!(total - previous >= 8, "round counted {}", total - previous);
        previous = total;
    }
}

struct FixedGate(Result<(), AccessError>);

#[async_trait]
impl CapabilityGate for FixedGate {
    async fn check_access(&mut self) -> Result<(), AccessError> {
        self.0
    }
}

#[tokio::test]
async fn denied_permission_degrades_to_no_monitoring() {
    let access = MotionAccess::acquire(&mut FixedGate(Err(AccessError::PermissionDenied))).await;

    let clock = MockTimeSource::new(0);
    let source = MemorySource::linear(walking(10, 61), clock.clone());
    let mut scheduler = SensorScheduler::new(
        TrackerConfig::default(),
        StepDetector::default(),
        source,
        clock,
        access,
    );

    assert!(!scheduler.start_monitoring(|_| {}, |_| {}));
    assert!(!scheduler.optimization_status().is_monitoring);
}

#[tokio::test]
async fn granted_permission_starts_monitoring() {
    let access = MotionAccess::acquire(&mut FixedGate(Ok(()))).await;

    let clock = MockTimeSource::new(0);
    let source = MemorySource::linear(Vec::new(), clock.clone());
    let mut scheduler =
        SensorScheduler::new(TrackerConfig::default(), StepDetector::default(), source, clock, access);

    assert!(scheduler.start_monitoring(|_| {}, |_| {}));
}

#[test]
fn restored_detector_survives_stop_and_start() {
    let (mut scheduler, clock) =
        replay_scheduler(TrackerConfig::default(), walking(10, 61), AccelerationKind::Linear);
    scheduler.detector_mut().restore_calibration(&CalibrationRecord {
        threshold: 1.5,
        sensitivity: 1.0,
        average_activity: 1.0,
        step_count: 100,
    });

    scheduler.start_monitoring(|_| {}, |_| {});
    drive(&mut scheduler, &clock, 1600, 50);
    scheduler.stop_monitoring();
    let after_first = scheduler.detector().step_count();
    assert!(after_first > 100);

    scheduler.start_monitoring(|_| {}, |_| {});
    drive(&mut scheduler, &clock, 4000, 50);
    scheduler.stop_monitoring();
    assert!(scheduler.detector().step_count() >= after_first);
}
