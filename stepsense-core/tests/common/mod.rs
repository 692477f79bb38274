//! Shared signal generators and drivers for integration tests
//!
//! Two gait shapes oscillate between 0.3 and 2.0: a spiky one with a single
//! peak sample per step, and a triangle wave. A smooth sinusoid over the same
//! range spreads the activity history so wide that its peaks sit just below
//! the adaptive threshold, so it is not used.

#![allow(dead_code)]

use stepsense_core::time::MockTimeSource;
use stepsense_core::{
    AccelerationKind, MemorySource, MotionAccess, Sample, SensorScheduler, StepDetector,
    TimeSource, TrackerConfig,
};

/// Sample spacing at 20 Hz
pub const INTERVAL_20HZ_MS: u64 = 50;

pub type ReplayScheduler = SensorScheduler<MemorySource<MockTimeSource>, MockTimeSource>;

/// A sample whose magnitude is exactly `magnitude`
pub fn vertical(magnitude: f32, timestamp: u64) -> Sample {
    Sample::new(0.0, magnitude, 0.0, timestamp)
}

/// Walking at one step every `period_samples`, sampled at 20 Hz
///
/// Samples are at `0, 50, ..` up to and including `last_index * 50`; indices
/// that are a positive multiple of `period_samples` carry the peak.
pub fn walking(period_samples: u64, last_index: u64) -> Vec<Sample> {
    (0..=last_index)
        .map(|i| {
            let magnitude = if i > 0 && i % period_samples == 0 { 2.0 } else { 0.3 };
            vertical(magnitude, i * INTERVAL_20HZ_MS)
        })
        .collect()
}

/// Triangle-wave walking between 0.3 and 2.0, one step every `period_samples`
///
/// Troughs fall on indices that are a multiple of `period_samples`, apexes
/// half a period later.
pub fn triangle_walking(period_samples: u64, last_index: u64) -> Vec<Sample> {
    let half = period_samples as f32 / 2.0;
    (0..=last_index)
        .map(|i| {
            let phase = (i % period_samples) as f32;
            let rise = if phase <= half { phase / half } else { (period_samples as f32 - phase) / half };
            vertical(0.3 + 1.7 * rise, i * INTERVAL_20HZ_MS)
        })
        .collect()
}

/// Constant magnitude from `start_ms` (inclusive) to `end_ms` (inclusive)
pub fn constant(magnitude: f32, start_ms: u64, end_ms: u64, interval_ms: u64) -> Vec<Sample> {
    (start_ms..=end_ms)
        .step_by(interval_ms as usize)
        .map(|t| vertical(magnitude, t))
        .collect()
}

/// Feed samples to a detector, returning the timestamps of accepted steps
pub fn run_detector(detector: &mut StepDetector, samples: &[Sample]) -> Vec<u64> {
    samples
        .iter()
        .filter(|s| detector.process_sample(s))
        .map(|s| s.timestamp)
        .collect()
}

/// Scheduler replaying `samples` against a mock clock starting at zero
pub fn replay_scheduler(
    config: TrackerConfig,
    samples: Vec<Sample>,
    kind: AccelerationKind,
) -> (ReplayScheduler, MockTimeSource) {
    let clock = MockTimeSource::new(0);
    let source = MemorySource::new(samples, kind, clock.clone());
    let detector = StepDetector::new(config.detector_config());
    let scheduler =
        SensorScheduler::new(config, detector, source, clock.clone(), MotionAccess::Granted);
    (scheduler, clock)
}

/// Advance the clock in `tick_ms` steps up to `until_ms`, polling after each
pub fn drive(scheduler: &mut ReplayScheduler, clock: &MockTimeSource, until_ms: u64, tick_ms: u64) {
    while clock.now() < until_ms {
        clock.advance(tick_ms);
        scheduler.poll();
    }
}
