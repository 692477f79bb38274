//! Benchmarks for the step detector and scheduler hot paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stepsense_core::time::MockTimeSource;
use stepsense_core::{
    DetectorConfig, MemorySource, MotionAccess, Sample, SensorScheduler, StepDetector,
    TrackerConfig,
};

/// One minute of 20 Hz walking
fn walking_minute() -> Vec<Sample> {
    (0..1200u64)
        .map(|i| {
            let y = if i % 10 == 0 { 2.0 } else { 0.3 };
            Sample::new(0.05, y, -0.02, i * 50)
        })
        .collect()
}

fn benchmark_process_sample(c: &mut Criterion) {
    let samples = walking_minute();
    let mut group = c.benchmark_group("process_sample");

    for window in [3usize, 10, 32] {
        group.bench_with_input(BenchmarkId::new("filter_window", window), &window, |b, &w| {
            b.iter(|| {
                let mut detector = StepDetector::new(DetectorConfig {
                    filter_window_size: w,
                    ..DetectorConfig::default()
                });
                for sample in &samples {
                    black_box(detector.process_sample(black_box(sample)));
                }
                detector.step_count()
            })
        });
    }

    group.finish();
}

fn benchmark_scheduler_minute(c: &mut Criterion) {
    let samples = walking_minute();

    c.bench_function("scheduler_one_minute_walk", |b| {
        b.iter(|| {
            let clock = MockTimeSource::new(0);
            let source = MemorySource::linear(samples.clone(), clock.clone());
            let mut scheduler = SensorScheduler::new(
                TrackerConfig::default(),
                StepDetector::default(),
                source,
                clock.clone(),
                MotionAccess::Granted,
            );

            scheduler.start_monitoring(|_| {}, |_| {});
            clock.set(60_000);
            scheduler.poll();
            scheduler.stop_monitoring();
            black_box(scheduler.detector().step_count())
        })
    });
}

fn benchmark_calibration(c: &mut Criterion) {
    let mut detector = StepDetector::default();
    for sample in walking_minute() {
        detector.process_sample(&sample);
    }
    let record = detector.calibration_data();

    c.bench_function("restore_calibration", |b| {
        b.iter(|| {
            let mut fresh = StepDetector::default();
            fresh.restore_calibration(black_box(&record));
            fresh.threshold()
        })
    });
}

criterion_group!(
    benches,
    benchmark_process_sample,
    benchmark_scheduler_minute,
    benchmark_calibration
);
criterion_main!(benches);
