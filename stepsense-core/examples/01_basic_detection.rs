//! Basic Step Detection Example
//!
//! This example feeds a synthetic walking signal straight into a
//! `StepDetector`, the way a platform callback would, and prints every
//! confirmed step.
//!
//! ## What You'll Learn
//!
//! - Creating a detector from a configuration
//! - Processing samples one at a time
//! - The one-sample confirmation lag
//! - Taking and restoring a calibration snapshot
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_detection
//! ```

use stepsense_core::{DetectorConfig, Sample, StepDetector};

fn main() {
    println!("StepSense Basic Detection Example");
    println!("=================================\n");

    // 10-sample moving average, steps at least 300 ms apart
    let config = DetectorConfig {
        sensitivity: 1.0,
        min_step_interval_ms: 300,
        filter_window_size: 10,
    };
    let mut detector = StepDetector::new(config);

    println!("Detector configuration:");
    println!("  Sensitivity:       {}", config.sensitivity);
    println!("  Min step interval: {} ms", config.min_step_interval_ms);
    println!("  Filter window:     {} samples", config.filter_window_size);
    println!();

    // Four seconds of 20 Hz samples, one footfall every 500 ms
    println!("Walking at 2 steps per second:");
    for i in 0..=80u64 {
        let timestamp = i * 50;
        let vertical = if i > 0 && i % 10 == 0 { 2.0 } else { 0.3 };
        let sample = Sample::new(0.02, vertical, -0.01, timestamp);

        if detector.process_sample(&sample) {
            println!(
                "  t={:5}ms  step #{:<3} threshold={:.2} activity={:.2}",
                timestamp,
                detector.step_count(),
                detector.threshold(),
                detector.filtered_magnitude()
            );
        }
    }
    println!();
    println!("Each step is confirmed one sample (50 ms) after its peak.\n");

    // Snapshot, then resume in a new detector as after an app restart
    let record = detector.calibration_data();
    println!("Calibration snapshot:");
    println!("  Threshold:        {:.3}", record.threshold);
    println!("  Sensitivity:      {:.2}", record.sensitivity);
    println!("  Average activity: {:.3}", record.average_activity);
    println!("  Step count:       {}", record.step_count);
    println!();

    let mut resumed = StepDetector::new(config);
    resumed.restore_calibration(&record);
    println!(
        "Restored detector starts at {} steps with threshold {:.3}",
        resumed.step_count(),
        resumed.threshold()
    );
}
