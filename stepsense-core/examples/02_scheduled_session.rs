//! Scheduled Tracking Session Example
//!
//! This example composes a full tracking session: an async permission check,
//! a replayed motion source, the power-aware scheduler and an in-memory
//! calibration store. A simulated clock drives the event loop so a minute of
//! walking followed by ten minutes of rest runs instantly.
//!
//! ## What You'll Learn
//!
//! - Resolving motion access before the scheduler exists
//! - Receiving batched, cumulative step callbacks
//! - Watching the Active → Idle power transition
//! - Checkpointing calibration through a `CalibrationStore`
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_scheduled_session
//! ```

use async_trait::async_trait;
use stepsense_core::time::MockTimeSource;
use stepsense_core::{
    AccessError, CalibrationRecord, CalibrationStore, CapabilityGate, MemorySource, MotionAccess,
    Sample, StoreError, TrackerConfig, TrackingSession,
};

/// Platform that always has an accelerometer and a consenting user
struct DemoGate;

#[async_trait]
impl CapabilityGate for DemoGate {
    async fn check_access(&mut self) -> Result<(), AccessError> {
        Ok(())
    }
}

/// Keeps the latest checkpoint in memory
#[derive(Default)]
struct DemoStore {
    latest: Option<CalibrationRecord>,
    writes: usize,
}

impl CalibrationStore for DemoStore {
    fn load(&mut self) -> Result<Option<CalibrationRecord>, StoreError> {
        Ok(self.latest)
    }

    fn save(&mut self, record: &CalibrationRecord) -> Result<(), StoreError> {
        self.latest = Some(*record);
        self.writes += 1;
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("StepSense Scheduled Session Example");
    println!("===================================\n");

    let access = MotionAccess::acquire(&mut DemoGate).await;
    println!("Motion access: {:?}\n", access);

    // One minute of walking at 2 Hz, then ten minutes of near stillness
    let mut samples: Vec<Sample> = (1..=1200u64)
        .map(|i| {
            let vertical = if i % 10 == 0 { 2.0 } else { 0.3 };
            Sample::new(0.0, vertical, 0.0, i * 50)
        })
        .collect();
    samples.extend((1201..=13_200u64).map(|i| Sample::new(0.0, 0.05, 0.0, i * 50)));

    let clock = MockTimeSource::new(0);
    let source = MemorySource::linear(samples, clock.clone());
    let config = TrackerConfig {
        idle_timeout_ms: 120_000,
        ..TrackerConfig::default()
    };

    let mut session = TrackingSession::open(config, source, clock.clone(), access, DemoStore::default());

    let started = session.start(
        |count| println!("  onStep: {} steps so far", count),
        |online| println!("  onStatus: {}", if online { "online" } else { "offline" }),
    );
    if !started {
        println!("Monitoring unavailable; falling back to manual entry");
        return;
    }

    let mut last_state = session.status().power_state;
    for _ in 0..(660_000 / 100) {
        clock.advance(100);
        session.poll();

        let status = session.status();
        if status.power_state != last_state {
            println!(
                "  power: {:?} → {:?} (estimate {:.2})",
                last_state, status.power_state, status.power_estimate
            );
            last_state = status.power_state;
        }
    }

    let status = session.status();
    println!();
    println!("Final status:");
    println!("  Steps:              {}", status.step_count);
    println!("  Accepted samples:   {}", status.stats.accepted);
    println!("  Discarded (idle):   {}", status.stats.discarded_idle);
    println!("  Batches dispatched: {}", status.stats.batches_dispatched);

    let store = session.close();
    println!("  Checkpoints written: {}", store.writes);
}
