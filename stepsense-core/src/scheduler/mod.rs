//! Power-aware sensor scheduler
//!
//! Sits between the motion source and the step detector and decides when and
//! how often inference runs:
//!
//! ```text
//! MotionSource ──▶ sanitise ──▶ gravity removal ──▶ wake check ──▶ throttle ──▶ batch
//!                                                       │                        │
//!                                               PowerStateMachine      batch timer fires
//!                                                                               │
//!                                                               StepDetector ◀──┘ ──▶ on_step(count)
//! ```
//!
//! Everything runs on the caller's thread. `poll()` drains the source and
//! fires whichever timers are due; `ingest()` accepts a sample pushed by a
//! platform callback instead. Neither ever blocks.
//!
//! The detector is owned by the scheduler for its whole life, so calibration
//! and the step count survive stop/start and reconfiguration.

mod batch;
mod power;
mod throttle;

pub use batch::{Batch, SampleBatch};
pub use power::{PowerState, PowerStateMachine};
pub use throttle::Throttle;

use crate::access::MotionAccess;
use crate::config::{ConfigUpdate, TrackerConfig};
use crate::constants::scheduling::{IDLE_CHECK_INTERVAL_MS, MAX_SAMPLES_PER_POLL};
use crate::detector::StepDetector;
use crate::sample::{AccelerationKind, GravityFilter, Sample};
use crate::time::{IntervalTimer, Timestamp};
use crate::traits::{MotionSource, TimeSource};

/// Step notification: receives the cumulative step count
type StepCallback = Box<dyn FnMut(u64)>;
/// Status notification: `true` when monitoring starts, `false` when it stops
type StatusCallback = Box<dyn FnMut(bool)>;

struct Callbacks {
    on_step: StepCallback,
    on_status: StatusCallback,
}

/// Sample accounting since the scheduler was built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SchedulerStats {
    /// Samples that reached a batch
    pub accepted: u64,
    /// Samples dropped by the rate throttle
    pub throttled: u64,
    /// Sub-wake samples discarded while idle
    pub discarded_idle: u64,
    /// Non-empty batches handed to the detector
    pub batches_dispatched: u64,
    /// Errors reported by the motion source
    pub source_errors: u64,
}

/// Read-only view of the scheduler's state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OptimizationStatus {
    /// Monitoring has started and not stopped
    pub is_monitoring: bool,
    /// Active or idle
    pub power_state: PowerState,
    /// Time of the last sample above the wake threshold
    pub last_motion_at: Timestamp,
    /// Configured processing rate (Hz)
    pub sample_rate_hz: u32,
    /// Configured batch period (ms)
    pub batch_interval_ms: u64,
    /// Configured idle timeout (ms)
    pub idle_timeout_ms: u64,
    /// Sleep mode flag
    pub sleep_mode_enabled: bool,
    /// Samples waiting for the next dispatch
    pub pending_samples: usize,
    /// Magnitudes held by the detector
    pub buffered_samples: usize,
    /// Detector moving average
    pub filtered_magnitude: f32,
    /// Detector adaptive threshold
    pub threshold: f32,
    /// Cumulative step count
    pub step_count: u64,
    /// Relative power estimate
    pub power_estimate: f32,
    /// Sample accounting
    pub stats: SchedulerStats,
}

/// Schedules detector work around a motion source
///
/// # Example
///
/// ```rust
/// use stepsense_core::time::MockTimeSource;
/// use stepsense_core::{MemorySource, MotionAccess, Sample, SensorScheduler, StepDetector, TrackerConfig};
///
/// let clock = MockTimeSource::new(0);
/// let samples = (1..=40).map(|i| Sample::new(0.0, 0.3, 0.0, i * 50)).collect();
/// let source = MemorySource::linear(samples, clock.clone());
///
/// let config = TrackerConfig::default();
/// let detector = StepDetector::new(config.detector_config());
/// let mut scheduler = SensorScheduler::new(config, detector, source, clock.clone(), MotionAccess::Granted);
///
/// assert!(scheduler.start_monitoring(|count| println!("{count} steps"), |_| {}));
/// clock.advance(2_000);
/// scheduler.poll();
/// assert_eq!(scheduler.optimization_status().pending_samples, 40);
/// ```
pub struct SensorScheduler<S: MotionSource, T: TimeSource> {
    config: TrackerConfig,
    detector: StepDetector,
    source: S,
    clock: T,
    access: MotionAccess,
    gravity: GravityFilter,
    throttle: Throttle,
    batch: SampleBatch,
    power: PowerStateMachine,
    batch_timer: IntervalTimer,
    idle_timer: IntervalTimer,
    callbacks: Option<Callbacks>,
    stats: SchedulerStats,
}

impl<S: MotionSource, T: TimeSource> SensorScheduler<S, T> {
    /// Build a stopped scheduler
    ///
    /// `config` is clamped and pushed into `detector`; any calibration the
    /// detector already holds is kept.
    pub fn new(
        config: TrackerConfig,
        mut detector: StepDetector,
        source: S,
        clock: T,
        access: MotionAccess,
    ) -> Self {
        let config = config.clamped();
        detector.apply_config(config.detector_config());
        let now = clock.now();

        Self {
            detector,
            source,
            access,
            gravity: GravityFilter::new(),
            throttle: Throttle::new(config.sample_interval_ms()),
            batch: SampleBatch::new(),
            power: PowerStateMachine::new(config.idle_timeout_ms, now),
            batch_timer: IntervalTimer::new(config.batch_interval_ms),
            idle_timer: IntervalTimer::new(idle_check_period(&config)),
            callbacks: None,
            stats: SchedulerStats::default(),
            config,
            clock,
        }
    }

    /// Subscribe to the source and start the timers
    ///
    /// Returns `false` without side effects when access was denied or the
    /// source refused the subscription. Calling it while already monitoring
    /// keeps the existing callbacks and returns `true`.
    pub fn start_monitoring<F, G>(&mut self, on_step: F, on_status: G) -> bool
    where
        F: FnMut(u64) + 'static,
        G: FnMut(bool) + 'static,
    {
        if self.is_monitoring() {
            log_debug!("Monitoring already running");
            return true;
        }

        self.launch(Callbacks {
            on_step: Box::new(on_step),
            on_status: Box::new(on_status),
        })
    }

    /// Flush pending work, cancel the timers and unsubscribe
    ///
    /// The detector and its step count are left untouched. A no-op when not
    /// monitoring.
    pub fn stop_monitoring(&mut self) {
        if self.halt().is_some() {
            log_info!("Monitoring stopped at {} steps", self.detector.step_count());
        }
    }

    /// Merge a partial configuration, clamping every field
    ///
    /// While monitoring this is a stop followed by a restart with the same
    /// callbacks (so `on_status` sees `false` then `true`); the detector keeps
    /// its calibration and count.
    pub fn update_configuration(&mut self, update: &ConfigUpdate) {
        let next = self.config.merged(update);
        if next == self.config {
            return;
        }

        let callbacks = self.halt();
        self.config = next;
        self.detector.apply_config(next.detector_config());
        self.throttle.set_interval(next.sample_interval_ms());
        self.power.set_idle_timeout(next.idle_timeout_ms);
        self.batch_timer = IntervalTimer::new(next.batch_interval_ms);
        self.idle_timer = IntervalTimer::new(idle_check_period(&next));
        log_debug!("Configuration updated: {:?}", next);

        if let Some(callbacks) = callbacks {
            if !self.launch(callbacks) {
                log_warn!("Monitoring could not restart after reconfiguration");
            }
        }
    }

    /// Drain the source, then fire whichever timers are due
    pub fn poll(&mut self) {
        if !self.is_monitoring() {
            return;
        }

        self.drain_source();

        let now = self.clock.now();
        if self.batch_timer.poll(now) {
            let stepped = self.dispatch_batch();
            self.notify_steps(stepped);
        }
        if self.idle_timer.poll(now) {
            self.power.check_idle(now);
        }
    }

    /// Accept one sample pushed by the platform
    ///
    /// Ignored while not monitoring.
    pub fn ingest(&mut self, raw: Sample) {
        if !self.is_monitoring() {
            return;
        }

        let sample = raw.sanitized();
        let motion = match self.source.kind() {
            AccelerationKind::Linear => sample,
            AccelerationKind::GravityInclusive => self.gravity.remove(&sample),
        };

        let qualifying = self.power.observe(motion.magnitude(), motion.timestamp);
        if !qualifying && self.power.is_idle() && self.config.enable_sleep_mode {
            self.stats.discarded_idle += 1;
            return;
        }

        if !self.throttle.admit(motion.timestamp) {
            self.stats.throttled += 1;
            return;
        }

        self.stats.accepted += 1;
        if let Err(motion) = self.batch.push(motion) {
            // Full before the timer fired: dispatch now instead of dropping
            let stepped = self.dispatch_batch();
            self.notify_steps(stepped);
            let _ = self.batch.push(motion);
        }
    }

    /// Snapshot of the scheduler and detector state
    pub fn optimization_status(&self) -> OptimizationStatus {
        OptimizationStatus {
            is_monitoring: self.is_monitoring(),
            power_state: self.power.state(),
            last_motion_at: self.power.last_motion_at(),
            sample_rate_hz: self.config.sample_rate_hz,
            batch_interval_ms: self.config.batch_interval_ms,
            idle_timeout_ms: self.config.idle_timeout_ms,
            sleep_mode_enabled: self.config.enable_sleep_mode,
            pending_samples: self.batch.len(),
            buffered_samples: self.detector.buffered_samples(),
            filtered_magnitude: self.detector.filtered_magnitude(),
            threshold: self.detector.threshold(),
            step_count: self.detector.step_count(),
            power_estimate: self.power_consumption_estimate(),
            stats: self.stats,
        }
    }

    /// Unitless relative cost of the current configuration and state
    pub fn power_consumption_estimate(&self) -> f32 {
        self.power.power_estimate(self.config.sample_rate_hz)
    }

    /// The detector
    pub fn detector(&self) -> &StepDetector {
        &self.detector
    }

    /// Mutable detector access, for calibration restore or count reset
    pub fn detector_mut(&mut self) -> &mut StepDetector {
        &mut self.detector
    }

    /// The motion source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The clock
    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Effective (clamped) configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current power state
    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// Whether monitoring is running
    pub fn is_monitoring(&self) -> bool {
        self.callbacks.is_some()
    }

    /// Sample accounting
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    fn launch(&mut self, mut callbacks: Callbacks) -> bool {
        if let MotionAccess::Denied(e) = self.access {
            log_warn!("Cannot start monitoring: {}", e);
            return false;
        }
        if let Err(e) = self.source.subscribe() {
            log_warn!("Motion source refused subscription: {}", e);
            return false;
        }

        let now = self.clock.now();
        self.gravity.reset();
        self.throttle.reset();
        self.power.restart(now);
        self.batch_timer.arm(now);
        self.idle_timer.arm(now);

        (callbacks.on_status)(true);
        self.callbacks = Some(callbacks);
        log_info!(
            "Monitoring started: {} Hz, batch {} ms, idle after {} ms",
            self.config.sample_rate_hz,
            self.config.batch_interval_ms,
            self.config.idle_timeout_ms
        );
        true
    }

    /// Stop and hand back the callbacks, if monitoring was running
    fn halt(&mut self) -> Option<Callbacks> {
        if !self.is_monitoring() {
            return None;
        }

        // Whatever the platform already delivered is still counted
        self.drain_source();
        let stepped = self.dispatch_batch();
        self.notify_steps(stepped);

        self.batch_timer.cancel();
        self.idle_timer.cancel();
        self.source.unsubscribe();

        let mut callbacks = self.callbacks.take()?;
        (callbacks.on_status)(false);
        Some(callbacks)
    }

    fn drain_source(&mut self) {
        for _ in 0..MAX_SAMPLES_PER_POLL {
            match self.source.poll_sample() {
                Ok(sample) => self.ingest(sample),
                Err(nb::Error::WouldBlock) => return,
                Err(nb::Error::Other(e)) => {
                    self.stats.source_errors += 1;
                    log_warn!("Motion source error: {}", e);
                    return;
                }
            }
        }
        log_debug!("Poll budget of {} samples used up", MAX_SAMPLES_PER_POLL);
    }

    /// Feed the pending batch to the detector in order
    ///
    /// Returns the cumulative count if at least one step was accepted.
    fn dispatch_batch(&mut self) -> Option<u64> {
        if self.batch.is_empty() {
            return None;
        }

        let samples = self.batch.take();
        let before = self.detector.step_count();
        let mut stepped = false;
        for sample in samples.iter() {
            stepped |= self.detector.process_sample(sample);
        }
        self.stats.batches_dispatched += 1;

        let count = self.detector.step_count();
        log_debug!(
            "Batch of {} samples, {} new steps",
            samples.len(),
            count - before
        );
        stepped.then_some(count)
    }

    fn notify_steps(&mut self, stepped: Option<u64>) {
        if let (Some(count), Some(callbacks)) = (stepped, self.callbacks.as_mut()) {
            (callbacks.on_step)(count);
        }
    }
}

impl<S: MotionSource, T: TimeSource> core::fmt::Debug for SensorScheduler<S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorScheduler")
            .field("config", &self.config)
            .field("power_state", &self.power.state())
            .field("is_monitoring", &self.is_monitoring())
            .field("pending_samples", &self.batch.len())
            .field("detector", &self.detector)
            .finish()
    }
}

fn idle_check_period(config: &TrackerConfig) -> u64 {
    IDLE_CHECK_INTERVAL_MS.min(config.idle_timeout_ms)
}
