//! Core step inference engine for StepSense
//!
//! Turns a raw accelerometer stream into validated step events, under a
//! power-aware scheduler that decides when and how often inference runs.
//!
//! Key constraints:
//! - Samples are processed one at a time, in arrival order
//! - Fixed memory per detector (bounded magnitude window and activity history)
//! - No I/O: persistence and the platform sensor are collaborators behind traits
//!
//! ```no_run
//! use stepsense_core::{DetectorConfig, Sample, StepDetector};
//!
//! let mut detector = StepDetector::new(DetectorConfig::default());
//!
//! // Feed samples as they arrive from the motion source
//! if detector.process_sample(&Sample::new(0.1, 1.8, 0.2, 1_000)) {
//!     println!("step #{}", detector.step_count());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod access;
pub mod buffer;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod sample;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod time;
pub mod traits;

// Public API
pub use access::MotionAccess;
pub use calibration::CalibrationRecord;
pub use config::{ConfigUpdate, DetectorConfig, TrackerConfig};
pub use detector::StepDetector;
pub use errors::{AccessError, SourceError, StoreError};
pub use sample::{AccelerationKind, Sample};
pub use scheduler::{OptimizationStatus, PowerState, SensorScheduler};
pub use session::TrackingSession;
pub use source::MemorySource;
pub use traits::{CalibrationStore, CapabilityGate, MotionSource, TimeSource};

/// Crate version, as published
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
