//! Collaborator Traits for StepSense
//!
//! The engine performs no I/O of its own. Every platform concern sits behind
//! one of these traits and is selected when the session is composed, so the
//! detector and scheduler never branch on platform.
//!
//! ## Module Organization
//!
//! - [`time`] - Clock abstraction (monotonic and wall clock)
//! - [`source`] - Motion source adapter (pull-based, non-blocking)
//! - [`access`] - Async capability and permission gate
//! - [`store`] - Calibration persistence collaborator
//!
//! ## Usage Example
//!
//! ```rust
//! use stepsense_core::traits::{MotionSource, TimeSource};
//! use stepsense_core::time::MockTimeSource;
//! use stepsense_core::{MemorySource, Sample};
//!
//! let clock = MockTimeSource::new(0);
//! let mut source = MemorySource::linear(vec![Sample::new(0.0, 1.0, 0.0, 0)], clock.clone());
//!
//! source.subscribe().unwrap();
//! assert!(source.poll_sample().is_ok());
//! ```

pub mod access;
pub mod source;
pub mod store;
pub mod time;

pub use access::CapabilityGate;
pub use source::MotionSource;
pub use store::CalibrationStore;
pub use time::TimeSource;
