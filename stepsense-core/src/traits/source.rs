//! Motion Source Traits
//!
//! A motion source is the adapter between the platform accelerometer and the
//! scheduler. The design follows a pull-based model using the `nb` crate, so a
//! source can be backed by a hardware FIFO, a platform callback queue, or a
//! recorded trace without an async runtime.
//!
//! ## Common Patterns
//!
//! ```rust
//! use stepsense_core::traits::MotionSource;
//! use stepsense_core::{Sample, SourceError};
//!
//! fn drain<S: MotionSource>(source: &mut S, out: &mut Vec<Sample>) -> Result<(), SourceError> {
//!     loop {
//!         match source.poll_sample() {
//!             Ok(sample) => out.push(sample),
//!             // Nothing pending, come back on the next tick
//!             Err(nb::Error::WouldBlock) => return Ok(()),
//!             Err(nb::Error::Other(e)) => return Err(e),
//!         }
//!     }
//! }
//! ```

use crate::errors::SourceError;
use crate::sample::{AccelerationKind, Sample};

/// Platform motion sensor adapter
///
/// ## Implementation Notes
///
/// - `poll_sample` must never block; use `nb::Error::WouldBlock` when nothing is pending
/// - Samples must be returned in arrival order with monotonic millisecond timestamps
/// - Axis values may be anything, including NaN; the scheduler sanitises them
/// - `kind()` declares whether gravity is still included in the axes
///
/// ## Error Handling
///
/// - `nb::Error::WouldBlock` - No sample available yet
/// - `nb::Error::Other(e)` - The source failed; the scheduler ends the current
///   drain and tries again on the next poll
pub trait MotionSource {
    /// What the axes measure
    fn kind(&self) -> AccelerationKind;

    /// Register the listener; samples are only delivered while subscribed
    fn subscribe(&mut self) -> Result<(), SourceError>;

    /// Deregister the listener, dropping anything not yet polled
    fn unsubscribe(&mut self);

    /// Attempt to pull the next sample
    fn poll_sample(&mut self) -> nb::Result<Sample, SourceError>;
}

impl<S: MotionSource + ?Sized> MotionSource for Box<S> {
    fn kind(&self) -> AccelerationKind {
        (**self).kind()
    }

    fn subscribe(&mut self) -> Result<(), SourceError> {
        (**self).subscribe()
    }

    fn unsubscribe(&mut self) {
        (**self).unsubscribe()
    }

    fn poll_sample(&mut self) -> nb::Result<Sample, SourceError> {
        (**self).poll_sample()
    }
}
