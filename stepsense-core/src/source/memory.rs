//! Memory-based motion source for testing and replay
//!
//! Useful for:
//! - Unit and integration testing with known signals
//! - Replaying recorded accelerometer traces
//! - Simulating a live sensor against a mock clock

use std::collections::VecDeque;

use crate::errors::SourceError;
use crate::sample::{AccelerationKind, Sample};
use crate::traits::{MotionSource, TimeSource};

/// Replays samples as their timestamps come due on a clock
///
/// A sample becomes visible once `clock.now() >= sample.timestamp`, so driving
/// a `MockTimeSource` forward releases the trace at its recorded pace. Samples
/// that come due while nobody is subscribed are lost, as with a real listener.
///
/// ## Example
///
/// ```rust
/// use stepsense_core::time::MockTimeSource;
/// use stepsense_core::traits::MotionSource;
/// use stepsense_core::{MemorySource, Sample};
///
/// let clock = MockTimeSource::new(0);
/// let trace = vec![Sample::new(0.0, 1.0, 0.0, 0), Sample::new(0.0, 1.2, 0.0, 50)];
/// let mut source = MemorySource::linear(trace, clock.clone());
///
/// source.subscribe().unwrap();
/// assert!(source.poll_sample().is_ok());
/// assert!(matches!(source.poll_sample(), Err(nb::Error::WouldBlock)));
///
/// clock.advance(50);
/// assert!(source.poll_sample().is_ok());
/// ```
pub struct MemorySource<T: TimeSource> {
    /// Samples not yet delivered, in timestamp order
    pending: VecDeque<Sample>,
    kind: AccelerationKind,
    clock: T,
    subscribed: bool,
    subscribe_error: Option<SourceError>,
    delivered: usize,
    dropped: usize,
}

impl<T: TimeSource> MemorySource<T> {
    /// Replay samples whose axes already exclude gravity
    pub fn linear(samples: Vec<Sample>, clock: T) -> Self {
        Self::new(samples, AccelerationKind::Linear, clock)
    }

    /// Replay raw accelerometer samples, gravity included
    pub fn gravity_inclusive(samples: Vec<Sample>, clock: T) -> Self {
        Self::new(samples, AccelerationKind::GravityInclusive, clock)
    }

    /// Replay samples of the given kind
    pub fn new(mut samples: Vec<Sample>, kind: AccelerationKind, clock: T) -> Self {
        samples.sort_by_key(|s| s.timestamp);

        Self {
            pending: samples.into(),
            kind,
            clock,
            subscribed: false,
            subscribe_error: None,
            delivered: 0,
            dropped: 0,
        }
    }

    /// Make every `subscribe` call fail with `error`
    pub fn failing_with(mut self, error: SourceError) -> Self {
        self.subscribe_error = Some(error);
        self
    }

    /// Append a sample to the end of the trace
    pub fn push(&mut self, sample: Sample) {
        self.pending.push_back(sample);
    }

    /// Whether a listener is registered
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Samples handed out so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Samples lost because they came due while unsubscribed
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Samples still waiting in the trace
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Check if the whole trace has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard samples that are already due
    fn drop_due(&mut self) {
        let now = self.clock.now();
        while self.pending.front().is_some_and(|s| s.timestamp <= now) {
            self.pending.pop_front();
            self.dropped += 1;
        }
    }
}

impl<T: TimeSource> MotionSource for MemorySource<T> {
    fn kind(&self) -> AccelerationKind {
        self.kind
    }

    fn subscribe(&mut self) -> Result<(), SourceError> {
        if let Some(error) = self.subscribe_error {
            return Err(error);
        }
        if !self.subscribed {
            // Anything that came due with no listener was never seen
            let now = self.clock.now();
            while self.pending.front().is_some_and(|s| s.timestamp < now) {
                self.pending.pop_front();
                self.dropped += 1;
            }
        }
        self.subscribed = true;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.subscribed {
            self.drop_due();
        }
        self.subscribed = false;
    }

    fn poll_sample(&mut self) -> nb::Result<Sample, SourceError> {
        if !self.subscribed {
            return Err(nb::Error::Other(SourceError::Disconnected));
        }

        match self.pending.front() {
            Some(sample) if sample.timestamp <= self.clock.now() => {
                let sample = *sample;
                self.pending.pop_front();
                self.delivered += 1;
                Ok(sample)
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }
}
