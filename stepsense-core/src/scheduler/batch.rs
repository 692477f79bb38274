//! Sample batch buffer
//!
//! Throttled samples wait here until the batch timer fires. Storage is inline
//! and bounded; when it fills up the scheduler dispatches early rather than
//! dropping samples.

use crate::constants::buffers::MAX_BATCH_SAMPLES;
use crate::sample::Sample;

/// Samples of one batch, in arrival order
pub type Batch = heapless::Vec<Sample, MAX_BATCH_SAMPLES>;

/// Bounded buffer of samples awaiting dispatch
#[derive(Debug, Default)]
pub struct SampleBatch {
    samples: Batch,
}

impl SampleBatch {
    /// Empty batch
    pub fn new() -> Self {
        Self { samples: Batch::new() }
    }

    /// Append a sample; gives it back if the batch is full
    pub fn push(&mut self, sample: Sample) -> Result<(), Sample> {
        self.samples.push(sample)
    }

    /// Take every buffered sample, leaving the batch empty
    pub fn take(&mut self) -> Batch {
        core::mem::take(&mut self.samples)
    }

    /// Buffered sample count
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if the next push would fail
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_order_and_empties() {
        let mut batch = SampleBatch::new();
        for t in [0, 50, 100] {
            batch.push(Sample::new(0.0, 1.0, 0.0, t)).unwrap();
        }

        let taken = batch.take();
        let times: Vec<u64> = taken.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![0, 50, 100]);
        assert!(batch.is_empty());
    }

    #[test]
    fn full_batch_returns_sample() {
        let mut batch = SampleBatch::new();
        for t in 0..MAX_BATCH_SAMPLES as u64 {
            batch.push(Sample::new(0.0, 0.0, 0.0, t)).unwrap();
        }

        assert!(batch.is_full());
        let overflow = Sample::new(1.0, 0.0, 0.0, 9999);
        assert_eq!(batch.push(overflow), Err(overflow));
    }
}
