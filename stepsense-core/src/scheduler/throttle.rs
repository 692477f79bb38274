//! Sample-rate throttle
//!
//! Drops samples that arrive sooner than `1000 / sample_rate` ms after the last
//! admitted one, bounding how often the pipeline does work regardless of how
//! fast the platform delivers.

use crate::time::Timestamp;

/// Minimum-spacing gate on sample timestamps
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval_ms: u64,
    last_admitted: Option<Timestamp>,
    dropped: u64,
}

impl Throttle {
    /// Admit at most one sample per `interval_ms`
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_admitted: None,
            dropped: 0,
        }
    }

    /// Decide whether the sample at `timestamp` is processed
    pub fn admit(&mut self, timestamp: Timestamp) -> bool {
        if let Some(last) = self.last_admitted {
            if timestamp.saturating_sub(last) < self.interval_ms {
                self.dropped += 1;
                return false;
            }
        }

        self.last_admitted = Some(timestamp);
        true
    }

    /// Change the spacing; the next sample is judged against the new value
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Forget the last admitted sample
    pub fn reset(&mut self) {
        self.last_admitted = None;
    }

    /// Current spacing in milliseconds
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Samples rejected so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttles_to_interval() {
        let mut throttle = Throttle::new(50);

        // 100 Hz input through a 20 Hz throttle
        let admitted: Vec<u64> = (0..10).map(|i| i * 10).filter(|&t| throttle.admit(t)).collect();

        assert_eq!(admitted, vec![0, 50]);
        assert_eq!(throttle.dropped(), 8);
    }

    #[test]
    fn exact_spacing_passes() {
        let mut throttle = Throttle::new(50);
        assert!(throttle.admit(1000));
        assert!(throttle.admit(1050));
        assert!(!throttle.admit(1099));
        assert!(throttle.admit(1100));
    }

    #[test]
    fn reset_admits_next_sample() {
        let mut throttle = Throttle::new(1000);
        assert!(throttle.admit(0));
        throttle.reset();
        assert!(throttle.admit(10));
    }
}
