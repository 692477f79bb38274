//! Fixed-Size Circular Buffer for Signal History
//!
//! ## Overview
//!
//! A ring buffer whose storage is fixed at compile time through const generics
//! and whose *logical* capacity can be lowered at runtime. The detector uses it
//! for two windows:
//!
//! - the magnitude window, sized `2 × filter_window` out of a 64-slot array, and
//! - the activity history, the last 100 raw magnitudes.
//!
//! ## Design Rationale
//!
//! ### Automatic Overwrite
//!
//! When full, a push discards the oldest value instead of failing. Recent motion
//! is what the threshold and the peak test care about.
//!
//! ### Runtime Limit
//!
//! The filter window is hot-reconfigurable, so the magnitude window cannot be a
//! plain `[T; N]` ring. The storage stays `N` slots; `limit` decides where the
//! write position wraps. Changing the limit keeps the newest values.
//!
//! ```text
//! CircularBuffer<f32, 8> with limit 4, after pushing 1..=6:
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  5  │  6  │  3  │  4  │  -  │  -  │  -  │  -  │
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!              ↑
//!              write_pos = 2 (oldest value lives here once full)
//!
//! Logical view (oldest → newest): [3, 4, 5, 6]
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use stepsense_core::buffer::CircularBuffer;
//!
//! let mut history: CircularBuffer<f32, 10> = CircularBuffer::new();
//! history.push(1.0);
//! history.push(3.0);
//!
//! assert_eq!(history.mean(), 2.0);
//! assert_eq!(history.newest(0), Some(3.0));
//! ```

/// Fixed-size circular buffer with an adjustable logical capacity
///
/// ## Internal Invariants
///
/// - `0 < limit <= N`
/// - `write_pos < limit`
/// - `len <= limit`
#[derive(Clone)]
pub struct CircularBuffer<T: Copy, const N: usize> {
    /// Storage array using Option for uninitialized slots
    data: [Option<T>; N],

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid values
    len: usize,

    /// Logical capacity
    limit: usize,
}

impl<T: Copy, const N: usize> CircularBuffer<T, N> {
    /// Creates a new empty buffer using the full storage
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
            limit: N,
        }
    }

    /// Creates a new empty buffer that holds at most `limit` values
    ///
    /// `limit` is clamped into `1..=N`.
    pub fn with_limit(limit: usize) -> Self {
        let mut buffer = Self::new();
        buffer.limit = limit.clamp(1, N);
        buffer
    }

    /// Adds a value, overwriting the oldest one when full
    pub fn push(&mut self, value: T) {
        self.data[self.write_pos] = Some(value);
        self.write_pos = (self.write_pos + 1) % self.limit;

        if self.len < self.limit {
            self.len += 1;
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer holds `capacity()` values
    pub fn is_full(&self) -> bool {
        self.len == self.limit
    }

    /// Current logical capacity
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Changes the logical capacity, keeping the newest values that still fit
    pub fn set_capacity(&mut self, limit: usize) {
        let limit = limit.clamp(1, N);
        if limit == self.limit {
            return;
        }

        let keep = self.len.min(limit);
        let mut kept: [Option<T>; N] = [None; N];
        for (slot, value) in kept.iter_mut().zip(self.iter().skip(self.len - keep)) {
            *slot = Some(value);
        }

        self.data = kept;
        self.len = keep;
        self.limit = limit;
        self.write_pos = keep % limit;
    }

    /// Most recent value
    pub fn last(&self) -> Option<T> {
        self.newest(0)
    }

    /// Value `back` positions before the most recent one (0 = newest)
    pub fn newest(&self, back: usize) -> Option<T> {
        if back >= self.len {
            return None;
        }
        self.get(self.len - 1 - back)
    }

    /// Iterate over values from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T, N> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Iterate over the newest `count` values, oldest first
    pub fn iter_newest(&self, count: usize) -> impl Iterator<Item = T> + '_ {
        self.iter().skip(self.len.saturating_sub(count))
    }

    /// Clear all values, keeping the logical capacity
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Gets a value by its logical index (0 = oldest, len-1 = newest)
    ///
    /// When the buffer is not full, logical and physical indices match.
    /// Once full, the oldest value sits at `write_pos`.
    fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.limit {
            index
        } else {
            (self.write_pos + index) % self.limit
        };

        self.data[actual_index]
    }
}

impl<const N: usize> CircularBuffer<f32, N> {
    /// Arithmetic mean of the stored values (0.0 when empty)
    pub fn mean(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.len as f32
    }

    /// Population standard deviation of the stored values (0.0 when empty)
    pub fn std_dev(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f32>()
            / self.len as f32;
        libm::sqrtf(variance)
    }

    /// Mean of the newest `count` values (0.0 when empty)
    pub fn mean_of_newest(&self, count: usize) -> f32 {
        let taken = count.min(self.len);
        if taken == 0 {
            return 0.0;
        }
        self.iter_newest(taken).sum::<f32>() / taken as f32
    }
}

/// Iterator over circular buffer contents
pub struct CircularBufferIter<'a, T: Copy, const N: usize> {
    buffer: &'a CircularBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for CircularBufferIter<'a, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Copy, const N: usize> Default for CircularBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
