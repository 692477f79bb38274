//! Accelerometer samples and gravity separation
//!
//! A `Sample` is one timestamped three-axis reading as delivered by the motion
//! source. Samples are ephemeral: the scheduler sanitises them, optionally
//! strips gravity, and hands them to the detector, which keeps only magnitudes.

use crate::constants::scheduling::GRAVITY_FILTER_ALPHA;
use crate::time::Timestamp;

/// What a motion source's axes contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelerationKind {
    /// Gravity already removed by the platform (user acceleration)
    Linear,
    /// Raw accelerometer output, gravity included
    GravityInclusive,
}

/// One timestamped three-axis acceleration reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// X axis acceleration
    pub x: f32,
    /// Y axis acceleration
    pub y: f32,
    /// Z axis acceleration
    pub z: f32,
    /// Monotonic arrival time in milliseconds
    pub timestamp: Timestamp,
}

impl Sample {
    /// Create a sample
    pub const fn new(x: f32, y: f32, z: f32, timestamp: Timestamp) -> Self {
        Self { x, y, z, timestamp }
    }

    /// Euclidean norm of the three axes
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// True when every axis is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The same sample, or a zero vector at the same time if any axis is NaN or infinite
    pub fn sanitized(self) -> Self {
        if self.is_finite() {
            self
        } else {
            Self::new(0.0, 0.0, 0.0, self.timestamp)
        }
    }
}

/// Exponential gravity estimate for gravity-inclusive sources
///
/// ```text
/// gravity' = 0.8 · gravity + 0.2 · raw
/// linear   = raw − gravity'
/// ```
///
/// The first sample after construction or a reset seeds the estimate and
/// reports no motion, so a restart never shows gravity to the detector as a
/// burst of acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityFilter {
    gravity: Option<[f32; 3]>,
}

impl GravityFilter {
    /// Filter with no estimate yet
    pub const fn new() -> Self {
        Self { gravity: None }
    }

    /// Update the estimate with `raw` and return the motion component
    pub fn remove(&mut self, raw: &Sample) -> Sample {
        let axes = [raw.x, raw.y, raw.z];

        let Some(gravity) = self.gravity.as_mut() else {
            self.gravity = Some(axes);
            return Sample::new(0.0, 0.0, 0.0, raw.timestamp);
        };

        let mut linear = [0.0f32; 3];
        for ((g, a), out) in gravity.iter_mut().zip(axes).zip(linear.iter_mut()) {
            *g = GRAVITY_FILTER_ALPHA * *g + (1.0 - GRAVITY_FILTER_ALPHA) * a;
            *out = a - *g;
        }

        Sample::new(linear[0], linear[1], linear[2], raw.timestamp)
    }

    /// Current gravity estimate; zero until the first sample
    pub fn gravity(&self) -> [f32; 3] {
        self.gravity.unwrap_or([0.0; 3])
    }

    /// Forget the estimate; the next sample seeds it again
    pub fn reset(&mut self) {
        self.gravity = None;
    }
}
