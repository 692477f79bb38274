//! Idle/Active power state machine
//!
//! ```text
//!            no sample above wake threshold for idle_timeout
//!   ┌────────┐ ─────────────────────────────────────────▶ ┌──────┐
//!   │ Active │                                             │ Idle │
//!   └────────┘ ◀───────────────────────────────────────── └──────┘
//!                 any sample above wake threshold
//! ```
//!
//! Waking is immediate (on the qualifying sample). Going idle happens on the
//! scheduler's idle check timer.

use crate::constants::scheduling::{
    BATCHING_POWER_FACTOR, IDLE_POWER_FACTOR, POWER_REFERENCE_RATE_HZ, WAKE_MAGNITUDE_THRESHOLD,
};
use crate::time::Timestamp;

/// Scheduler power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerState {
    /// Full-rate processing
    Active,
    /// No recent motion; sub-wake samples may be discarded
    Idle,
}

/// Tracks the last qualifying motion and the resulting power state
#[derive(Debug, Clone, Copy)]
pub struct PowerStateMachine {
    state: PowerState,
    last_motion_at: Timestamp,
    idle_timeout_ms: u64,
    transitions: u64,
}

impl PowerStateMachine {
    /// Start active, counting inactivity from `now`
    pub fn new(idle_timeout_ms: u64, now: Timestamp) -> Self {
        Self {
            state: PowerState::Active,
            last_motion_at: now,
            idle_timeout_ms,
            transitions: 0,
        }
    }

    /// Whether a motion magnitude counts as activity
    pub fn is_wake_motion(magnitude: f32) -> bool {
        magnitude > WAKE_MAGNITUDE_THRESHOLD
    }

    /// Record one sample's motion magnitude; returns whether it qualified
    ///
    /// A qualifying sample refreshes the inactivity clock and wakes an idle
    /// machine at once.
    pub fn observe(&mut self, magnitude: f32, timestamp: Timestamp) -> bool {
        if !Self::is_wake_motion(magnitude) {
            return false;
        }

        self.last_motion_at = self.last_motion_at.max(timestamp);
        if self.state == PowerState::Idle {
            self.state = PowerState::Active;
            self.transitions += 1;
            log_info!("Motion at {} ms, scheduler active", timestamp);
        }
        true
    }

    /// Go idle if nothing qualified for the idle timeout; returns true on transition
    pub fn check_idle(&mut self, now: Timestamp) -> bool {
        if self.state == PowerState::Idle {
            return false;
        }

        let quiet_for = now.saturating_sub(self.last_motion_at);
        if quiet_for < self.idle_timeout_ms {
            return false;
        }

        self.state = PowerState::Idle;
        self.transitions += 1;
        log_info!("No motion for {} ms, scheduler idle", quiet_for);
        true
    }

    /// Back to active with a fresh inactivity clock
    pub fn restart(&mut self, now: Timestamp) {
        self.state = PowerState::Active;
        self.last_motion_at = now;
    }

    /// Change the inactivity timeout; applies from the next check
    pub fn set_idle_timeout(&mut self, idle_timeout_ms: u64) {
        self.idle_timeout_ms = idle_timeout_ms;
    }

    /// Current state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Whether the machine is idle
    pub fn is_idle(&self) -> bool {
        self.state == PowerState::Idle
    }

    /// Time of the last qualifying motion (or of the last restart)
    pub fn last_motion_at(&self) -> Timestamp {
        self.last_motion_at
    }

    /// State changes so far
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Relative processing cost at `sample_rate_hz` in the current state
    ///
    /// Unitless and illustrative: 1.0 · (rate / 20) · (0.1 if idle) · 0.8
    pub fn power_estimate(&self, sample_rate_hz: u32) -> f32 {
        let state_factor = match self.state {
            PowerState::Active => 1.0,
            PowerState::Idle => IDLE_POWER_FACTOR,
        };
        (sample_rate_hz as f32 / POWER_REFERENCE_RATE_HZ) * state_factor * BATCHING_POWER_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goes_idle_after_timeout() {
        let mut power = PowerStateMachine::new(5000, 0);

        assert!(!power.check_idle(4999));
        assert!(power.check_idle(5000));
        assert!(power.is_idle());

        // Already idle: no second transition
        assert!(!power.check_idle(9000));
        assert_eq!(power.transitions(), 1);
    }

    #[test]
    fn small_motion_does_not_count() {
        let mut power = PowerStateMachine::new(5000, 0);
        assert!(!power.observe(1.5, 3000));
        assert_eq!(power.last_motion_at(), 0);
        assert!(power.check_idle(5000));
    }

    #[test]
    fn wake_is_immediate() {
        let mut power = PowerStateMachine::new(1000, 0);
        power.check_idle(2000);
        assert_eq!(power.state(), PowerState::Idle);

        assert!(power.observe(2.2, 2100));
        assert_eq!(power.state(), PowerState::Active);
        assert_eq!(power.last_motion_at(), 2100);

        // Inactivity now counts from the wake sample
        assert!(!power.check_idle(3000));
        assert!(power.check_idle(3100));
    }

    #[test]
    fn power_model() {
        let mut power = PowerStateMachine::new(1000, 0);
        assert!((power.power_estimate(20) - 0.8).abs() < 1e-6);
        assert!((power.power_estimate(40) - 1.6).abs() < 1e-6);

        power.check_idle(1000);
        assert!((power.power_estimate(20) - 0.08).abs() < 1e-6);
    }
}
