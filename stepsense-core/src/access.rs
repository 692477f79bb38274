//! Motion access acquisition
//!
//! Whether the platform has an accelerometer, and whether the user lets us read
//! it, is answered once, asynchronously, before the scheduler is built. The
//! answer travels into the scheduler as a plain value, so nothing on the sample
//! path ever awaits.
//!
//! ```rust
//! # async fn compose(mut gate: impl stepsense_core::CapabilityGate) {
//! use stepsense_core::MotionAccess;
//!
//! let access = MotionAccess::acquire(&mut gate).await;
//! if !access.is_granted() {
//!     // Fall back to manual step entry at the application layer
//! }
//! # }
//! ```

use crate::errors::AccessError;
use crate::traits::CapabilityGate;

/// Outcome of the capability and permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAccess {
    /// Monitoring may start
    Granted,
    /// Monitoring is not possible on this device or was refused
    Denied(AccessError),
}

impl MotionAccess {
    /// Run the gate's check and record the outcome
    pub async fn acquire<G: CapabilityGate + ?Sized>(gate: &mut G) -> Self {
        match gate.check_access().await {
            Ok(()) => {
                log_info!("Motion access granted");
                Self::Granted
            }
            Err(e) => {
                log_warn!("Motion access unavailable: {}", e);
                Self::Denied(e)
            }
        }
    }

    /// Whether monitoring may start
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// The refusal reason, if any
    pub fn error(&self) -> Option<AccessError> {
        match self {
            Self::Granted => None,
            Self::Denied(e) => Some(*e),
        }
    }
}
