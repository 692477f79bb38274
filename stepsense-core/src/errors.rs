//! Error Types for the Step Inference Engine
//!
//! ## Design Philosophy
//!
//! The engine treats almost nothing as an error. Sample noise is filtered,
//! out-of-range configuration is clamped, and the detector always answers
//! `true` or `false`. What remains are faults at the collaborator boundaries:
//!
//! - `AccessError`: the platform has no motion capability or the user refused it.
//!   Surfaces to callers of `start_monitoring` only as a `false` return.
//! - `SourceError`: the motion source could not subscribe or dropped out while
//!   being drained. Ends the current drain; the scheduler keeps running.
//! - `StoreError`: the persistence collaborator failed. Logged by the session and
//!   never allowed to block step counting.
//!
//! All variants carry only `&'static str` or nothing, so errors are `Copy` and
//! cheap to return from hot paths.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use stepsense_core::{AccessError, MotionAccess};
//!
//! fn describe(access: &MotionAccess) -> &'static str {
//!     match access {
//!         MotionAccess::Granted => "monitoring may start",
//!         MotionAccess::Denied(AccessError::CapabilityUnavailable) => "no accelerometer",
//!         MotionAccess::Denied(AccessError::PermissionDenied) => "user refused motion access",
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Why motion monitoring may not start
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The platform reports no motion sensor
    #[error("Motion capability unavailable on this platform")]
    CapabilityUnavailable,

    /// The user or platform policy refused motion access
    #[error("Motion permission denied")]
    PermissionDenied,
}

/// Motion source faults
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// Listener registration failed
    #[error("Motion source unavailable: {reason}")]
    Unavailable {
        /// Adapter-supplied reason
        reason: &'static str,
    },

    /// The source stopped delivering after a successful subscription
    #[error("Motion source disconnected")]
    Disconnected,
}

/// Persistence collaborator faults
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying storage failed to read or write
    #[error("Storage I/O failed: {0}")]
    Io(&'static str),

    /// Stored data could not be decoded or encoded
    #[error("Stored calibration malformed: {0}")]
    Format(&'static str),

    /// No storage backend is reachable
    #[error("Calibration store unavailable")]
    Unavailable,
}

#[cfg(feature = "defmt")]
impl defmt::Format for AccessError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::CapabilityUnavailable => defmt::write!(fmt, "Motion capability unavailable"),
            Self::PermissionDenied => defmt::write!(fmt, "Motion permission denied"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SourceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unavailable { reason } => defmt::write!(fmt, "Source unavailable: {}", reason),
            Self::Disconnected => defmt::write!(fmt, "Source disconnected"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Io(reason) => defmt::write!(fmt, "Store I/O: {}", reason),
            Self::Format(reason) => defmt::write!(fmt, "Store format: {}", reason),
            Self::Unavailable => defmt::write!(fmt, "Store unavailable"),
        }
    }
}
