//! Capability and Permission Gate
//!
//! Motion access is resolved once, asynchronously, before the scheduler is
//! constructed. The per-sample path stays fully synchronous.

use async_trait::async_trait;

use crate::errors::AccessError;

/// Asynchronous check that motion monitoring may start
///
/// Implementations probe the platform for an accelerometer and, where the
/// platform requires it, prompt the user for permission.
///
/// ```rust
/// use async_trait::async_trait;
/// use stepsense_core::traits::CapabilityGate;
/// use stepsense_core::AccessError;
///
/// struct AlwaysGranted;
///
/// #[async_trait]
/// impl CapabilityGate for AlwaysGranted {
///     async fn check_access(&mut self) -> Result<(), AccessError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CapabilityGate: Send {
    /// Resolve whether motion data may be read
    ///
    /// `Err(CapabilityUnavailable)` when the platform has no sensor,
    /// `Err(PermissionDenied)` when access was refused.
    async fn check_access(&mut self) -> Result<(), AccessError>;
}
