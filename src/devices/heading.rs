//! Heading source abstraction
//!
//! A heading source delivers compass readings as [`HeadingSample`] values.
//! Platforms differ in whether readings are available outright, behind an
//! explicit permission prompt, or not at all. Those differences stay inside
//! implementations: callers only see [`HeadingSource::capability`] and
//! [`HeadingSource::request_permission`].

use async_trait::async_trait;

use ghost_trail_core::sensors::HeadingSample;

/// What the device can offer before any permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingCapability {
    /// Readings can be subscribed to immediately
    Available,
    /// Readings need an explicit user-granted permission first
    RequiresPermission,
    /// No compass on this device
    Unsupported,
}

/// Result of an explicit permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

/// Errors reported by a heading source
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeadingError {
    #[error("orientation permission denied")]
    PermissionDenied,

    #[error("compass not supported on this device")]
    Unsupported,

    #[error("compass readings unavailable")]
    Unavailable,
}

/// Pluggable provider of compass headings.
///
/// `next_sample` must be cancel-safe, like
/// [`PositionSource::next_fix`](crate::devices::position::PositionSource::next_fix).
#[async_trait]
pub trait HeadingSource: Send {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Capability before any permission request.
    fn capability(&self) -> HeadingCapability;

    /// Ask the platform for permission.
    ///
    /// Sources that need no permission return `Granted`; unsupported
    /// sources return `Denied`.
    async fn request_permission(&mut self) -> PermissionOutcome;

    /// Begin producing samples.
    async fn start(&mut self) -> Result<(), HeadingError>;

    /// Wait for the next sample. `Ok(None)` once stopped or ended.
    async fn next_sample(&mut self) -> Result<Option<HeadingSample>, HeadingError>;

    /// Stop producing samples. Safe to call more than once.
    async fn stop(&mut self);

    /// Check if currently producing samples.
    fn is_active(&self) -> bool;
}

/// Heading source for devices without a compass
#[derive(Debug, Default)]
pub struct NoHeadingSource;

#[async_trait]
impl HeadingSource for NoHeadingSource {
    fn name(&self) -> &str {
        "none"
    }

    fn capability(&self) -> HeadingCapability {
        HeadingCapability::Unsupported
    }

    async fn request_permission(&mut self) -> PermissionOutcome {
        PermissionOutcome::Denied
    }

    async fn start(&mut self) -> Result<(), HeadingError> {
        Err(HeadingError::Unsupported)
    }

    async fn next_sample(&mut self) -> Result<Option<HeadingSample>, HeadingError> {
        Ok(None)
    }

    async fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_heading_source() {
        let mut source = NoHeadingSource;
        assert_eq!(source.capability(), HeadingCapability::Unsupported);
        assert_eq!(source.request_permission().await, PermissionOutcome::Denied);
        assert_eq!(source.start().await, Err(HeadingError::Unsupported));
        assert_eq!(source.next_sample().await, Ok(None));
        assert!(!source.is_active());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HeadingError::PermissionDenied.to_string(),
            "orientation permission denied"
        );
    }
}
