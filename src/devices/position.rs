//! Position source abstraction
//!
//! A position source delivers a stream of [`PositionFix`] values after being
//! started, or an explicit failure. Platform location services, replayed
//! tracks and test fixtures all sit behind [`PositionSource`].
//!
//! # Architecture
//!
//! - `PositionSource`: async trait implemented by every provider
//! - `RetryingPositionSource`: wrapper that absorbs transient failures
//!   (timeout, temporarily unavailable) with a fixed delay between attempts
//! - Permission and capability failures are never retried

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use ghost_trail_core::sensors::PositionFix;

/// Default number of consecutive transient failures absorbed before surfacing
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between retry attempts (milliseconds)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Errors reported by a position source
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position temporarily unavailable")]
    Unavailable,

    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("location services not supported on this device")]
    Unsupported,
}

impl PositionError {
    /// True for failures that may clear up on their own
    pub fn is_transient(&self) -> bool {
        matches!(self, PositionError::Unavailable | PositionError::Timeout)
    }
}

/// Pluggable provider of position fixes.
///
/// `next_fix` must be cancel-safe: dropping the returned future before it
/// completes must not lose a fix or restart a pending delay. The session
/// polls it inside `tokio::select!` next to the heading stream.
#[async_trait]
pub trait PositionSource: Send {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Acquire the underlying sensor and begin producing fixes.
    async fn start(&mut self) -> Result<(), PositionError>;

    /// Wait for the next fix.
    ///
    /// Returns `Ok(None)` once the source has stopped or its stream ended.
    async fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError>;

    /// Release the underlying sensor. Safe to call more than once.
    async fn stop(&mut self);

    /// Check if currently producing fixes.
    fn is_active(&self) -> bool;
}

/// Retry policy for transient position failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Consecutive transient failures absorbed before surfacing one
    pub max_retries: u32,
    /// Delay before asking the source again (milliseconds)
    pub retry_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay between attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Position source wrapper that retries transient failures.
///
/// Up to `max_retries` consecutive `Timeout`/`Unavailable` errors are
/// swallowed with `retry_delay` between attempts. The next failure after
/// that is returned to the caller and the counter starts over. A fix resets
/// the counter.
///
/// The backoff deadline is stored on the wrapper, so dropping `next_fix`
/// mid-delay does not shorten the wait for the next attempt.
pub struct RetryingPositionSource<S> {
    inner: S,
    policy: RetryPolicy,
    consecutive_failures: u32,
    retry_at: Option<Instant>,
}

impl<S: PositionSource> RetryingPositionSource<S> {
    /// Wrap `inner` with the given retry policy
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            consecutive_failures: 0,
            retry_at: None,
        }
    }

    /// Active retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Transient failures absorbed since the last fix
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Get a reference to the wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner source
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: PositionSource> PositionSource for RetryingPositionSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn start(&mut self) -> Result<(), PositionError> {
        self.consecutive_failures = 0;
        self.retry_at = None;
        self.inner.start().await
    }

    async fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError> {
        loop {
            if let Some(at) = self.retry_at {
                tokio::time::sleep_until(at).await;
                self.retry_at = None;
            }
            match self.inner.next_fix().await {
                Ok(fix) => {
                    self.consecutive_failures = 0;
                    return Ok(fix);
                }
                Err(e) if e.is_transient() && self.consecutive_failures < self.policy.max_retries => {
                    self.consecutive_failures += 1;
                    crate::log_warn!(
                        source = self.inner.name(),
                        attempt = self.consecutive_failures,
                        max_retries = self.policy.max_retries,
                        "Position: {}, retrying",
                        e
                    );
                    self.retry_at = Some(Instant::now() + self.policy.retry_delay());
                }
                Err(e) => {
                    crate::log_error!(source = self.inner.name(), "Position: {}", e);
                    self.consecutive_failures = 0;
                    return Err(e);
                }
            }
        }
    }

    async fn stop(&mut self) {
        self.inner.stop().await;
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}
