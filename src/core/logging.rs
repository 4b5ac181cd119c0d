//! Logging abstraction
//!
//! Provides the crate's logging macros on top of `tracing`:
//! - `log_info!`, `log_warn!`, `log_error!`, `log_debug!`, `log_trace!`
//! - Output goes to whatever subscriber is installed; without one the
//!   macros are no-ops
//!
//! ## Subscriber
//!
//! Call [`init_logging`] once from the embedding application to install a
//! formatted stdout subscriber. The level filter defaults to `info` and can
//! be overridden with the `RUST_LOG` environment variable.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

#[doc(hidden)]
pub use tracing;

/// Default filter directive when `RUST_LOG` is not set
pub fn default_filter() -> &'static str {
    "info"
}

/// Install a global stdout subscriber.
///
/// # Arguments
///
/// * `default_directive` - Filter used when `RUST_LOG` is unset or invalid
///   (e.g. `"info"` or `"ghost_trail=debug"`)
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .finish()
        .try_init()
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::info!($($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::warn!($($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::error!($($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::debug!($($arg)*)
    };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::trace!($($arg)*)
    };
}
