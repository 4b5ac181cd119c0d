//! Device sources
//!
//! Sensor collaborators the session consumes, behind async traits so that
//! platform location services, replayed tracks and test fixtures are
//! interchangeable.
//!
//! ## Modules
//!
//! - `position`: Position source trait, errors and retry wrapper
//! - `heading`: Heading source trait, capability and permission model
//! - `channel`: mpsc-backed sources for push-style platform callbacks
//! - `scripted`: Sources replaying a fixed sequence

pub mod channel;
pub mod heading;
pub mod position;
pub mod scripted;

pub use channel::{ChannelHeadingSource, ChannelPositionSource, HeadingSender, PositionSender};
pub use heading::{
    HeadingCapability, HeadingError, HeadingSource, NoHeadingSource, PermissionOutcome,
};
pub use position::{PositionError, PositionSource, RetryPolicy, RetryingPositionSource};
pub use scripted::{ScriptedHeadingSource, ScriptedPositionSource};
