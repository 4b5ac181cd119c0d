//! ghost_trail - Location-based scavenger hunt
//!
//! The player walks an ordered trail of real-world GPS waypoints, guided by
//! distance and a compass arrow, until every waypoint has been found.
//!
//! The pure game logic (geodesy, trail model, progress engine, guidance and
//! overview projection) lives in the `no_std` crate `ghost_trail_core` and
//! is re-exported here. This crate adds the host-side pieces around it.
//!
//! # Modules
//!
//! - [`config`]: JSON game configuration with the built-in Ghost Trail
//! - [`core`]: Logging macros and subscriber setup
//! - [`devices`]: Position and heading source traits and implementations
//! - [`error`]: Session-level error type
//! - [`session`]: Single-owner game session and its async runner

pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod session;

pub use ghost_trail_core::{navigation, sensors, trail};

pub use config::GameConfig;
pub use error::GameError;
pub use session::{GameSession, SessionCommand, SessionHandle, SessionRunner, SessionView};
