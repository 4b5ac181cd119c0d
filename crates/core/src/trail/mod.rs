//! Trail Types
//!
//! The fixed, ordered list of waypoints a player walks and the engine that
//! tracks progress along it.
//!
//! # Trail Storage
//!
//! - Fixed-size waypoint array (max 32 waypoints)
//! - Built once at startup, never mutated afterwards
//! - Waypoint names are bounded (32 bytes) so the crate stays allocation-free
//!
//! # Note
//!
//! This module contains only pure data types and the progress state machine.
//! Configuration loading and sensor plumbing live in the host crate.

pub mod progress;
pub mod state;

use core::fmt;

use heapless::{String, Vec};

use crate::navigation::geo::{validate_coordinate, CoordinateError, GeoPoint};

pub use progress::{
    Evaluation, ProgressConfig, ProgressError, ProgressSnapshot, ProgressSummary, TrailProgress,
};
pub use state::{TrailState, WaypointStatus};

/// Maximum number of waypoints in a trail
pub const MAX_WAYPOINTS: usize = 32;

/// Maximum waypoint name length in bytes
pub const MAX_NAME_LEN: usize = 32;

/// Bounded waypoint name
pub type WaypointName = String<MAX_NAME_LEN>;

/// Errors from building a trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailError {
    /// A trail needs at least one waypoint
    Empty,
    /// More than [`MAX_WAYPOINTS`] waypoints supplied
    TooManyWaypoints,
    /// Waypoint name longer than [`MAX_NAME_LEN`] bytes
    NameTooLong,
    /// Waypoint coordinates are not a valid position
    InvalidCoordinate(CoordinateError),
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailError::Empty => write!(f, "trail has no waypoints"),
            TrailError::TooManyWaypoints => {
                write!(f, "trail has more than {} waypoints", MAX_WAYPOINTS)
            }
            TrailError::NameTooLong => {
                write!(f, "waypoint name longer than {} bytes", MAX_NAME_LEN)
            }
            TrailError::InvalidCoordinate(e) => write!(f, "invalid waypoint position: {}", e),
        }
    }
}

impl From<CoordinateError> for TrailError {
    fn from(e: CoordinateError) -> Self {
        TrailError::InvalidCoordinate(e)
    }
}

/// Trail waypoint
///
/// A fixed real-world target. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    name: WaypointName,
    latitude: f64,
    longitude: f64,
}

impl Waypoint {
    /// Create a new waypoint
    ///
    /// # Arguments
    ///
    /// * `name` - Display name (at most 32 bytes)
    /// * `latitude` - Latitude in degrees
    /// * `longitude` - Longitude in degrees
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Result<Self, TrailError> {
        validate_coordinate(latitude, longitude)?;
        let mut bounded = WaypointName::new();
        bounded
            .push_str(name)
            .map_err(|_| TrailError::NameTooLong)?;
        Ok(Self {
            name: bounded,
            latitude,
            longitude,
        })
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Position of this waypoint
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Ordered, non-empty waypoint list
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
}

impl Trail {
    /// Build a trail from waypoints in visiting order
    pub fn new<I>(waypoints: I) -> Result<Self, TrailError>
    where
        I: IntoIterator<Item = Waypoint>,
    {
        let mut list = Vec::new();
        for wp in waypoints {
            list.push(wp).map_err(|_| TrailError::TooManyWaypoints)?;
        }
        if list.is_empty() {
            return Err(TrailError::Empty);
        }
        Ok(Self { waypoints: list })
    }

    /// Build a trail from `(name, latitude, longitude)` entries
    pub fn from_entries(entries: &[(&str, f64, f64)]) -> Result<Self, TrailError> {
        let mut list: Vec<Waypoint, MAX_WAYPOINTS> = Vec::new();
        for &(name, lat, lon) in entries {
            let wp = Waypoint::new(name, lat, lon)?;
            list.push(wp).map_err(|_| TrailError::TooManyWaypoints)?;
        }
        Self::new(list)
    }

    /// Get number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; a trail is never empty
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Get a waypoint by index
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Get all waypoints as slice
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}
