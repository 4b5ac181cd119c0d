//! Trail State Types
//!
//! Lifecycle and per-waypoint status derived from the progress flags.

/// Trail lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrailState {
    /// Trail loaded, start command not yet issued
    #[default]
    NotStarted,
    /// Hunting for the current target
    InProgress,
    /// Every waypoint visited
    Completed,
}

/// Presentation status of a single waypoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaypointStatus {
    /// Already reached
    Visited,
    /// The current target
    Current,
    /// Not reached yet and not the current target
    Pending,
}
