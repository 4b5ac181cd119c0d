//! Trail Progress Engine
//!
//! Owns the player's progress along a [`Trail`]: the visited flags, the
//! current target index and the started/completed flags. All mutation goes
//! through [`TrailProgress::start`], [`TrailProgress::reset`] and
//! [`TrailProgress::evaluate`].
//!
//! # Invariants
//!
//! - `visited.len() == trail.len()`
//! - `current_index` stays inside the trail
//! - `visited[i]` implies `i < current_index`, except the final waypoint,
//!   whose visit sets `completed` and freezes `current_index`
//! - `completed` iff every waypoint is visited
//! - once completed, nothing changes until `reset()`
//!
//! `evaluate` is a pure state transition on synchronous arithmetic; it never
//! blocks and needs no locking while a single task owns the engine.

use core::fmt;

use heapless::Vec;

use super::state::{TrailState, WaypointStatus};
use super::{Trail, Waypoint, WaypointName, MAX_WAYPOINTS};
use crate::navigation::geo::{is_within_radius, CoordinateError, PROXIMITY_RADIUS_M};
use crate::sensors::PositionFix;

/// Tunables for the progress engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressConfig {
    /// Distance (meters) at which the current target counts as reached
    pub acceptance_radius_m: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            acceptance_radius_m: PROXIMITY_RADIUS_M,
        }
    }
}

/// Errors from constructing the progress engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressError {
    /// Acceptance radius must be finite and positive
    InvalidRadius,
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressError::InvalidRadius => {
                write!(f, "acceptance radius must be a positive number of meters")
            }
        }
    }
}

/// Outcome of evaluating one position fix
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    /// Nothing changed (not started, already completed, or target not reached)
    NoChange,
    /// The current target was reached
    Advanced {
        /// Index of the waypoint just reached
        index: usize,
        /// Name of the waypoint just reached
        name: WaypointName,
        /// True if this was the final waypoint
        trail_complete: bool,
    },
}

impl Evaluation {
    /// True for [`Evaluation::Advanced`]
    pub fn is_advanced(&self) -> bool {
        matches!(self, Evaluation::Advanced { .. })
    }
}

/// Counts for a status line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSummary<'a> {
    /// Number of waypoints visited so far
    pub visited_count: usize,
    /// Number of waypoints on the trail
    pub total: usize,
    /// Name of the current target (`None` once completed)
    pub current_target_name: Option<&'a str>,
}

/// Read-only view of the whole progress state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSnapshot<'a> {
    /// Waypoints in visiting order
    pub waypoints: &'a [Waypoint],
    /// Visited flag per waypoint
    pub visited: &'a [bool],
    /// Index of the current target
    pub current_index: usize,
    /// Start command issued
    pub started: bool,
    /// All waypoints visited
    pub completed: bool,
}

impl ProgressSnapshot<'_> {
    /// Presentation status of waypoint `index`
    pub fn status(&self, index: usize) -> WaypointStatus {
        if self.visited.get(index).copied().unwrap_or(false) {
            WaypointStatus::Visited
        } else if index == self.current_index && !self.completed {
            WaypointStatus::Current
        } else {
            WaypointStatus::Pending
        }
    }
}

/// Trail progress engine
///
/// # Example
///
/// ```
/// use ghost_trail_core::sensors::PositionFix;
/// use ghost_trail_core::trail::{Trail, TrailProgress};
///
/// let trail = Trail::from_entries(&[("Start", 51.95864, 4.48900), ("End", 51.95943, 4.48643)])
///     .unwrap();
/// let mut progress = TrailProgress::new(trail);
/// progress.start();
///
/// let result = progress
///     .evaluate(&PositionFix::new(51.95864, 4.48900, 5.0, 0))
///     .unwrap();
/// assert!(result.is_advanced());
/// assert_eq!(progress.current_index(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TrailProgress {
    trail: Trail,
    config: ProgressConfig,
    visited: Vec<bool, MAX_WAYPOINTS>,
    current_index: usize,
    started: bool,
    completed: bool,
}

impl TrailProgress {
    /// Create an engine with the default 25m acceptance radius
    pub fn new(trail: Trail) -> Self {
        let visited = fresh_flags(trail.len());
        Self {
            trail,
            config: ProgressConfig::default(),
            visited,
            current_index: 0,
            started: false,
            completed: false,
        }
    }

    /// Create an engine with custom configuration
    pub fn with_config(trail: Trail, config: ProgressConfig) -> Result<Self, ProgressError> {
        let radius = config.acceptance_radius_m;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ProgressError::InvalidRadius);
        }
        let mut progress = Self::new(trail);
        progress.config = config;
        Ok(progress)
    }

    /// Begin the hunt
    ///
    /// Returns `true` if the engine transitioned, `false` if it was already
    /// started (idempotent, not an error).
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        true
    }

    /// Discard all progress and return to construction-time values
    pub fn reset(&mut self) {
        self.visited = fresh_flags(self.trail.len());
        self.current_index = 0;
        self.started = false;
        self.completed = false;
    }

    /// Evaluate one position fix against the current target.
    ///
    /// # Returns
    ///
    /// - `Err` if the fix has invalid coordinates (state untouched)
    /// - `Ok(NoChange)` before `start()`, after completion, or when the
    ///   fix is outside the acceptance radius
    /// - `Ok(Advanced)` when the current target was reached
    ///
    /// Repeating a fix that already triggered an advance is harmless: the
    /// next check runs against the new target.
    pub fn evaluate(&mut self, fix: &PositionFix) -> Result<Evaluation, CoordinateError> {
        let position = fix.position()?;

        if !self.started || self.completed {
            return Ok(Evaluation::NoChange);
        }

        let index = self.current_index;
        let target = match self.trail.get(index) {
            Some(wp) => wp,
            None => return Ok(Evaluation::NoChange),
        };

        if !is_within_radius(
            position.latitude,
            position.longitude,
            target.latitude(),
            target.longitude(),
            self.config.acceptance_radius_m,
        ) {
            return Ok(Evaluation::NoChange);
        }

        let name = target.name.clone();
        self.visited[index] = true;
        if index == self.trail.last_index() {
            self.completed = true;
        } else {
            self.current_index += 1;
        }

        Ok(Evaluation::Advanced {
            index,
            name,
            trail_complete: self.completed,
        })
    }

    /// Counts and current target name for a status line
    pub fn progress_summary(&self) -> ProgressSummary<'_> {
        ProgressSummary {
            visited_count: self.visited_count(),
            total: self.trail.len(),
            current_target_name: self.current_target().map(Waypoint::name),
        }
    }

    /// Full read-only view for rendering
    pub fn snapshot(&self) -> ProgressSnapshot<'_> {
        ProgressSnapshot {
            waypoints: self.trail.waypoints(),
            visited: &self.visited,
            current_index: self.current_index,
            started: self.started,
            completed: self.completed,
        }
    }

    /// Current target, `None` once the trail is completed
    pub fn current_target(&self) -> Option<&Waypoint> {
        if self.completed {
            return None;
        }
        self.trail.get(self.current_index)
    }

    /// Presentation status of waypoint `index`
    pub fn waypoint_status(&self, index: usize) -> WaypointStatus {
        self.snapshot().status(index)
    }

    /// Lifecycle state derived from the flags
    pub fn state(&self) -> TrailState {
        if self.completed {
            TrailState::Completed
        } else if self.started {
            TrailState::InProgress
        } else {
            TrailState::NotStarted
        }
    }

    /// Number of visited waypoints
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|v| **v).count()
    }

    /// Visited flag per waypoint
    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    /// Index of the current target
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Start command issued
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// All waypoints visited
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The trail being walked
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Active configuration
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }
}

fn fresh_flags(len: usize) -> Vec<bool, MAX_WAYPOINTS> {
    let mut flags = Vec::new();
    // Trail length is bounded by MAX_WAYPOINTS, so this cannot overflow
    let _ = flags.resize(len, false);
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    const GHOST_TRAIL: [(&str, f64, f64); 4] = [
        ("Taluut", 51.95864, 4.48900),
        ("Speeltuin", 51.95943, 4.48643),
        ("Langs het water", 51.96000, 4.48902),
        ("Trappetje", 51.95953, 4.49010),
    ];

    fn ghost_trail() -> TrailProgress {
        TrailProgress::new(Trail::from_entries(&GHOST_TRAIL).unwrap())
    }

    fn fix_at(index: usize, timestamp_ms: u64) -> PositionFix {
        let (_, lat, lon) = GHOST_TRAIL[index];
        PositionFix::new(lat, lon, 5.0, timestamp_ms)
    }

    fn assert_invariants(progress: &TrailProgress) {
        let snap = progress.snapshot();
        assert_eq!(snap.visited.len(), snap.waypoints.len());
        assert!(snap.current_index < snap.waypoints.len());
        for (i, &v) in snap.visited.iter().enumerate() {
            if v && !(snap.completed && i == snap.waypoints.len() - 1) {
                assert!(i < snap.current_index, "visited[{}] ahead of cursor", i);
            }
        }
        assert_eq!(snap.completed, snap.visited.iter().all(|v| *v));
    }

    #[test]
    fn test_initial_state() {
        let progress = ghost_trail();
        assert_eq!(progress.visited(), &[false, false, false, false]);
        assert_eq!(progress.current_index(), 0);
        assert!(!progress.is_started());
        assert!(!progress.is_completed());
        assert_eq!(progress.state(), TrailState::NotStarted);
        assert_invariants(&progress);
    }

    #[test]
    fn test_evaluate_before_start_is_noop() {
        let mut progress = ghost_trail();
        let result = progress.evaluate(&fix_at(0, 0)).unwrap();
        assert_eq!(result, Evaluation::NoChange);
        assert_eq!(progress.visited(), &[false, false, false, false]);
        assert_eq!(progress.current_index(), 0);
    }

    #[test]
    fn test_fix_at_first_waypoint_advances() {
        let mut progress = ghost_trail();
        assert!(progress.start());

        let result = progress.evaluate(&fix_at(0, 0)).unwrap();
        match result {
            Evaluation::Advanced {
                index,
                name,
                trail_complete,
            } => {
                assert_eq!(index, 0);
                assert_eq!(name.as_str(), "Taluut");
                assert!(!trail_complete);
            }
            Evaluation::NoChange => panic!("expected advance"),
        }
        assert_eq!(progress.visited(), &[true, false, false, false]);
        assert_eq!(progress.current_index(), 1);
        assert!(!progress.is_completed());
        assert_invariants(&progress);
    }

    #[test]
    fn test_full_walk_completes_trail() {
        let mut progress = ghost_trail();
        progress.start();

        for i in 0..GHOST_TRAIL.len() {
            let result = progress.evaluate(&fix_at(i, i as u64 * 1000)).unwrap();
            assert!(result.is_advanced(), "waypoint {} not reached", i);
            assert_invariants(&progress);
        }

        assert_eq!(progress.visited(), &[true, true, true, true]);
        assert!(progress.is_completed());
        assert_eq!(progress.current_index(), 3);
        assert_eq!(progress.state(), TrailState::Completed);
    }

    #[test]
    fn test_last_advance_reports_completion() {
        let mut progress = ghost_trail();
        progress.start();
        for i in 0..3 {
            progress.evaluate(&fix_at(i, 0)).unwrap();
        }
        let result = progress.evaluate(&fix_at(3, 0)).unwrap();
        assert_eq!(
            result,
            Evaluation::Advanced {
                index: 3,
                name: WaypointName::try_from("Trappetje").unwrap(),
                trail_complete: true,
            }
        );
    }

    #[test]
    fn test_fix_100m_away_does_not_advance() {
        let mut progress = ghost_trail();
        progress.start();

        let (_, lat, lon) = GHOST_TRAIL[0];
        let fix = PositionFix::new(lat + 0.0009, lon, 5.0, 0);
        assert_eq!(progress.evaluate(&fix).unwrap(), Evaluation::NoChange);
        assert_eq!(progress.visited(), &[false, false, false, false]);
        assert_eq!(progress.current_index(), 0);
    }

    #[test]
    fn test_standing_at_next_waypoint_does_not_skip_current() {
        let mut progress = ghost_trail();
        progress.start();

        // Waypoint 1 is ~200m from waypoint 0, which is still the target
        assert_eq!(
            progress.evaluate(&fix_at(1, 0)).unwrap(),
            Evaluation::NoChange
        );
        assert_eq!(progress.current_index(), 0);
    }

    #[test]
    fn test_repeated_fix_does_not_double_advance() {
        let mut progress = ghost_trail();
        progress.start();

        assert!(progress.evaluate(&fix_at(0, 0)).unwrap().is_advanced());
        assert_eq!(
            progress.evaluate(&fix_at(0, 0)).unwrap(),
            Evaluation::NoChange
        );
        assert_eq!(progress.visited(), &[true, false, false, false]);
        assert_eq!(progress.current_index(), 1);
    }

    #[test]
    fn test_completed_trail_is_frozen() {
        let mut progress = ghost_trail();
        progress.start();
        for i in 0..4 {
            progress.evaluate(&fix_at(i, 0)).unwrap();
        }

        for i in 0..4 {
            assert_eq!(
                progress.evaluate(&fix_at(i, 0)).unwrap(),
                Evaluation::NoChange
            );
        }
        assert_eq!(progress.current_index(), 3);
        assert_eq!(progress.visited(), &[true, true, true, true]);
        assert!(!progress.start());
        assert!(progress.is_completed());
    }

    #[test]
    fn test_reset_after_completion() {
        let mut progress = ghost_trail();
        progress.start();
        for i in 0..4 {
            progress.evaluate(&fix_at(i, 0)).unwrap();
        }

        progress.reset();
        assert_eq!(progress.visited(), &[false, false, false, false]);
        assert_eq!(progress.current_index(), 0);
        assert!(!progress.is_started());
        assert!(!progress.is_completed());
        assert_invariants(&progress);
    }

    #[test]
    fn test_reset_requires_new_start() {
        let mut progress = ghost_trail();
        progress.start();
        progress.reset();
        assert_eq!(
            progress.evaluate(&fix_at(0, 0)).unwrap(),
            Evaluation::NoChange
        );
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut progress = ghost_trail();
        assert!(progress.start());
        assert!(!progress.start());
        assert!(progress.is_started());
        assert_eq!(progress.state(), TrailState::InProgress);
    }

    #[test]
    fn test_invalid_fix_is_rejected_without_state_change() {
        let mut progress = ghost_trail();
        progress.start();

        let bad = PositionFix::new(f64::NAN, 4.489, 5.0, 0);
        assert_eq!(progress.evaluate(&bad), Err(CoordinateError::NotFinite));

        let bad = PositionFix::new(51.95864, 200.0, 5.0, 0);
        assert_eq!(
            progress.evaluate(&bad),
            Err(CoordinateError::LongitudeOutOfRange)
        );

        assert_eq!(progress.visited(), &[false, false, false, false]);
        assert_eq!(progress.current_index(), 0);
    }

    #[test]
    fn test_progress_summary() {
        let mut progress = ghost_trail();
        let summary = progress.progress_summary();
        assert_eq!(summary.visited_count, 0);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.current_target_name, Some("Taluut"));

        progress.start();
        progress.evaluate(&fix_at(0, 0)).unwrap();
        let summary = progress.progress_summary();
        assert_eq!(summary.visited_count, 1);
        assert_eq!(summary.current_target_name, Some("Speeltuin"));

        for i in 1..4 {
            progress.evaluate(&fix_at(i, 0)).unwrap();
        }
        let summary = progress.progress_summary();
        assert_eq!(summary.visited_count, 4);
        assert_eq!(summary.current_target_name, None);
    }

    #[test]
    fn test_waypoint_status() {
        let mut progress = ghost_trail();
        progress.start();
        progress.evaluate(&fix_at(0, 0)).unwrap();

        assert_eq!(progress.waypoint_status(0), WaypointStatus::Visited);
        assert_eq!(progress.waypoint_status(1), WaypointStatus::Current);
        assert_eq!(progress.waypoint_status(2), WaypointStatus::Pending);
        assert_eq!(progress.waypoint_status(3), WaypointStatus::Pending);

        for i in 1..4 {
            progress.evaluate(&fix_at(i, 0)).unwrap();
        }
        for i in 0..4 {
            assert_eq!(progress.waypoint_status(i), WaypointStatus::Visited);
        }
    }

    #[test]
    fn test_custom_radius() {
        let trail = Trail::from_entries(&GHOST_TRAIL).unwrap();
        let config = ProgressConfig {
            acceptance_radius_m: 250.0,
        };
        let mut progress = TrailProgress::with_config(trail, config).unwrap();
        progress.start();

        // With a 250m radius, standing at waypoint 1 also reaches waypoint 0
        assert!(progress.evaluate(&fix_at(1, 0)).unwrap().is_advanced());
        assert_eq!(progress.current_index(), 1);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        for radius in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let trail = Trail::from_entries(&GHOST_TRAIL).unwrap();
            let config = ProgressConfig {
                acceptance_radius_m: radius,
            };
            assert_eq!(
                TrailProgress::with_config(trail, config).err(),
                Some(ProgressError::InvalidRadius)
            );
        }
    }

    #[test]
    fn test_single_waypoint_trail() {
        let trail = Trail::from_entries(&[("Only", 10.0, 10.0)]).unwrap();
        let mut progress = TrailProgress::new(trail);
        progress.start();

        let result = progress
            .evaluate(&PositionFix::new(10.0, 10.0, 3.0, 0))
            .unwrap();
        assert!(matches!(
            result,
            Evaluation::Advanced {
                index: 0,
                trail_complete: true,
                ..
            }
        ));
        assert_eq!(progress.current_index(), 0);
        assert_invariants(&progress);
    }
}
