//! Game session
//!
//! Owns the [`TrailProgress`] engine together with everything the
//! presentation layer needs around it: the latest fix and heading, the
//! smoothed direction arrow and the "found" notice. All engine mutation
//! goes through [`GameSession::start`], [`GameSession::reset`] and
//! [`GameSession::handle_fix`].
//!
//! # Architecture
//!
//! - `GameSession`: single-owner state, synchronous, no locking
//! - `SessionRunner`: async task feeding the session from the position and
//!   heading sources and a command channel (see [`runner`])
//! - `SessionView`: owned snapshot published to the presentation layer

pub mod notice;
pub mod runner;

pub use notice::FoundNotice;
pub use runner::{SessionCommand, SessionHandle, SessionRunner};

use ghost_trail_core::navigation::{GeoPoint, Guidance, GuidanceIndicator, GuidanceParams};
use ghost_trail_core::navigation::overview::OverviewMap;
use ghost_trail_core::sensors::{HeadingSample, PositionFix};
use ghost_trail_core::trail::{Evaluation, TrailProgress, TrailState, WaypointStatus};

use crate::config::{GameConfig, GuidanceConfig};
use crate::devices::heading::HeadingError;
use crate::devices::position::PositionError;
use crate::error::GameError;

/// What the player should be looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Waiting for the first fix
    Locating,
    /// Position source failed; blocking until a fix arrives again
    PositionUnavailable,
    /// Located, hunt not started
    Ready,
    /// Walking toward the current target
    Hunting,
    /// Every waypoint found
    Completed,
}

/// Compass availability as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStatus {
    /// Not started yet, or waiting for the permission prompt
    #[default]
    Pending,
    /// Source running
    Active,
    /// Permission refused
    Denied,
    /// No compass on this device
    Unsupported,
    /// Source failed or ended
    Lost,
}

impl From<HeadingError> for HeadingStatus {
    fn from(e: HeadingError) -> Self {
        match e {
            HeadingError::PermissionDenied => HeadingStatus::Denied,
            HeadingError::Unsupported => HeadingStatus::Unsupported,
            HeadingError::Unavailable => HeadingStatus::Lost,
        }
    }
}

/// Owned snapshot for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// What the player should see right now
    pub status: SessionStatus,
    /// Lifecycle of the trail itself
    pub state: TrailState,
    /// Waypoints reached so far
    pub visited_count: usize,
    /// Waypoints on the trail
    pub total: usize,
    /// Name of the current target, `None` once completed
    pub current_target: Option<String>,
    /// Index of the current target, frozen at the last waypoint once completed
    pub current_index: usize,
    /// Every waypoint with its status, in trail order
    pub waypoints: Vec<WaypointView>,
    /// Accuracy radius of the latest fix (meters)
    pub accuracy_m: Option<f64>,
    /// Raw guidance toward the current target while hunting
    pub guidance: Option<Guidance>,
    /// Smoothed relative bearing for the direction arrow (-180 to +180]
    pub arrow_deg: Option<f64>,
    /// Compass availability
    pub heading_status: HeadingStatus,
    /// Waypoint to announce as just found
    pub found_notice: Option<String>,
    /// Overview map; carries a player marker once a fix is known
    pub overview: Option<OverviewMap>,
    /// Message for the blocking position failure, if any
    pub error: Option<String>,
}

/// Per-waypoint row of a [`SessionView`]
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointView {
    /// Display name
    pub name: String,
    /// Visited, current or pending
    pub status: WaypointStatus,
}

/// Single-owner game state
pub struct GameSession {
    progress: TrailProgress,
    guidance_params: GuidanceParams,
    indicator: GuidanceIndicator,
    arrow_deg: Option<f64>,
    notice: FoundNotice,
    latest_fix: Option<PositionFix>,
    position: Option<GeoPoint>,
    position_error: Option<PositionError>,
    heading: Option<HeadingSample>,
    heading_status: HeadingStatus,
}

impl GameSession {
    /// Create a session around an existing progress engine
    pub fn new(progress: TrailProgress, guidance: &GuidanceConfig, notice_duration_ms: u64) -> Self {
        Self {
            progress,
            guidance_params: guidance.params(),
            indicator: GuidanceIndicator::new(guidance.heading_filter_alpha),
            arrow_deg: None,
            notice: FoundNotice::new(notice_duration_ms),
            latest_fix: None,
            position: None,
            position_error: None,
            heading: None,
            heading_status: HeadingStatus::default(),
        }
    }

    /// Validate `config` and build a session from it
    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let trail = config.build_trail()?;
        let progress = TrailProgress::with_config(trail, config.progress_config())?;
        Ok(Self::new(
            progress,
            &config.guidance,
            config.notice_duration_ms,
        ))
    }

    /// Begin the hunt. Returns `false` if already started.
    pub fn start(&mut self) -> bool {
        let changed = self.progress.start();
        if changed {
            crate::log_info!(
                waypoints = self.progress.trail().len(),
                "Session: hunt started"
            );
        }
        self.refresh_arrow();
        changed
    }

    /// Discard all progress. Sources and the latest fix are untouched.
    pub fn reset(&mut self) {
        self.progress.reset();
        self.notice.clear();
        self.indicator.reset();
        self.arrow_deg = None;
        crate::log_info!("Session: progress reset");
    }

    /// Feed one position fix.
    ///
    /// # Errors
    ///
    /// `GameError::InvalidCoordinate` if the fix is not a valid position.
    /// The fix is dropped and nothing changes.
    pub fn handle_fix(&mut self, fix: PositionFix) -> Result<Evaluation, GameError> {
        let position = match fix.position() {
            Ok(p) => p,
            Err(e) => {
                crate::log_warn!(
                    latitude = fix.latitude,
                    longitude = fix.longitude,
                    "Session: dropping fix, {}",
                    e
                );
                return Err(e.into());
            }
        };

        if let Some(prev) = &self.latest_fix {
            if fix.timestamp_ms < prev.timestamp_ms {
                // Not reordered; evaluated as it arrives
                crate::log_warn!(
                    previous_ms = prev.timestamp_ms,
                    timestamp_ms = fix.timestamp_ms,
                    "Session: fix out of order"
                );
            }
        }

        if self.position_error.take().is_some() {
            crate::log_info!("Session: position recovered");
        }
        self.latest_fix = Some(fix);
        self.position = Some(position);

        let evaluation = self.progress.evaluate(&fix)?;
        if let Evaluation::Advanced {
            index,
            ref name,
            trail_complete,
        } = evaluation
        {
            crate::log_info!(
                index,
                waypoint = name.as_str(),
                visited = self.progress.visited_count(),
                total = self.progress.trail().len(),
                "Session: waypoint found"
            );
            if trail_complete {
                crate::log_info!("Session: trail completed");
            }
            self.notice.raise(name, fix.timestamp_ms);
        } else {
            self.notice.expire(fix.timestamp_ms);
        }

        self.refresh_arrow();
        Ok(evaluation)
    }

    /// Record a position failure reported by the source
    pub fn handle_position_error(&mut self, error: PositionError) -> GameError {
        crate::log_error!("Session: {}", error);
        self.position_error = Some(error);
        GameError::PositionUnavailable(error)
    }

    /// Feed one compass reading
    pub fn handle_heading(&mut self, sample: HeadingSample) {
        self.heading = Some(sample);
        self.heading_status = HeadingStatus::Active;
        self.refresh_arrow();
    }

    /// Update compass availability
    ///
    /// Anything other than `Active` discards the last reading, so guidance
    /// falls back to north-up.
    pub fn set_heading_status(&mut self, status: HeadingStatus) {
        if status != self.heading_status {
            crate::log_debug!(?status, "Session: heading status changed");
        }
        self.heading_status = status;
        if status != HeadingStatus::Active {
            self.heading = None;
        }
        self.refresh_arrow();
    }

    /// Current status for the presentation layer
    pub fn status(&self) -> SessionStatus {
        if self.position_error.is_some() {
            return SessionStatus::PositionUnavailable;
        }
        if self.latest_fix.is_none() {
            return SessionStatus::Locating;
        }
        match self.progress.state() {
            TrailState::NotStarted => SessionStatus::Ready,
            TrailState::InProgress => SessionStatus::Hunting,
            TrailState::Completed => SessionStatus::Completed,
        }
    }

    /// Guidance toward the current target, while hunting with a known position
    pub fn guidance(&self) -> Option<Guidance> {
        if self.progress.state() != TrailState::InProgress {
            return None;
        }
        let position = self.position.as_ref()?;
        let target = self.progress.current_target()?;
        Some(Guidance::compute(
            position,
            target,
            self.heading.map(|h| h.heading_deg),
            &self.guidance_params,
        ))
    }

    /// Read-only access to the engine
    pub fn progress(&self) -> &TrailProgress {
        &self.progress
    }

    /// Latest accepted fix
    pub fn latest_fix(&self) -> Option<&PositionFix> {
        self.latest_fix.as_ref()
    }

    /// Compass availability as last reported
    pub fn heading_status(&self) -> HeadingStatus {
        self.heading_status
    }

    /// Build an owned snapshot for rendering
    pub fn view(&self) -> SessionView {
        let summary = self.progress.progress_summary();
        let snapshot = self.progress.snapshot();
        let now_ms = self.latest_fix.map(|f| f.timestamp_ms).unwrap_or(0);

        SessionView {
            status: self.status(),
            state: self.progress.state(),
            visited_count: summary.visited_count,
            total: summary.total,
            current_target: summary.current_target_name.map(str::to_string),
            current_index: snapshot.current_index,
            waypoints: snapshot
                .waypoints
                .iter()
                .enumerate()
                .map(|(i, wp)| WaypointView {
                    name: wp.name().to_string(),
                    status: snapshot.status(i),
                })
                .collect(),
            accuracy_m: self.latest_fix.map(|f| f.accuracy_m),
            guidance: self.guidance(),
            arrow_deg: self.arrow_deg,
            heading_status: self.heading_status,
            found_notice: self.notice.visible(now_ms).map(str::to_string),
            overview: OverviewMap::build(&snapshot, self.position.as_ref()),
            error: self
                .position_error
                .map(|e| GameError::PositionUnavailable(e).to_string()),
        }
    }

    fn refresh_arrow(&mut self) {
        self.arrow_deg = match self.guidance() {
            Some(g) => Some(self.indicator.update(self.progress.current_index(), &g)),
            None => None,
        };
    }
}
