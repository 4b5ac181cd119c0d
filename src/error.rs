//! Error types
//!
//! The `no_std` core reports plain enums (`CoordinateError`, `TrailError`,
//! `ProgressError`); this module gathers them with the device and
//! configuration errors into [`GameError`].

use ghost_trail_core::navigation::CoordinateError;
use ghost_trail_core::trail::{ProgressError, TrailError};

use crate::config::ConfigError;
use crate::devices::heading::HeadingError;
use crate::devices::position::PositionError;

/// Errors surfaced by the game session
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No position fixes can be produced. Blocking for the player.
    #[error("position unavailable: {0}")]
    PositionUnavailable(#[from] PositionError),

    /// No compass readings. Non-fatal; guidance falls back to north-up.
    #[error("heading unavailable: {0}")]
    HeadingUnavailable(#[from] HeadingError),

    /// A fix carried NaN or out-of-range coordinates
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(CoordinateError),

    #[error("invalid trail: {0}")]
    InvalidTrail(TrailError),

    #[error("invalid progress settings: {0}")]
    InvalidProgress(ProgressError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session runner is no longer accepting commands
    #[error("session has stopped")]
    SessionClosed,
}

impl From<CoordinateError> for GameError {
    fn from(e: CoordinateError) -> Self {
        GameError::InvalidCoordinate(e)
    }
}

impl From<TrailError> for GameError {
    fn from(e: TrailError) -> Self {
        GameError::InvalidTrail(e)
    }
}

impl From<ProgressError> for GameError {
    fn from(e: ProgressError) -> Self {
        GameError::InvalidProgress(e)
    }
}

impl GameError {
    /// True if the player cannot continue until the cause is fixed
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            GameError::HeadingUnavailable(_) | GameError::InvalidCoordinate(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let e: GameError = PositionError::PermissionDenied.into();
        assert!(matches!(e, GameError::PositionUnavailable(_)));
        assert_eq!(
            e.to_string(),
            "position unavailable: location permission denied"
        );

        let e: GameError = CoordinateError::NotFinite.into();
        assert!(matches!(e, GameError::InvalidCoordinate(_)));
    }

    #[test]
    fn test_blocking_classification() {
        assert!(GameError::from(PositionError::Timeout).is_blocking());
        assert!(!GameError::from(HeadingError::Unsupported).is_blocking());
        assert!(!GameError::from(CoordinateError::LatitudeOutOfRange).is_blocking());
        assert!(GameError::from(TrailError::Empty).is_blocking());
    }
}
