//! Sensor record types
//!
//! Plain data delivered by the position and heading collaborators. The core
//! never fuses or smooths position: each fix fully replaces the previous one.

use crate::navigation::geo::{wrap_360, CoordinateError, GeoPoint};

/// One reported device position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Horizontal accuracy radius in meters
    pub accuracy_m: f64,
    /// Fix time in milliseconds (source-defined epoch, non-decreasing)
    pub timestamp_ms: u64,
}

impl PositionFix {
    /// Create a new position fix
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64, timestamp_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            timestamp_ms,
        }
    }

    /// Validated position of this fix
    ///
    /// Returns `Err` when the source produced NaN or out-of-range coordinates.
    pub fn position(&self) -> Result<GeoPoint, CoordinateError> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// One compass reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingSample {
    /// Heading in degrees (0-360, 0 = North)
    pub heading_deg: f64,
    /// Reported accuracy in degrees (0 = unknown)
    pub accuracy: f64,
}

impl HeadingSample {
    /// Create a heading sample, wrapping the heading into `[0, 360)`.
    ///
    /// Non-finite headings become 0.0 (north).
    pub fn new(heading_deg: f64, accuracy: f64) -> Self {
        let heading_deg = if heading_deg.is_finite() {
            wrap_360(heading_deg)
        } else {
            0.0
        };
        Self {
            heading_deg,
            accuracy,
        }
    }
}
