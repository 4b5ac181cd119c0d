//! Geographic calculations for navigation
//!
//! Great-circle primitives over latitude/longitude pairs treated as points on
//! a sphere of mean Earth radius. All angles in and out are degrees; the
//! trigonometry runs in radians through `libm` so the module stays `no_std`.
//!
//! Longitude wraparound (points straddling ±180°) needs no special handling:
//! the haversine and forward-azimuth formulas only see `sin`/`cos` of the
//! longitude delta.

use core::fmt;

use libm::{atan2, cos, sin, sqrt};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance at which a waypoint counts as reached (meters)
pub const PROXIMITY_RADIUS_M: f64 = 25.0;

/// Reasons a latitude/longitude pair is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    /// Latitude or longitude is NaN or infinite
    NotFinite,
    /// Latitude outside [-90, 90]
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180]
    LongitudeOutOfRange,
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::NotFinite => write!(f, "coordinate is not a finite number"),
            CoordinateError::LatitudeOutOfRange => {
                write!(f, "latitude outside the range -90..=90 degrees")
            }
            CoordinateError::LongitudeOutOfRange => {
                write!(f, "longitude outside the range -180..=180 degrees")
            }
        }
    }
}

/// A validated position on the globe
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        validate_coordinate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_m(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Initial bearing to `other` in degrees (0-360, true north)
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        bearing_deg(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Check that a latitude/longitude pair is finite and inside the valid ranges.
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<(), CoordinateError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(CoordinateError::NotFinite);
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CoordinateError::LatitudeOutOfRange);
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CoordinateError::LongitudeOutOfRange);
    }
    Ok(())
}

/// Calculate great-circle distance between two positions (Haversine formula)
///
/// # Arguments
///
/// * `lat1`, `lon1` - Start position in degrees
/// * `lat2`, `lon2` - End position in degrees
///
/// # Returns
///
/// Distance in meters. Zero when both positions are identical.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    // Rounding can push `a` a hair outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

    EARTH_RADIUS_M * c
}

/// Calculate the initial bearing (forward azimuth) from one position to another
///
/// # Returns
///
/// Bearing in degrees, clockwise from true north, in `[0, 360)`.
///
/// For identical positions the azimuth is undefined; the formula reduces to
/// `atan2(0, 0)` which yields 0.0, so the degenerate case reports north.
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = sin(delta_lon) * cos(lat2_rad);
    let x = cos(lat1_rad) * sin(lat2_rad) - sin(lat1_rad) * cos(lat2_rad) * cos(delta_lon);

    wrap_360(atan2(y, x).to_degrees())
}

/// Check whether two positions are no more than `radius_m` apart.
pub fn is_within_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_m: f64) -> bool {
    distance_m(lat1, lon1, lat2, lon2) <= radius_m
}

/// Normalize angle to the `[0, 360)` range
pub fn wrap_360(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    // -1e-15 % 360 + 360 rounds up to exactly 360
    if a >= 360.0 {
        a = 0.0;
    }
    a
}

/// Normalize angle to the `(-180, 180]` range
pub fn wrap_180(angle: f64) -> f64 {
    let a = wrap_360(angle);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}
