//! Navigation types and utilities
//!
//! Geodesy on a spherical Earth plus the presentation helpers built on it.

pub mod geo;
pub mod guidance;
pub mod heading_filter;
pub mod overview;

pub use geo::{
    bearing_deg, distance_m, is_within_radius, validate_coordinate, wrap_180, wrap_360,
    CoordinateError, GeoPoint, EARTH_RADIUS_M, PROXIMITY_RADIUS_M,
};
pub use guidance::{footstep_count, Guidance, GuidanceIndicator, GuidanceParams};
pub use heading_filter::{HeadingFilter, DEFAULT_HEADING_FILTER_ALPHA};
pub use overview::{BoundingBox, MapMarker, MapPoint, MapSegment, OverviewMap};
