//! Directional guidance toward the current target
//!
//! Turns a position fix, the current target and an optional device heading
//! into what a compass arrow and footstep overlay need: distance, absolute
//! bearing, bearing relative to where the device points, and how many
//! footsteps to draw.
//!
//! When no heading is available the neutral heading 0 is used, so the arrow
//! degrades to an absolute (north-up) bearing.

use libm::floor;

use super::geo::{wrap_180, wrap_360, GeoPoint};
use super::heading_filter::{HeadingFilter, DEFAULT_HEADING_FILTER_ALPHA};
use crate::trail::Waypoint;

/// Default spacing between drawn footsteps (meters)
pub const DEFAULT_FOOTSTEP_SPACING_M: f64 = 10.0;

/// Default cap on drawn footsteps
pub const DEFAULT_MAX_FOOTSTEPS: u8 = 8;

/// Default distance beyond which the footstep trail is shown (meters)
pub const DEFAULT_FOOTSTEP_MIN_DISTANCE_M: f64 = 30.0;

/// Tunables for guidance output
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuidanceParams {
    /// Meters of remaining distance per drawn footstep
    pub footstep_spacing_m: f64,
    /// Maximum number of footsteps
    pub max_footsteps: u8,
    /// Footsteps are only shown farther than this (meters)
    pub footstep_min_distance_m: f64,
}

impl Default for GuidanceParams {
    fn default() -> Self {
        Self {
            footstep_spacing_m: DEFAULT_FOOTSTEP_SPACING_M,
            max_footsteps: DEFAULT_MAX_FOOTSTEPS,
            footstep_min_distance_m: DEFAULT_FOOTSTEP_MIN_DISTANCE_M,
        }
    }
}

/// Guidance toward one target for one fix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Guidance {
    /// Distance to target in meters
    pub distance_m: f64,
    /// Bearing to target in degrees (0-360, true north)
    pub bearing_deg: f64,
    /// Device heading used (0 when unavailable)
    pub heading_deg: f64,
    /// False when guidance fell back to the neutral heading
    pub heading_available: bool,
    /// Bearing minus heading, degrees (-180 to +180]
    pub relative_bearing_deg: f64,
    /// Footsteps to draw toward the target
    pub footsteps: u8,
    /// Whether the footstep trail should be visible
    pub show_footsteps: bool,
}

impl Guidance {
    /// Compute guidance from `from` toward `target`
    ///
    /// # Arguments
    ///
    /// * `from` - Current validated position
    /// * `target` - Waypoint to walk to
    /// * `heading_deg` - Device heading, `None` if the heading source is unavailable
    /// * `params` - Footstep tunables
    pub fn compute(
        from: &GeoPoint,
        target: &Waypoint,
        heading_deg: Option<f64>,
        params: &GuidanceParams,
    ) -> Self {
        let to = target.position();
        let distance_m = from.distance_to(&to);
        let bearing_deg = from.bearing_to(&to);

        let (heading_deg, heading_available) = match heading_deg {
            Some(h) if h.is_finite() => (wrap_360(h), true),
            _ => (0.0, false),
        };

        Self {
            distance_m,
            bearing_deg,
            heading_deg,
            heading_available,
            relative_bearing_deg: wrap_180(bearing_deg - heading_deg),
            footsteps: footstep_count(distance_m, params),
            show_footsteps: distance_m > params.footstep_min_distance_m,
        }
    }
}

/// Number of footsteps for a remaining distance
pub fn footstep_count(distance_m: f64, params: &GuidanceParams) -> u8 {
    if params.footstep_spacing_m <= 0.0 || !distance_m.is_finite() || distance_m <= 0.0 {
        return 0;
    }
    let steps = floor(distance_m / params.footstep_spacing_m);
    if steps >= params.max_footsteps as f64 {
        params.max_footsteps
    } else {
        steps as u8
    }
}

/// Smoothed direction arrow
///
/// Blends the relative bearing across frames so the arrow turns instead of
/// snapping. The filter restarts whenever the target changes.
#[derive(Clone, Debug)]
pub struct GuidanceIndicator {
    filter: HeadingFilter,
    target_index: Option<usize>,
}

impl GuidanceIndicator {
    /// Create an indicator with the given smoothing factor
    pub fn new(alpha: f64) -> Self {
        Self {
            filter: HeadingFilter::new(alpha),
            target_index: None,
        }
    }

    /// Feed the latest guidance; returns the smoothed relative bearing (-180 to +180]
    pub fn update(&mut self, target_index: usize, guidance: &Guidance) -> f64 {
        if self.target_index != Some(target_index) {
            self.filter.reset();
            self.target_index = Some(target_index);
        }
        wrap_180(self.filter.apply(wrap_360(guidance.relative_bearing_deg)))
    }

    /// Last smoothed relative bearing
    pub fn current(&self) -> Option<f64> {
        self.filter.current().map(wrap_180)
    }

    /// Forget smoothing history and target
    pub fn reset(&mut self) {
        self.filter.reset();
        self.target_index = None;
    }
}

impl Default for GuidanceIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_HEADING_FILTER_ALPHA)
    }
}
