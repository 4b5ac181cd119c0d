//! Angular smoothing for compass readings
//!
//! Phone compasses jitter by several degrees between events. The filter
//! blends each new reading into the previous output so the direction arrow
//! turns smoothly. Blending always takes the short way around the circle,
//! so a needle hovering near north does not spin through south.

use super::geo::{wrap_180, wrap_360};

/// Default blend factor for compass guidance
pub const DEFAULT_HEADING_FILTER_ALPHA: f64 = 0.3;

/// Exponential blend of angles in degrees.
///
/// `alpha` is the weight of each new reading: 1.0 follows the input
/// exactly, 0.0 freezes on the first reading.
#[derive(Clone, Debug)]
pub struct HeadingFilter {
    alpha: f64,
    last: Option<f64>,
}

impl HeadingFilter {
    /// Create a filter; `alpha` is clamped to `0.0..=1.0` and NaN means 1.0
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_nan() {
            1.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self { alpha, last: None }
    }

    /// Blend factor in use
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Feed one reading (degrees, any range) and get the blended angle in `[0, 360)`.
    ///
    /// The first reading after construction or [`reset`](Self::reset)
    /// is returned as-is.
    pub fn apply(&mut self, angle_deg: f64) -> f64 {
        let output = match self.last {
            None => wrap_360(angle_deg),
            Some(last) => wrap_360(last + self.alpha * wrap_180(angle_deg - last)),
        };
        self.last = Some(output);
        output
    }

    /// Last blended angle, `None` before the first reading
    pub fn current(&self) -> Option<f64> {
        self.last
    }

    /// Forget history; the next reading passes through unchanged
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_HEADING_FILTER_ALPHA)
    }
}
