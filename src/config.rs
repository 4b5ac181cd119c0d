//! Game configuration
//!
//! JSON-backed configuration for a hunt: the trail itself plus the tunables
//! for proximity, guidance, the "found" notice and position retries. Every
//! field is optional in the file; missing fields take the defaults below,
//! and an absent `trail` falls back to the built-in Ghost Trail.
//!
//! # Example
//!
//! ```json
//! {
//!   "trail": [
//!     { "name": "Taluut", "latitude": 51.95864, "longitude": 4.48900 },
//!     { "name": "Speeltuin", "latitude": 51.95943, "longitude": 4.48643 }
//!   ],
//!   "acceptance_radius_m": 25.0,
//!   "position_retry": { "max_retries": 3, "retry_delay_ms": 2000 }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ghost_trail_core::navigation::guidance::{
    GuidanceParams, DEFAULT_FOOTSTEP_MIN_DISTANCE_M, DEFAULT_FOOTSTEP_SPACING_M,
    DEFAULT_MAX_FOOTSTEPS,
};
use ghost_trail_core::navigation::{DEFAULT_HEADING_FILTER_ALPHA, PROXIMITY_RADIUS_M};
use ghost_trail_core::trail::{ProgressConfig, Trail, Waypoint, MAX_NAME_LEN, MAX_WAYPOINTS};

use crate::devices::position::RetryPolicy;

/// Default lifetime of the "waypoint found" notice (milliseconds)
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 3000;

/// The built-in Ghost Trail, in visiting order
pub const GHOST_TRAIL: [(&str, f64, f64); 4] = [
    ("Taluut", 51.95864, 4.48900),
    ("Speeltuin", 51.95943, 4.48643),
    ("Langs het water", 51.96000, 4.48902),
    ("Trappetje", 51.95953, 4.49010),
];

/// Errors from loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid trail: {0}")]
    InvalidTrail(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// One waypoint as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Guidance overlay tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Meters of remaining distance per footstep
    pub footstep_spacing_m: f64,
    /// Upper bound on footsteps drawn
    pub max_footsteps: u8,
    /// Footsteps shown only farther than this (meters)
    pub footstep_min_distance_m: f64,
    /// Direction arrow smoothing factor, 0 (frozen) to 1 (raw)
    pub heading_filter_alpha: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            footstep_spacing_m: DEFAULT_FOOTSTEP_SPACING_M,
            max_footsteps: DEFAULT_MAX_FOOTSTEPS,
            footstep_min_distance_m: DEFAULT_FOOTSTEP_MIN_DISTANCE_M,
            heading_filter_alpha: DEFAULT_HEADING_FILTER_ALPHA,
        }
    }
}

impl GuidanceConfig {
    /// Footstep parameters for the core guidance calculation
    pub fn params(&self) -> GuidanceParams {
        GuidanceParams {
            footstep_spacing_m: self.footstep_spacing_m,
            max_footsteps: self.max_footsteps,
            footstep_min_distance_m: self.footstep_min_distance_m,
        }
    }
}

/// Complete hunt configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Waypoints in visiting order
    pub trail: Vec<WaypointConfig>,
    /// Distance at which the current target counts as reached (meters)
    pub acceptance_radius_m: f64,
    pub guidance: GuidanceConfig,
    /// How long the "found" notice stays up (milliseconds)
    pub notice_duration_ms: u64,
    pub position_retry: RetryPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            trail: GHOST_TRAIL
                .iter()
                .map(|&(name, latitude, longitude)| WaypointConfig {
                    name: name.to_string(),
                    latitude,
                    longitude,
                })
                .collect(),
            acceptance_radius_m: PROXIMITY_RADIUS_M,
            guidance: GuidanceConfig::default(),
            notice_duration_ms: DEFAULT_NOTICE_DURATION_MS,
            position_retry: RetryPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        crate::log_info!(
            path = %path.display(),
            waypoints = config.trail.len(),
            "Config: loaded"
        );
        Ok(config)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value is usable
    ///
    /// # Errors
    ///
    /// - `InvalidTrail` for an empty or oversized trail, a name longer than
    ///   32 bytes, or out-of-range waypoint coordinates
    /// - `InvalidValue` for a non-positive radius or spacing, or an alpha
    ///   outside 0..=1
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trail.is_empty() {
            return Err(ConfigError::InvalidTrail("trail has no waypoints".into()));
        }
        if self.trail.len() > MAX_WAYPOINTS {
            return Err(ConfigError::InvalidTrail(format!(
                "{} waypoints exceeds the maximum of {}",
                self.trail.len(),
                MAX_WAYPOINTS
            )));
        }
        for (i, wp) in self.trail.iter().enumerate() {
            if wp.name.len() > MAX_NAME_LEN {
                return Err(ConfigError::InvalidTrail(format!(
                    "waypoint {} name '{}' exceeds {} bytes",
                    i, wp.name, MAX_NAME_LEN
                )));
            }
            Waypoint::new(&wp.name, wp.latitude, wp.longitude).map_err(|e| {
                ConfigError::InvalidTrail(format!("waypoint {} '{}': {}", i, wp.name, e))
            })?;
        }

        positive("acceptance_radius_m", self.acceptance_radius_m)?;
        positive("guidance.footstep_spacing_m", self.guidance.footstep_spacing_m)?;
        if !self.guidance.footstep_min_distance_m.is_finite()
            || self.guidance.footstep_min_distance_m < 0.0
        {
            return Err(ConfigError::InvalidValue {
                field: "guidance.footstep_min_distance_m",
                reason: "must be a non-negative number of meters".into(),
            });
        }
        let alpha = self.guidance.heading_filter_alpha;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::InvalidValue {
                field: "guidance.heading_filter_alpha",
                reason: format!("{} is outside 0..=1", alpha),
            });
        }
        Ok(())
    }

    /// Build the core trail from the configured waypoints
    pub fn build_trail(&self) -> Result<Trail, ConfigError> {
        let mut waypoints = Vec::with_capacity(self.trail.len());
        for wp in &self.trail {
            let waypoint = Waypoint::new(&wp.name, wp.latitude, wp.longitude)
                .map_err(|e| ConfigError::InvalidTrail(format!("'{}': {}", wp.name, e)))?;
            waypoints.push(waypoint);
        }
        Trail::new(waypoints).map_err(|e| ConfigError::InvalidTrail(e.to_string()))
    }

    /// Progress engine settings
    pub fn progress_config(&self) -> ProgressConfig {
        ProgressConfig {
            acceptance_radius_m: self.acceptance_radius_m,
        }
    }

    /// Notice lifetime
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is not a positive number", value),
        })
    }
}
