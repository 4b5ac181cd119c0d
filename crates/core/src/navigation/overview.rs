//! Overview map projection
//!
//! Projects the trail, the route between consecutive waypoints and the
//! player's position into a unit square using the trail's bounding box.
//! Coordinates are normalized so x grows east and y grows south, which maps
//! directly onto screen space. A degenerate span (all waypoints on one
//! meridian or parallel) projects to the middle of that axis.
//!
//! Waypoints always land inside the unit square. The player marker uses the
//! same projection and falls outside it when off the trail area.

use heapless::Vec;

use super::geo::GeoPoint;
use crate::trail::{ProgressSnapshot, WaypointStatus, MAX_WAYPOINTS};

/// Point in normalized map space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPoint {
    /// West (0) to east (1)
    pub x: f64,
    /// North (0) to south (1)
    pub y: f64,
}

/// Waypoint marker on the overview
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapMarker {
    /// Trail index
    pub index: usize,
    /// Projected waypoint position
    pub point: MapPoint,
    /// Visited, current or pending
    pub status: WaypointStatus,
}

/// Route segment between consecutive waypoints
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapSegment {
    /// Earlier waypoint of the pair
    pub from: MapPoint,
    /// Later waypoint of the pair
    pub to: MapPoint,
    /// Starting waypoint already visited
    pub walked: bool,
}

/// Latitude/longitude bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Southern edge (degrees)
    pub min_lat: f64,
    /// Northern edge (degrees)
    pub max_lat: f64,
    /// Western edge (degrees)
    pub min_lon: f64,
    /// Eastern edge (degrees)
    pub max_lon: f64,
}

impl BoundingBox {
    /// Smallest box containing all points; `None` for an empty iterator
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        for p in iter {
            bbox.min_lat = bbox.min_lat.min(p.latitude);
            bbox.max_lat = bbox.max_lat.max(p.latitude);
            bbox.min_lon = bbox.min_lon.min(p.longitude);
            bbox.max_lon = bbox.max_lon.max(p.longitude);
        }
        Some(bbox)
    }

    /// Project into normalized map space
    pub fn project(&self, point: &GeoPoint) -> MapPoint {
        MapPoint {
            x: normalize(point.longitude, self.min_lon, self.max_lon),
            y: 1.0 - normalize(point.latitude, self.min_lat, self.max_lat),
        }
    }
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 0.5;
    }
    (value - min) / span
}

/// Everything needed to draw the overview map
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewMap {
    /// Box around the waypoints used for the projection
    pub bounds: BoundingBox,
    /// One marker per waypoint, in trail order
    pub markers: Vec<MapMarker, MAX_WAYPOINTS>,
    /// Route between consecutive waypoints
    pub segments: Vec<MapSegment, MAX_WAYPOINTS>,
    /// Player position, if a fix is known
    pub player: Option<MapPoint>,
}

impl OverviewMap {
    /// Build the overview for the current progress and optional player position
    ///
    /// The box spans the waypoints only.
    pub fn build(snapshot: &ProgressSnapshot<'_>, player: Option<&GeoPoint>) -> Option<Self> {
        let bounds = BoundingBox::around(snapshot.waypoints.iter().map(|w| w.position()))?;

        let mut markers = Vec::new();
        for (index, wp) in snapshot.waypoints.iter().enumerate() {
            let _ = markers.push(MapMarker {
                index,
                point: bounds.project(&wp.position()),
                status: snapshot.status(index),
            });
        }

        let mut segments = Vec::new();
        for pair in markers.windows(2) {
            let _ = segments.push(MapSegment {
                from: pair[0].point,
                to: pair[1].point,
                walked: pair[0].status == WaypointStatus::Visited,
            });
        }

        Some(Self {
            bounds,
            markers,
            segments,
            player: player.map(|p| bounds.project(p)),
        })
    }
}
