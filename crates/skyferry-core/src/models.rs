//! Core data models for drone delivery routing.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// Distance covered by a single drone move, in degrees.
pub const DRONE_MOVE_DISTANCE: f64 = 0.00015;

/// Two positions within this distance count as the same place.
pub const DRONE_IS_CLOSE_DISTANCE: f64 = 0.00015;

/// Sentinel heading for a hover move. Not one of the legal compass headings.
pub const HOVER_ANGLE: f64 = 999.0;

/// Number of legal compass headings.
pub const COMPASS_DIRECTIONS: usize = 16;

/// Angle between adjacent compass headings, in degrees.
pub const COMPASS_INCREMENT_DEG: f64 = 360.0 / COMPASS_DIRECTIONS as f64;

/// Default launch position of the delivery service (Appleton Tower).
pub const APPLETON_TOWER: LngLat = LngLat {
    lng: -3.186874,
    lat: 55.944494,
};

/// A position as (longitude, latitude) in decimal degrees.
///
/// Equality is exact value equality; a `LngLat` doubles as a graph node
/// identity and as a physical drone position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

/// A named polygonal region: an ordered ring of vertices, the last vertex
/// implicitly connected back to the first.
///
/// The central area and the no-fly zones are both `NamedRegion`s; only the
/// latter act as obstacles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub vertices: Vec<LngLat>,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, vertices: Vec<LngLat>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }

    /// Ring edges, including the closing edge from the last vertex back to
    /// the first.
    pub fn edges(&self) -> impl Iterator<Item = (LngLat, LngLat)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Even-odd ray-cast containment test, casting along increasing
    /// latitude with longitude as the crossing axis.
    ///
    /// Points exactly on a ring edge are not classified consistently;
    /// callers must not rely on boundary behavior. A ring with fewer than
    /// three vertices has no interior.
    pub fn contains_point(&self, p: LngLat) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let mut crossings = 0u32;
        for (a, b) in self.edges() {
            let spans = (p.lng < a.lng) != (p.lng < b.lng);
            if spans && p.lat < a.lat + ((p.lng - a.lng) / (b.lng - a.lng)) * (b.lat - a.lat) {
                crossings += 1;
            }
        }
        crossings % 2 == 1
    }

    /// Reject degenerate rings and non-finite vertices.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if self.vertices.len() < 3 {
            return Err(RoutingError::DegeneratePolygon {
                name: self.name.clone(),
                vertices: self.vertices.len(),
            });
        }
        if self.vertices.iter().any(|v| !v.is_finite()) {
            return Err(RoutingError::InvalidGeometry {
                context: format!("vertex of region {:?}", self.name),
            });
        }
        Ok(())
    }
}

/// A single realized drone step: the heading flown and the position reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub from: LngLat,
    /// Compass heading in degrees, or [`HOVER_ANGLE`] for a hover.
    pub angle: f64,
    pub to: LngLat,
}

/// The complete move sequence for one delivery: outbound hops to the
/// destination, the mirrored hops back to the source, and a terminal hover.
///
/// Immutable once returned by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    start: LngLat,
    moves: Vec<Move>,
}

impl FlightPath {
    pub(crate) fn new(start: LngLat, moves: Vec<Move>) -> Self {
        Self { start, moves }
    }

    pub fn start(&self) -> LngLat {
        self.start
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Every position the drone visits, in order, starting at the source.
    pub fn points(&self) -> Vec<LngLat> {
        let mut points = Vec::with_capacity(self.moves.len() + 1);
        points.push(self.start);
        points.extend(self.moves.iter().map(|m| m.to));
        points
    }

    /// Per-move records in the collaborator wire shape.
    pub fn records(&self, order_id: &str) -> Vec<FlightRecord> {
        self.moves
            .iter()
            .map(|m| FlightRecord {
                order_id: order_id.to_string(),
                from_lng: m.from.lng,
                from_lat: m.from.lat,
                heading: m.angle,
                to_lng: m.to.lng,
                to_lat: m.to.lat,
            })
            .collect()
    }
}

/// One serialized move of a delivery flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub order_id: String,
    pub from_lng: f64,
    pub from_lat: f64,
    pub heading: f64,
    pub to_lng: f64,
    pub to_lat: f64,
}
