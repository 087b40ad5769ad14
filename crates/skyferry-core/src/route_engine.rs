//! Flight path construction.
//!
//! Turns one routing request into a complete out-and-back flight path:
//! validate the geometry, find waypoints over the visibility graph, realize
//! each waypoint leg as fixed-length compass moves, then mirror the
//! outbound moves to bring the drone home and finish with a hover.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::models::{
    FlightPath, LngLat, Move, NamedRegion, COMPASS_DIRECTIONS, COMPASS_INCREMENT_DEG, HOVER_ANGLE,
};
use crate::pathfind::shortest_waypoints;
use crate::spatial::{bearing, in_any_region, is_close, next_position};
use crate::visibility::VisibilityGraph;

/// Tunables for flight path construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Upper bound on moves per waypoint leg. The greedy realizer can get
    /// stuck oscillating against a concave zone boundary; the bound turns
    /// that into a reported failure instead of a spin.
    pub max_leg_moves: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_leg_moves: 8_000,
        }
    }
}

/// Compute the full flight path for one delivery: source to destination
/// and back, ending with a hover.
///
/// Pure in its four inputs; same inputs always produce the same path.
pub fn compute_route(
    src: LngLat,
    dest: LngLat,
    central_area: &NamedRegion,
    no_fly_zones: &[NamedRegion],
) -> Result<FlightPath, RoutingError> {
    compute_route_with_config(
        src,
        dest,
        central_area,
        no_fly_zones,
        &PlannerConfig::default(),
    )
}

/// [`compute_route`] with an explicit [`PlannerConfig`].
pub fn compute_route_with_config(
    src: LngLat,
    dest: LngLat,
    central_area: &NamedRegion,
    no_fly_zones: &[NamedRegion],
    config: &PlannerConfig,
) -> Result<FlightPath, RoutingError> {
    validate_request(src, dest, central_area, no_fly_zones)?;

    let graph = VisibilityGraph::build(src, dest, central_area, no_fly_zones);
    let waypoints = match shortest_waypoints(&graph) {
        Ok(waypoints) => waypoints,
        Err(err) => {
            warn!(%err, "routing request failed in waypoint search");
            return Err(err);
        }
    };

    let mut outbound: Vec<Move> = Vec::new();
    let mut current = src;
    for waypoint in waypoints.iter().skip(1) {
        let leg = realize_leg(current, *waypoint, no_fly_zones, config)?;
        if let Some(last) = leg.last() {
            current = last.to;
        }
        outbound.extend(leg);
    }

    // mirror the outbound moves to retrace the exact same positions home,
    // then hover on arrival
    let mut moves = outbound.clone();
    for step in outbound.iter().rev() {
        moves.push(Move {
            from: step.to,
            angle: opposite_heading(step.angle),
            to: step.from,
        });
    }
    let end = moves.last().map_or(src, |m| m.to);
    moves.push(Move {
        from: end,
        angle: HOVER_ANGLE,
        to: end,
    });

    debug!(moves = moves.len(), "flight path assembled");
    Ok(FlightPath::new(src, moves))
}

fn validate_request(
    src: LngLat,
    dest: LngLat,
    central_area: &NamedRegion,
    no_fly_zones: &[NamedRegion],
) -> Result<(), RoutingError> {
    for (context, point) in [("source", src), ("destination", dest)] {
        if !point.is_finite() {
            return Err(RoutingError::InvalidGeometry {
                context: context.to_string(),
            });
        }
    }
    // an empty central area is legal and simply contributes no detour nodes
    if !central_area.vertices.is_empty() {
        central_area.validate()?;
    }
    for zone in no_fly_zones {
        zone.validate()?;
    }
    Ok(())
}

/// Walk from `start` until close to `target` using only legal compass
/// headings, never stepping inside a no-fly zone.
///
/// Greedy: each move takes the legal heading with the smallest absolute
/// difference from the direct bearing to the target, ties going to the
/// lower heading. Returns the moves taken; `start` itself is not a move.
fn realize_leg(
    start: LngLat,
    target: LngLat,
    no_fly_zones: &[NamedRegion],
    config: &PlannerConfig,
) -> Result<Vec<Move>, RoutingError> {
    let mut moves = Vec::new();
    let mut current = start;

    while !is_close(current, target) {
        if moves.len() >= config.max_leg_moves {
            warn!(
                max_leg_moves = config.max_leg_moves,
                "leg exhausted its move budget"
            );
            return Err(RoutingError::PathBuildFailed { moves: moves.len() });
        }

        let desired = bearing(current, target);
        let mut chosen: Option<(f64, LngLat, f64)> = None;
        for direction in 0..COMPASS_DIRECTIONS {
            let angle = direction as f64 * COMPASS_INCREMENT_DEG;
            let next = next_position(current, angle);
            if in_any_region(next, no_fly_zones) {
                continue;
            }
            let difference = (desired - angle).abs();
            if chosen.map_or(true, |(_, _, best)| difference < best) {
                chosen = Some((angle, next, difference));
            }
        }

        let Some((angle, next, _)) = chosen else {
            warn!("every heading is blocked, drone is boxed in");
            return Err(RoutingError::PathBuildFailed { moves: moves.len() });
        };

        moves.push(Move {
            from: current,
            angle,
            to: next,
        });
        current = next;
    }

    Ok(moves)
}

fn opposite_heading(angle: f64) -> f64 {
    (angle + 180.0) % 360.0
}

/// Exact-equality cache key: the IEEE bit patterns of both endpoints.
type PathKey = (u64, u64, u64, u64);

fn path_key(src: LngLat, dest: LngLat) -> PathKey {
    (
        src.lng.to_bits(),
        src.lat.to_bits(),
        dest.lng.to_bits(),
        dest.lat.to_bits(),
    )
}

/// Route planner for a batch of deliveries over fixed geometry.
///
/// Owns the validated central area and no-fly zones and memoizes finished
/// flight paths by exact endpoint coordinates: across an order batch many
/// deliveries go to the same restaurant, and identical geometry plus
/// identical endpoints always yields the identical path. The geometry
/// never changes after construction, so cached paths stay valid for the
/// planner's lifetime; changed geometry means a new planner. Concurrent
/// `plan` calls are safe.
#[derive(Debug)]
pub struct RoutePlanner {
    config: PlannerConfig,
    central_area: NamedRegion,
    no_fly_zones: Vec<NamedRegion>,
    cache: DashMap<PathKey, Arc<FlightPath>>,
}

impl RoutePlanner {
    pub fn new(
        central_area: NamedRegion,
        no_fly_zones: Vec<NamedRegion>,
    ) -> Result<Self, RoutingError> {
        Self::with_config(central_area, no_fly_zones, PlannerConfig::default())
    }

    pub fn with_config(
        central_area: NamedRegion,
        no_fly_zones: Vec<NamedRegion>,
        config: PlannerConfig,
    ) -> Result<Self, RoutingError> {
        if !central_area.vertices.is_empty() {
            central_area.validate()?;
        }
        for zone in &no_fly_zones {
            zone.validate()?;
        }
        Ok(Self {
            config,
            central_area,
            no_fly_zones,
            cache: DashMap::new(),
        })
    }

    pub fn central_area(&self) -> &NamedRegion {
        &self.central_area
    }

    pub fn no_fly_zones(&self) -> &[NamedRegion] {
        &self.no_fly_zones
    }

    /// Plan (or reuse) the flight path for one delivery.
    pub fn plan(&self, src: LngLat, dest: LngLat) -> Result<Arc<FlightPath>, RoutingError> {
        let key = path_key(src, dest);
        if let Some(path) = self.cache.get(&key) {
            debug!("flight path served from cache");
            return Ok(Arc::clone(&path));
        }

        let path = Arc::new(compute_route_with_config(
            src,
            dest,
            &self.central_area,
            &self.no_fly_zones,
            &self.config,
        )?);
        self.cache.insert(key, Arc::clone(&path));
        Ok(path)
    }
}
