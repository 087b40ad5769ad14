pub mod error;
pub mod models;
pub mod pathfind;
pub mod route_engine;
pub mod spatial;
pub mod visibility;

pub use error::RoutingError;
pub use models::{
    FlightPath, FlightRecord, LngLat, Move, NamedRegion, APPLETON_TOWER, COMPASS_DIRECTIONS,
    COMPASS_INCREMENT_DEG, DRONE_IS_CLOSE_DISTANCE, DRONE_MOVE_DISTANCE, HOVER_ANGLE,
};
pub use pathfind::shortest_waypoints;
pub use route_engine::{
    compute_route, compute_route_with_config, PlannerConfig, RoutePlanner,
};
pub use spatial::{
    bearing, distance, in_any_region, is_close, next_position, segments_intersect,
};
pub use visibility::{has_line_of_sight, VisibilityGraph, DEST_NODE, SRC_NODE};
