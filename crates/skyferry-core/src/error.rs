//! Error types reported by the routing core.

use thiserror::Error;

/// Failure of a routing request.
///
/// A routing request either produces a complete flight path or one of these
/// errors; a partially built path is never returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// A polygon had fewer than three vertices and therefore no interior.
    #[error("polygon {name:?} is degenerate ({vertices} vertices)")]
    DegeneratePolygon { name: String, vertices: usize },

    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate in {context}")]
    InvalidGeometry { context: String },

    /// No unobstructed node sequence connects the source to the destination.
    #[error("no route between source and destination")]
    RouteUnreachable,

    /// The compass realizer could not make progress: either every heading
    /// was blocked, or the move budget for a single leg ran out.
    #[error("could not build compass path (gave up after {moves} moves)")]
    PathBuildFailed { moves: usize },
}
