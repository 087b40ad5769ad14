//! Visibility graph over the routing geometry.

use tracing::debug;

use crate::models::{LngLat, NamedRegion};
use crate::spatial::segments_intersect;

/// Node index of the routing source in every graph.
pub const SRC_NODE: usize = 0;

/// Node index of the routing destination in every graph.
pub const DEST_NODE: usize = 1;

/// A graph whose nodes are the points of interest of one routing request
/// and whose edges connect pairs with unobstructed line of sight.
///
/// Nodes are identified by index: [`SRC_NODE`], then [`DEST_NODE`], then
/// the central-area vertices, then each no-fly zone's vertices in input
/// order. Coordinates are kept only for geometry math, so two nodes that
/// happen to share a position remain distinct entries. A graph is built
/// once per routing request and never mutated afterwards; a new
/// destination means a new graph.
#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    nodes: Vec<LngLat>,
    adjacency: Vec<Vec<usize>>,
}

impl VisibilityGraph {
    /// Build the graph for one request.
    ///
    /// Every unordered node pair is tested for line of sight against the
    /// no-fly zones; the central area contributes nodes but its edges are
    /// not obstacles. O(n² · m) for n nodes and m zone edges, which is
    /// fine at the tens-of-vertices scale this system runs at.
    pub fn build(
        src: LngLat,
        dest: LngLat,
        central_area: &NamedRegion,
        no_fly_zones: &[NamedRegion],
    ) -> Self {
        let mut nodes = vec![src, dest];
        nodes.extend(central_area.vertices.iter().copied());
        for zone in no_fly_zones {
            nodes.extend(zone.vertices.iter().copied());
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if has_line_of_sight(nodes[i], nodes[j], no_fly_zones) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        let graph = Self { nodes, adjacency };
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "visibility graph built"
        );
        graph
    }

    pub fn node(&self, id: usize) -> LngLat {
        self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    pub fn neighbours(&self, id: usize) -> &[usize] {
        &self.adjacency[id]
    }
}

/// True when the segment `p`–`q` is not obstructed by any no-fly zone.
///
/// Two vertices of the same zone never see each other, whatever the
/// geometry says; this keeps the search from cutting across a zone along
/// its own boundary. An intersection at one of the segment's own endpoints
/// is grazing, not obstruction, and is ignored.
pub fn has_line_of_sight(p: LngLat, q: LngLat, no_fly_zones: &[NamedRegion]) -> bool {
    for zone in no_fly_zones {
        if zone.vertices.contains(&p) && zone.vertices.contains(&q) {
            return false;
        }
        for (r, s) in zone.edges() {
            if segments_intersect(p, q, r, s) {
                let at_p = r == p || s == p;
                let at_q = r == q || s == q;
                if !(at_p || at_q) {
                    return false;
                }
            }
        }
    }
    true
}
