//! Shortest waypoint search over the visibility graph.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::error::RoutingError;
use crate::models::LngLat;
use crate::spatial::distance;
use crate::visibility::{VisibilityGraph, DEST_NODE, SRC_NODE};

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    node: usize,
    g_score: FloatOrd,
    f_score: FloatOrd,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Find the minimum-cost waypoint sequence from the graph's source node to
/// its destination node.
///
/// A* with Euclidean distance as both edge cost and heuristic; the
/// straight-line estimate never exceeds the remaining true cost, so the
/// first time the destination is popped its cost is optimal. Returns
/// [`RoutingError::RouteUnreachable`] when the frontier drains first.
pub fn shortest_waypoints(graph: &VisibilityGraph) -> Result<Vec<LngLat>, RoutingError> {
    let dest = graph.node(DEST_NODE);

    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    let mut closed_set: HashSet<usize> = HashSet::new();
    let mut g_score: HashMap<usize, f64> = HashMap::new();
    let mut came_from: HashMap<usize, usize> = HashMap::new();

    g_score.insert(SRC_NODE, 0.0);
    open_set.push(Reverse(OpenNode {
        node: SRC_NODE,
        g_score: FloatOrd(0.0),
        f_score: FloatOrd(distance(graph.node(SRC_NODE), dest)),
    }));

    let mut visited = 0usize;
    while let Some(Reverse(current)) = open_set.pop() {
        if closed_set.contains(&current.node) {
            continue;
        }
        let best_g = g_score.get(&current.node).copied().unwrap_or(f64::INFINITY);
        if current.g_score.0 > best_g {
            // stale frontier entry, a cheaper one was processed already
            continue;
        }
        visited += 1;

        if current.node == DEST_NODE {
            debug!(visited, cost = best_g, "shortest waypoint path found");
            return Ok(reconstruct(graph, &came_from));
        }
        closed_set.insert(current.node);

        for &neighbour in graph.neighbours(current.node) {
            if closed_set.contains(&neighbour) {
                continue;
            }
            let tentative_g =
                best_g + distance(graph.node(current.node), graph.node(neighbour));
            if tentative_g < g_score.get(&neighbour).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(neighbour, current.node);
                g_score.insert(neighbour, tentative_g);
                open_set.push(Reverse(OpenNode {
                    node: neighbour,
                    g_score: FloatOrd(tentative_g),
                    f_score: FloatOrd(tentative_g + distance(graph.node(neighbour), dest)),
                }));
            }
        }
    }

    debug!(visited, "frontier drained before reaching destination");
    Err(RoutingError::RouteUnreachable)
}

/// Walk the parent map backwards from the destination and reverse.
fn reconstruct(graph: &VisibilityGraph, came_from: &HashMap<usize, usize>) -> Vec<LngLat> {
    let mut ids = vec![DEST_NODE];
    let mut current = DEST_NODE;
    while let Some(&parent) = came_from.get(&current) {
        ids.push(parent);
        current = parent;
    }
    ids.reverse();
    ids.into_iter().map(|id| graph.node(id)).collect()
}
