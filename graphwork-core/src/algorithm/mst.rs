//! Minimum spanning tree weight via Prim's algorithm.

use std::{cmp::Reverse, collections::BinaryHeap, fmt};

use crate::{
    error::Result,
    graph::{Graph, Weight},
};

/// Total weight of the spanning tree grown from vertex 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MstReport {
    /// Sum of the selected edge weights.
    pub weight: Weight,
    /// `false` when some vertex with edges was not reached from vertex 0.
    pub connected: bool,
}

impl fmt::Display for MstReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.connected {
            write!(f, "MST Weight: {}", self.weight)
        } else {
            write!(f, "Graph is not connected - MST weight: {}", self.weight)
        }
    }
}

/// Grows a minimum spanning tree from vertex 0.
///
/// When the graph is disconnected the weight covers only the component of
/// vertex 0 and the report is flagged accordingly.
///
/// # Errors
/// Propagates [`crate::GraphError`] from adjacency lookups.
pub fn mst_weight(graph: &Graph) -> Result<MstReport> {
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut best = vec![Weight::MAX; n];
    let mut heap = BinaryHeap::new();
    let mut weight: Weight = 0;

    best[0] = 0;
    heap.push(Reverse((0, 0_usize)));
    while let Some(Reverse((cost, u))) = heap.pop() {
        if visited[u] {
            continue;
        }
        visited[u] = true;
        weight = weight.saturating_add(cost);
        for nb in graph.neighbours(u)? {
            if !visited[nb.vertex] && nb.weight < best[nb.vertex] {
                best[nb.vertex] = nb.weight;
                heap.push(Reverse((nb.weight, nb.vertex)));
            }
        }
    }

    let mut connected = true;
    for (vertex, seen) in visited.iter().enumerate() {
        if !seen && graph.degree(vertex)? > 0 {
            connected = false;
            break;
        }
    }
    Ok(MstReport { weight, connected })
}
