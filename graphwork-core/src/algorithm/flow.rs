//! Maximum flow via Edmonds-Karp over a dense residual matrix.

use std::{collections::VecDeque, fmt};

use crate::{
    error::Result,
    graph::{Graph, Weight},
};

/// Maximum flow between the first and last vertex.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlowReport {
    /// The graph has fewer than two vertices.
    TooSmall,
    /// The computed flow value.
    Flow {
        /// Sink vertex, always the last vertex.
        sink: usize,
        /// Total flow pushed from vertex 0 to `sink`.
        value: Weight,
    },
}

impl fmt::Display for FlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall => f.write_str("Graph needs at least 2 vertices for max flow"),
            Self::Flow { sink, value } => {
                write!(f, "Max Flow from node 0 to node {sink}: {value}")
            }
        }
    }
}

fn augmenting_path(residual: &[Vec<Weight>], source: usize, sink: usize) -> Option<Vec<usize>> {
    let n = residual.len();
    let mut parent = vec![usize::MAX; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::from([source]);
    visited[source] = true;
    while let Some(u) = queue.pop_front() {
        for (v, &capacity) in residual[u].iter().enumerate() {
            if !visited[v] && capacity > 0 {
                visited[v] = true;
                parent[v] = u;
                queue.push_back(v);
            }
        }
    }
    visited[sink].then_some(parent)
}

/// Treats every stored adjacency entry as a directed arc whose capacity is
/// the edge weight and pushes flow from vertex 0 to the last vertex.
///
/// # Errors
/// Propagates [`crate::GraphError`] from adjacency lookups.
pub fn max_flow(graph: &Graph) -> Result<FlowReport> {
    let n = graph.vertex_count();
    if n < 2 {
        return Ok(FlowReport::TooSmall);
    }
    let (source, sink) = (0, n - 1);

    let mut residual = vec![vec![0; n]; n];
    for (u, row) in residual.iter_mut().enumerate() {
        for nb in graph.neighbours(u)? {
            row[nb.vertex] = nb.weight;
        }
    }

    let mut value: Weight = 0;
    while let Some(parent) = augmenting_path(&residual, source, sink) {
        let mut bottleneck = Weight::MAX;
        let mut v = sink;
        while v != source {
            let u = parent[v];
            bottleneck = bottleneck.min(residual[u][v]);
            v = u;
        }
        let mut v = sink;
        while v != source {
            let u = parent[v];
            residual[u][v] -= bottleneck;
            residual[v][u] += bottleneck;
            v = u;
        }
        value = value.saturating_add(bottleneck);
    }
    Ok(FlowReport::Flow { sink, value })
}
