//! Deterministic random graph generation.

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::instrument;

use super::{DEFAULT_WEIGHT, Graph};
use crate::error::Result;

impl Graph {
    /// Returns the largest edge count a simple graph on `vertices` vertices
    /// can hold.
    #[must_use]
    pub fn max_edges(vertices: usize) -> usize {
        vertices.saturating_mul(vertices.saturating_sub(1)) / 2
    }

    /// Builds a random simple graph with unit edge weights.
    ///
    /// `edges` is clamped to [`Graph::max_edges`]. Unordered vertex pairs are
    /// sampled uniformly until that many distinct pairs have been inserted.
    /// The same `(vertices, edges, seed)` always yields the same graph.
    ///
    /// # Errors
    /// Returns [`crate::GraphError::EmptyGraph`] when `vertices` is zero.
    ///
    /// # Examples
    /// ```
    /// use graphwork_core::Graph;
    ///
    /// let graph = Graph::random(5, 20, 7).expect("positive vertex count");
    /// assert_eq!(graph.edge_count(), 10);
    /// ```
    #[instrument(name = "graph.random", level = "trace", err)]
    pub fn random(vertices: usize, edges: usize, seed: u64) -> Result<Self> {
        let mut graph = Self::new(vertices)?;
        let target = edges.min(Self::max_edges(vertices));
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(target);
        while seen.len() < target {
            let u = rng.gen_range(0..vertices);
            let v = rng.gen_range(0..vertices);
            if u == v {
                continue;
            }
            let pair = (u.min(v), u.max(v));
            if seen.insert(pair) {
                graph.add_edge(pair.0, pair.1, DEFAULT_WEIGHT)?;
            }
        }
        Ok(graph)
    }
}
