//! Undirected weighted graph stored as adjacency lists.
//!
//! Vertices are identified by `0..vertex_count`. Every edge is stored twice,
//! once in each endpoint's list, and both copies always carry the same
//! weight. Self loops and parallel edges are rejected.

mod generator;

#[cfg(test)]
mod tests;

use crate::error::{GraphError, Result};

/// Edge weight type used throughout the crate.
pub type Weight = i64;

/// Weight assigned to edges produced by [`Graph::random`].
pub const DEFAULT_WEIGHT: Weight = 1;

/// One entry of a vertex's adjacency list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Neighbour {
    /// Adjacent vertex.
    pub vertex: usize,
    /// Weight of the connecting edge.
    pub weight: Weight,
}

/// Undirected weighted graph with a fixed vertex count.
///
/// # Examples
/// ```
/// use graphwork_core::Graph;
///
/// let mut graph = Graph::new(3).expect("three vertices");
/// graph.add_edge(0, 1, 4).expect("valid edge");
/// graph.add_edge(1, 2, 1).expect("valid edge");
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.degree(1).expect("vertex exists"), 2);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Graph {
    adjacency: Vec<Vec<Neighbour>>,
}

impl Graph {
    /// Creates a graph with `vertex_count` isolated vertices.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyGraph`] when `vertex_count` is zero.
    pub fn new(vertex_count: usize) -> Result<Self> {
        if vertex_count == 0 {
            return Err(GraphError::EmptyGraph);
        }
        Ok(Self {
            adjacency: vec![Vec::new(); vertex_count],
        })
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    fn out_of_range(&self, vertex: usize) -> GraphError {
        GraphError::VertexOutOfRange {
            vertex,
            vertex_count: self.vertex_count(),
        }
    }

    fn list(&self, vertex: usize) -> Result<&Vec<Neighbour>> {
        self.adjacency
            .get(vertex)
            .ok_or_else(|| self.out_of_range(vertex))
    }

    fn list_mut(&mut self, vertex: usize) -> Result<&mut Vec<Neighbour>> {
        let vertex_count = self.vertex_count();
        self.adjacency
            .get_mut(vertex)
            .ok_or(GraphError::VertexOutOfRange {
                vertex,
                vertex_count,
            })
    }

    /// Inserts the edge `{u, v}` or, when it already exists, overwrites its
    /// weight in both directions.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] for an unknown endpoint and
    /// [`GraphError::SelfLoop`] when `u == v`.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: Weight) -> Result<()> {
        self.list(u)?;
        self.list(v)?;
        if u == v {
            return Err(GraphError::SelfLoop { vertex: u });
        }
        Self::upsert(self.list_mut(u)?, v, weight);
        Self::upsert(self.list_mut(v)?, u, weight);
        Ok(())
    }

    fn upsert(list: &mut Vec<Neighbour>, vertex: usize, weight: Weight) {
        match list.iter_mut().find(|n| n.vertex == vertex) {
            Some(existing) => existing.weight = weight,
            None => list.push(Neighbour { vertex, weight }),
        }
    }

    /// Removes the edge `{u, v}` from both adjacency lists.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] for an unknown endpoint and
    /// [`GraphError::EdgeNotFound`] when the edge is absent.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Result<()> {
        let forward = self.list(u)?.iter().position(|n| n.vertex == v);
        let backward = self.list(v)?.iter().position(|n| n.vertex == u);
        match (forward, backward) {
            (Some(f), Some(b)) => {
                self.list_mut(u)?.remove(f);
                self.list_mut(v)?.remove(b);
                Ok(())
            }
            _ => Err(GraphError::EdgeNotFound { left: u, right: v }),
        }
    }

    /// Returns `true` when the edge `{u, v}` exists.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] for an unknown endpoint.
    pub fn has_edge(&self, u: usize, v: usize) -> Result<bool> {
        let list = self.list(u)?;
        self.list(v)?;
        Ok(list.iter().any(|n| n.vertex == v))
    }

    /// Returns the weight of the edge `{u, v}`.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] for an unknown endpoint and
    /// [`GraphError::EdgeNotFound`] when the edge is absent.
    pub fn edge_weight(&self, u: usize, v: usize) -> Result<Weight> {
        let list = self.list(u)?;
        self.list(v)?;
        list.iter()
            .find(|n| n.vertex == v)
            .map(|n| n.weight)
            .ok_or(GraphError::EdgeNotFound { left: u, right: v })
    }

    /// Returns the number of edges incident to `vertex`.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] for an unknown vertex.
    pub fn degree(&self, vertex: usize) -> Result<usize> {
        self.neighbours(vertex).map(<[Neighbour]>::len)
    }

    /// Returns the adjacency list of `vertex` in insertion order.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] for an unknown vertex.
    pub fn neighbours(&self, vertex: usize) -> Result<&[Neighbour]> {
        self.list(vertex).map(Vec::as_slice)
    }

    /// Iterates over every edge once as `(u, v, weight)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Weight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, list)| {
            list.iter()
                .filter(move |n| u < n.vertex)
                .map(move |n| (u, n.vertex, n.weight))
        })
    }

    /// Returns `true` when every vertex with at least one edge is reachable
    /// from every other such vertex. Isolated vertices are ignored and an
    /// edgeless graph counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.adjacency.iter().position(|list| !list.is_empty()) else {
            return true;
        };
        let mut visited = vec![false; self.vertex_count()];
        let mut stack = vec![start];
        while let Some(vertex) = stack.pop() {
            match visited.get_mut(vertex) {
                Some(seen) if !*seen => *seen = true,
                _ => continue,
            }
            if let Some(list) = self.adjacency.get(vertex) {
                stack.extend(list.iter().map(|n| n.vertex));
            }
        }
        self.adjacency
            .iter()
            .zip(&visited)
            .all(|(list, seen)| list.is_empty() || *seen)
    }

    /// Returns `true` when the graph is connected and every vertex has even
    /// degree.
    #[must_use]
    pub fn has_euler_circuit(&self) -> bool {
        self.is_connected() && self.adjacency.iter().all(|list| list.len().is_multiple_of(2))
    }

    /// Finds an Euler circuit starting and ending at the lowest-numbered
    /// vertex with positive degree.
    ///
    /// Returns an empty vector when no circuit exists or the graph has no
    /// edges. The graph itself is not modified.
    #[must_use]
    pub fn find_euler_circuit(&self) -> Vec<usize> {
        if !self.has_euler_circuit() {
            return Vec::new();
        }
        let Some(start) = self.adjacency.iter().position(|list| !list.is_empty()) else {
            return Vec::new();
        };
        let mut remaining = self.working_copy();
        let mut stack = vec![start];
        let mut circuit = Vec::with_capacity(self.edge_count() + 1);
        while let Some(&vertex) = stack.last() {
            let next = remaining.list_mut(vertex).ok().and_then(Vec::pop);
            match next {
                Some(next) => {
                    if let Ok(back) = remaining.list_mut(next.vertex)
                        && let Some(pos) = back.iter().position(|n| n.vertex == vertex)
                    {
                        back.swap_remove(pos);
                    }
                    stack.push(next.vertex);
                }
                None => {
                    stack.pop();
                    circuit.push(vertex);
                }
            }
        }
        circuit.reverse();
        circuit
    }

    /// Returns an independent deep copy that algorithms may consume.
    #[must_use]
    pub fn working_copy(&self) -> Self {
        self.clone()
    }
}
