//! Structural summary of a generated graph.

use std::fmt;

use crate::graph::Graph;

/// Degree of one vertex.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DegreeSummary {
    /// Vertex identifier.
    pub vertex: usize,
    /// Number of incident edges.
    pub degree: usize,
}

impl DegreeSummary {
    /// Returns `true` when the degree is even.
    #[must_use]
    pub const fn is_even(&self) -> bool {
        self.degree % 2 == 0
    }
}

/// Degrees, connectivity and the Euler verdict of a graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphSummary {
    /// Vertex count.
    pub vertices: usize,
    /// Undirected edge count.
    pub edges: usize,
    /// Per-vertex degrees in vertex order.
    pub degrees: Vec<DegreeSummary>,
    /// Result of [`Graph::is_connected`].
    pub connected: bool,
}

impl GraphSummary {
    /// Summarises `graph`.
    #[must_use]
    pub fn of(graph: &Graph) -> Self {
        let degrees = (0..graph.vertex_count())
            .map(|vertex| DegreeSummary {
                vertex,
                degree: graph.neighbours(vertex).map_or(0, <[_]>::len),
            })
            .collect();
        Self {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            degrees,
            connected: graph.is_connected(),
        }
    }

    /// Returns `true` when every vertex has even degree.
    #[must_use]
    pub fn all_even(&self) -> bool {
        self.degrees.iter().all(DegreeSummary::is_even)
    }

    /// Number of vertices with odd degree.
    #[must_use]
    pub fn odd_vertices(&self) -> usize {
        self.degrees.iter().filter(|d| !d.is_even()).count()
    }

    /// Returns `true` when the graph admits an Euler circuit.
    #[must_use]
    pub fn has_euler_circuit(&self) -> bool {
        self.connected && self.all_even()
    }

    /// Why no Euler circuit exists, or `None` when one does.
    ///
    /// Disconnection takes precedence over odd degrees.
    #[must_use]
    pub fn reason(&self) -> Option<&'static str> {
        if !self.connected {
            Some("Graph is not connected")
        } else if !self.all_even() {
            Some("Not all vertices have even degree")
        } else {
            None
        }
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph with {} vertices and {} edges", self.vertices, self.edges)?;
        writeln!(f, "Vertex degrees:")?;
        for d in &self.degrees {
            let parity = if d.is_even() { "even" } else { "odd" };
            writeln!(f, "  Vertex {}: degree {} ({parity})", d.vertex, d.degree)?;
        }
        writeln!(
            f,
            "Connectivity: {}",
            if self.connected { "Connected" } else { "Disconnected" }
        )?;
        writeln!(
            f,
            "All degrees even: {}",
            if self.all_even() { "Yes" } else { "No" }
        )?;
        match self.reason() {
            None => write!(f, "Euler circuit: exists"),
            Some(reason) => write!(f, "Euler circuit: none ({reason})"),
        }
    }
}
