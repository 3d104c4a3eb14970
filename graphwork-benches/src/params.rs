//! Benchmark parameter types.

use std::fmt;

/// Size of a generated benchmark graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GraphBenchParams {
    /// Vertex count.
    pub vertices: usize,
    /// Requested edge count.
    pub edges: usize,
}

impl GraphBenchParams {
    /// Graph with `vertices` vertices and `density_per_vertex` edges per
    /// vertex.
    #[must_use]
    pub const fn sparse(vertices: usize, density_per_vertex: usize) -> Self {
        Self {
            vertices,
            edges: vertices.saturating_mul(density_per_vertex),
        }
    }

    /// Request text asking for this graph with `algorithm`.
    #[must_use]
    pub fn payload(&self, seed: u64, algorithm: &str) -> String {
        format!(
            "-e {} -v {} -s {seed} -a {algorithm}",
            self.edges, self.vertices
        )
    }
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},m={}", self.vertices, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::GraphBenchParams;

    #[rstest]
    #[case(GraphBenchParams::sparse(10, 3), "n=10,m=30")]
    #[case(GraphBenchParams { vertices: 4, edges: 0 }, "n=4,m=0")]
    fn renders_compact_identifier(#[case] params: GraphBenchParams, #[case] expected: &str) {
        assert_eq!(params.to_string(), expected);
    }

    #[test]
    fn payload_names_every_parameter() {
        let params = GraphBenchParams::sparse(8, 2);
        assert_eq!(params.payload(3, "SCC"), "-e 16 -v 8 -s 3 -a SCC");
    }
}
