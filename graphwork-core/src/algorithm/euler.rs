//! Euler circuit section of a pipeline report.

use std::fmt;

use crate::graph::Graph;

/// Reason reported when a graph has no Euler circuit.
pub const NO_CIRCUIT_REASON: &str = "Graph is not connected or has odd-degree vertices";

/// Outcome of Euler circuit extraction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EulerReport {
    /// Whether the graph admits a circuit.
    pub exists: bool,
    /// The closed walk, empty when the graph has no edges or no circuit.
    pub circuit: Vec<usize>,
}

impl EulerReport {
    /// Renders the circuit as `v0 -> v1 -> ... -> v0`.
    #[must_use]
    pub fn path(&self) -> String {
        self.circuit
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for EulerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists {
            writeln!(f, "EULER CIRCUIT: SUCCESS!")?;
            write!(f, "Circuit: {}", self.path())
        } else {
            writeln!(f, "EULER CIRCUIT: NOT POSSIBLE")?;
            write!(f, "Reason: {NO_CIRCUIT_REASON}")
        }
    }
}

/// Checks for and extracts an Euler circuit.
#[must_use]
pub fn euler_circuit(graph: &Graph) -> EulerReport {
    let exists = graph.has_euler_circuit();
    let circuit = if exists {
        graph.find_euler_circuit()
    } else {
        Vec::new()
    };
    EulerReport { exists, circuit }
}
