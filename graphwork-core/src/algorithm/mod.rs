//! The fixed set of graph analyses offered by the server.
//!
//! Each analysis is a pure function from a read-only [`Graph`] to a typed
//! report whose `Display` output is the text sent to clients. [`Algorithm`]
//! is the closed selector over them.

mod clique;
mod components;
mod euler;
mod flow;
mod mst;


use std::{fmt, str::FromStr};

use thiserror::Error;
use tracing::instrument;

use crate::{error::Result, graph::Graph};

pub use self::{
    clique::{CLIQUE_BRANCH_BUDGET, CliqueReport, max_clique},
    components::{ComponentsReport, strongly_connected_components},
    euler::{EulerReport, NO_CIRCUIT_REASON, euler_circuit},
    flow::{FlowReport, max_flow},
    mst::{MstReport, mst_weight},
};

/// Algorithm tokens listed in protocol error messages.
pub const AVAILABLE: &str = "EULER, MST_WEIGHT, SCC, MAX_FLOW, MAX_CLIQUE";

/// Selects one of the five analyses.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Minimum spanning tree weight (Prim).
    MstWeight,
    /// Strongly connected components (Kosaraju).
    StronglyConnected,
    /// Maximum flow from the first to the last vertex (Edmonds-Karp).
    MaxFlow,
    /// Maximum clique (Bron-Kerbosch).
    MaxClique,
    /// Euler circuit detection and extraction (Hierholzer).
    #[default]
    EulerCircuit,
}

/// Returned when a token names no known algorithm.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown algorithm token `{0}`")]
pub struct UnknownAlgorithm(pub String);

impl Algorithm {
    /// Every analysis in pipeline stage order, Euler last.
    pub const ALL: [Self; 5] = [
        Self::MstWeight,
        Self::StronglyConnected,
        Self::MaxFlow,
        Self::MaxClique,
        Self::EulerCircuit,
    ];

    /// Human-readable name used in response headers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MstWeight => "MST Weight",
            Self::StronglyConnected => "Strongly Connected Components",
            Self::MaxFlow => "Max Flow",
            Self::MaxClique => "Max Clique",
            Self::EulerCircuit => "Euler Circuit",
        }
    }

    /// Canonical wire token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::MstWeight => "MST_WEIGHT",
            Self::StronglyConnected => "SCC",
            Self::MaxFlow => "MAX_FLOW",
            Self::MaxClique => "MAX_CLIQUE",
            Self::EulerCircuit => "EULER",
        }
    }

    /// Heading of this analysis' section in a pipeline report.
    #[must_use]
    pub const fn section_title(self) -> &'static str {
        match self {
            Self::MstWeight => "=== MST WEIGHT ALGORITHM ===",
            Self::StronglyConnected => "=== SCC ALGORITHM ===",
            Self::MaxFlow => "=== MAX FLOW ALGORITHM ===",
            Self::MaxClique => "=== MAX CLIQUE ALGORITHM ===",
            Self::EulerCircuit => "=== EULER CIRCUIT ===",
        }
    }

    /// Runs the analysis and renders its report.
    ///
    /// # Errors
    /// Propagates any [`crate::GraphError`] raised while walking the graph.
    #[instrument(
        name = "algorithm.execute",
        level = "debug",
        err,
        skip(graph),
        fields(algorithm = self.token(), vertices = graph.vertex_count())
    )]
    pub fn execute(self, graph: &Graph) -> Result<String> {
        Ok(match self {
            Self::MstWeight => mst_weight(graph)?.to_string(),
            Self::StronglyConnected => strongly_connected_components(graph)?.to_string(),
            Self::MaxFlow => max_flow(graph)?.to_string(),
            Self::MaxClique => max_clique(graph)?.to_string(),
            Self::EulerCircuit => euler_circuit(graph).to_string(),
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(token: &str) -> core::result::Result<Self, Self::Err> {
        match token {
            "MST_WEIGHT" => Ok(Self::MstWeight),
            "SCC" => Ok(Self::StronglyConnected),
            "MAX_FLOW" => Ok(Self::MaxFlow),
            "MAX_CLIQUE" => Ok(Self::MaxClique),
            "EULER" | "EULER_CIRCUIT" => Ok(Self::EulerCircuit),
            other => Err(UnknownAlgorithm(other.to_owned())),
        }
    }
}

fn write_vertex_set(f: &mut fmt::Formatter<'_>, vertices: &[usize]) -> fmt::Result {
    f.write_str("{")?;
    for (i, v) in vertices.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("}")
}
