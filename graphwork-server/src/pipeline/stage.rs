//! Stages and the units of work that flow between them.

use std::{fmt, time::Instant};

use graphwork_core::{Algorithm, AnalysisReport, Graph, Request};

use crate::session::Session;

/// Pipeline stages in flow order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    /// Parses the request, generates the graph and writes the Euler section.
    Ingest,
    /// Minimum spanning tree weight.
    Mst,
    /// Strongly connected components.
    Scc,
    /// Maximum flow from the first to the last vertex.
    MaxFlow,
    /// Largest clique.
    MaxClique,
    /// Sends the finished report.
    Respond,
}

impl Stage {
    /// Every stage, in the order a work unit visits them.
    pub const ALL: [Self; 6] = [
        Self::Ingest,
        Self::Mst,
        Self::Scc,
        Self::MaxFlow,
        Self::MaxClique,
        Self::Respond,
    ];

    /// Stage that receives a unit after this one.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Ingest => Some(Self::Mst),
            Self::Mst => Some(Self::Scc),
            Self::Scc => Some(Self::MaxFlow),
            Self::MaxFlow => Some(Self::MaxClique),
            Self::MaxClique => Some(Self::Respond),
            Self::Respond => None,
        }
    }

    /// Analysis this stage appends to the report, if any.
    #[must_use]
    pub const fn algorithm(self) -> Option<Algorithm> {
        match self {
            Self::Mst => Some(Algorithm::MstWeight),
            Self::Scc => Some(Algorithm::StronglyConnected),
            Self::MaxFlow => Some(Algorithm::MaxFlow),
            Self::MaxClique => Some(Algorithm::MaxClique),
            Self::Ingest | Self::Respond => None,
        }
    }

    /// Label used in thread names and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::Mst => "mst",
            Self::Scc => "scc",
            Self::MaxFlow => "max-flow",
            Self::MaxClique => "max-clique",
            Self::Respond => "respond",
        }
    }

    /// Position among the stages that consume [`WorkUnit`]s.
    pub(crate) const fn downstream_index(self) -> Option<usize> {
        match self {
            Self::Ingest => None,
            Self::Mst => Some(0),
            Self::Scc => Some(1),
            Self::MaxFlow => Some(2),
            Self::MaxClique => Some(3),
            Self::Respond => Some(4),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request text read from a connection, waiting for Ingest.
#[derive(Debug)]
pub(crate) struct Arrival {
    pub(crate) session: Session,
    pub(crate) raw: String,
    pub(crate) started: Instant,
}

/// A parsed request with its graph and the report built so far.
///
/// Exactly one stage owns a unit at a time; pushing it onto the next queue
/// hands it over.
#[derive(Debug)]
pub(crate) struct WorkUnit {
    pub(crate) session: Session,
    pub(crate) request: Request,
    pub(crate) graph: Graph,
    pub(crate) report: AnalysisReport,
    pub(crate) started: Instant,
}
