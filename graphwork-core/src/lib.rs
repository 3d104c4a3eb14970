//! Graphwork core library.
//!
//! Provides the undirected weighted [`Graph`], a seeded random generator,
//! the five analysis algorithms and the text request/response protocol
//! shared by every server concurrency model.

mod algorithm;
mod error;
mod graph;
mod protocol;
mod service;
mod summary;

pub use crate::{
    algorithm::{
        AVAILABLE, Algorithm, CLIQUE_BRANCH_BUDGET, CliqueReport, ComponentsReport, EulerReport,
        FlowReport, MstReport, NO_CIRCUIT_REASON, UnknownAlgorithm, euler_circuit, max_clique,
        max_flow, mst_weight, strongly_connected_components,
    },
    error::{GraphError, GraphErrorCode, ParseError, ParseErrorCode, Result},
    graph::{DEFAULT_WEIGHT, Graph, Neighbour, Weight},
    protocol::{
        AnalysisReport, DEFAULT_SEED, Parameter, Request, RequestLimits, error_response,
        parse_request, respond,
    },
    service::answer,
    summary::{DegreeSummary, GraphSummary},
};
