//! Graph workloads shared by the benchmarks.

use std::time::Duration;

use graphwork_core::Graph;
use graphwork_server::{ConcurrencyModel, Server, ServerConfig, ServerHandle, send_request};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// Seed used for every generated graph.
pub const SEED: u64 = 42;

/// Graph sizes exercised by the analysis benchmarks.
pub const SIZES: [GraphBenchParams; 3] = [
    GraphBenchParams::sparse(32, 2),
    GraphBenchParams::sparse(128, 4),
    GraphBenchParams::sparse(256, 8),
];

/// Generates the graph described by `params` with [`SEED`].
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] when `params` has no vertices.
pub fn graph(params: GraphBenchParams) -> Result<Graph, BenchSetupError> {
    Ok(Graph::random(params.vertices, params.edges, SEED)?)
}

/// Timeout for benchmark requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Starts a loopback server for `model`, checking it answers `payload`.
///
/// # Errors
/// Returns [`BenchSetupError`] when the server cannot start or its first
/// reply is not a report.
pub fn loopback_server(
    model: ConcurrencyModel,
    payload: &str,
) -> Result<ServerHandle, BenchSetupError> {
    let config = ServerConfig::builder()
        .with_model(model)
        .with_accept_poll_interval(Duration::from_millis(1))
        .build()?;
    let handle = Server::bind("127.0.0.1:0", config)?.spawn()?;
    let reply = send_request(&handle.local_addr().to_string(), payload, REQUEST_TIMEOUT)?;
    if reply.starts_with("ERROR") {
        return Err(BenchSetupError::UnexpectedReply {
            model: model.as_str(),
            reply: reply.lines().next().unwrap_or_default().to_owned(),
        });
    }
    Ok(handle)
}
