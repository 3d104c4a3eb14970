//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use graphwork_core::GraphError;
use graphwork_server::{ClientError, ServerError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Graph generation or analysis failed.
    #[error("graph operation failed: {0}")]
    Graph(#[from] GraphError),
    /// The benchmark server could not be configured or started.
    #[error("server setup failed: {0}")]
    Server(#[from] ServerError),
    /// A warm-up request failed.
    #[error("warm-up request failed: {0}")]
    Client(#[from] ClientError),
    /// A reply did not look like an analysis report.
    #[error("unexpected reply from the {model} model: {reply}")]
    UnexpectedReply {
        /// Model that produced the reply.
        model: &'static str,
        /// First line of the reply.
        reply: String,
    },
}
