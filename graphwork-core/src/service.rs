//! Single-request processing shared by the sequential and leader-follower
//! models.

use tracing::{Span, debug, field, instrument};

use crate::{
    protocol::{RequestLimits, error_response, parse_request, respond},
    summary::GraphSummary,
};

/// Parses `raw`, builds its graph, runs the selected analysis and returns
/// the response text.
///
/// Every failure is rendered as an `ERROR:` response; this function never
/// fails.
///
/// # Examples
/// ```
/// use graphwork_core::{RequestLimits, answer};
///
/// let reply = answer("-e 3 -v 3 -s 1", &RequestLimits::default());
/// assert!(reply.starts_with("SUCCESS: Graph has Euler circuit!"));
/// ```
#[instrument(
    name = "core.answer",
    skip(raw, limits),
    fields(algorithm = field::Empty, vertices = field::Empty, edges = field::Empty)
)]
pub fn answer(raw: &str, limits: &RequestLimits) -> String {
    let request = match parse_request(raw, limits) {
        Ok(request) => request,
        Err(err) => {
            debug!(code = %err.code(), "rejected request");
            return error_response(&err);
        }
    };
    let span = Span::current();
    span.record("algorithm", request.algorithm.token());
    span.record("vertices", request.vertices);
    span.record("edges", request.edges);

    let graph = match request.generate() {
        Ok(graph) => graph,
        Err(err) => return error_response(&err),
    };
    let summary = GraphSummary::of(&graph);
    debug!(
        edges = summary.edges,
        connected = summary.connected,
        odd_vertices = summary.odd_vertices(),
        euler = summary.has_euler_circuit(),
        "generated graph"
    );

    match respond(&request, &graph) {
        Ok(text) => text,
        Err(err) => {
            debug!(code = %err.code(), error = %err, "analysis failed");
            error_response(&err)
        }
    }
}
