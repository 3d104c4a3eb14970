//! Response rendering for single-algorithm and full-analysis replies.

use std::{fmt, time::Duration};

use super::Request;
use crate::{
    algorithm::{Algorithm, NO_CIRCUIT_REASON, euler_circuit},
    error::Result,
    graph::Graph,
};

/// Renders an error as a wire response line.
#[must_use]
pub fn error_response(err: &dyn fmt::Display) -> String {
    format!("ERROR: {err}")
}

/// Renders the reply for the single analysis selected by `request`.
///
/// Counts and seed are echoed exactly as the client sent them.
///
/// # Errors
/// Propagates [`crate::GraphError`] raised by the analysis.
pub fn respond(request: &Request, graph: &Graph) -> Result<String> {
    let mut out = String::new();
    if request.algorithm == Algorithm::EulerCircuit {
        let report = euler_circuit(graph);
        if report.exists {
            out.push_str("SUCCESS: Graph has Euler circuit!\n");
            push_counts(&mut out, request);
            if !report.circuit.is_empty() {
                out.push_str(&format!("\nCircuit: {}", report.path()));
            }
        } else {
            out.push_str("RESULT: Graph does NOT have Euler circuit\n");
            push_counts(&mut out, request);
            out.push_str(&format!("\nReason: {NO_CIRCUIT_REASON}"));
        }
        return Ok(out);
    }

    let body = request.algorithm.execute(graph)?;
    out.push_str(&format!("ALGORITHM: {}\n", request.algorithm.name()));
    push_counts(&mut out, request);
    out.push_str(&format!("\nSeed: {}\nResult:\n{body}", request.seed));
    Ok(out)
}

fn push_counts(out: &mut String, request: &Request) {
    out.push_str(&format!(
        "Vertices: {}\nEdges: {}",
        request.vertices, request.edges
    ));
}

/// Report accumulated by the staged pipeline.
///
/// Begins with the parameter header and the Euler section, gains one section
/// per analysis stage and is closed with the processing time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnalysisReport {
    text: String,
}

impl AnalysisReport {
    /// Starts a report with the request header and the Euler section.
    #[must_use]
    pub fn begin(request: &Request, graph: &Graph) -> Self {
        let text = format!(
            "GRAPH ANALYSIS RESULTS:\nVertices: {}\nEdges: {}\nSeed: {}\nRequested algorithm: {}\n\n{}\n\n",
            request.vertices,
            request.edges,
            request.seed,
            request.algorithm,
            euler_circuit(graph),
        );
        Self { text }
    }

    /// Runs `algorithm` and appends its section, or an error line when the
    /// analysis fails.
    pub fn append_section(&mut self, algorithm: Algorithm, graph: &Graph) {
        match algorithm.execute(graph) {
            Ok(body) => {
                self.text.push_str(&format!(
                    "{}\n{}\nResult: {body}\n\n",
                    algorithm.section_title(),
                    algorithm.name(),
                ));
            }
            Err(err) => self.append_error(&err),
        }
    }

    /// Appends an `ERROR:` line.
    pub fn append_error(&mut self, err: &dyn fmt::Display) {
        self.text.push_str(&format!("{}\n\n", error_response(err)));
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Closes the report with the total processing time.
    #[must_use]
    pub fn finish(mut self, elapsed: Duration) -> String {
        self.text.push_str(&format!(
            "\n\nPipeline processing time: {} microseconds\n",
            elapsed.as_micros()
        ));
        self.text
    }
}
