//! Unit tests for request parsing and response rendering.

use std::time::Duration;

use rstest::rstest;

use super::{
    AnalysisReport, DEFAULT_SEED, Parameter, Request, RequestLimits, error_response,
    parse_request, respond,
};
use crate::{
    algorithm::Algorithm,
    error::{ParseError, ParseErrorCode},
    graph::Graph,
};

const INVALID: &str = "ERROR: Invalid parameters. Use format: -e <edges> -v <vertices> -s <seed> [-a <algorithm>]\nAvailable algorithms: EULER, MST_WEIGHT, SCC, MAX_FLOW, MAX_CLIQUE";

fn parse(raw: &str) -> Result<Request, ParseError> {
    parse_request(raw, &RequestLimits::default())
}

#[test]
fn parses_full_request() {
    let request = parse("-e 5 -v 4 -s 43 -a MST_WEIGHT").expect("well-formed");
    assert_eq!(
        request,
        Request {
            edges: 5,
            vertices: 4,
            seed: 43,
            algorithm: Algorithm::MstWeight,
        }
    );
}

#[test]
fn defaults_seed_and_algorithm() {
    let request = parse("-v 4 -e 2\r\n").expect("well-formed");
    assert_eq!(request.seed, DEFAULT_SEED);
    assert_eq!(request.algorithm, Algorithm::EulerCircuit);
}

#[rstest]
#[case::missing_vertex_count("-e -v")]
#[case::missing_everything("")]
#[case::zero_vertices("-e 3 -v 0")]
#[case::negative_vertices("-e 3 -v -2")]
#[case::negative_edges("-e -1 -v 4")]
#[case::missing_edges("-v 4 -s 1")]
#[case::non_numeric("-e three -v 4")]
#[case::overflowing("-e 1 -v 99999999999999999999999")]
fn rejects_invalid_parameters(#[case] raw: &str) {
    let err = parse(raw).expect_err("request must be rejected");
    assert_eq!(err, ParseError::InvalidParameters);
    assert_eq!(err.code(), ParseErrorCode::InvalidParameters);
    assert_eq!(error_response(&err), INVALID);
}

#[test]
fn rejects_unknown_algorithm() {
    let err = parse("-e 3 -v 3 -a DIJKSTRA").expect_err("unknown algorithm");
    assert_eq!(
        error_response(&err),
        "ERROR: Unknown algorithm 'DIJKSTRA'. Available: EULER, MST_WEIGHT, SCC, MAX_FLOW, MAX_CLIQUE"
    );
}

#[test]
fn invalid_parameters_take_precedence_over_algorithm() {
    assert_eq!(parse("-v 0 -e 1 -a NOPE"), Err(ParseError::InvalidParameters));
}

#[rstest]
#[case::vertices("-e 1 -v 513", Parameter::Vertices, 513, 512)]
#[case::edges("-e 4097 -v 10", Parameter::Edges, 4097, 4096)]
fn enforces_limits(
    #[case] raw: &str,
    #[case] parameter: Parameter,
    #[case] requested: usize,
    #[case] limit: usize,
) {
    let err = parse(raw).expect_err("limit must apply");
    assert_eq!(
        err,
        ParseError::LimitExceeded {
            parameter,
            requested,
            limit
        }
    );
    assert_eq!(err.code().as_str(), "PARSE_LIMIT_EXCEEDED");
}

#[test]
fn accepts_values_at_the_limit() {
    let limits = RequestLimits {
        max_vertices: 8,
        max_edges: 28,
    };
    assert!(parse_request("-e 28 -v 8", &limits).is_ok());
}

#[test]
fn euler_reply_lists_circuit() {
    let request = parse("-e 3 -v 3 -s 9").expect("well-formed");
    let graph = request.generate().expect("valid graph");
    let reply = respond(&request, &graph).expect("analysis succeeds");
    assert!(reply.starts_with("SUCCESS: Graph has Euler circuit!\nVertices: 3\nEdges: 3\nCircuit: 0 -> "));
    assert!(reply.ends_with("-> 0"));
}

#[test]
fn euler_reply_omits_circuit_for_edgeless_graph() {
    let request = parse("-e 0 -v 4").expect("well-formed");
    let graph = request.generate().expect("valid graph");
    assert_eq!(
        respond(&request, &graph).expect("analysis succeeds"),
        "SUCCESS: Graph has Euler circuit!\nVertices: 4\nEdges: 0"
    );
}

#[test]
fn euler_reply_explains_absence() {
    let request = parse("-e 1 -v 2").expect("well-formed");
    let graph = request.generate().expect("valid graph");
    assert_eq!(
        respond(&request, &graph).expect("analysis succeeds"),
        "RESULT: Graph does NOT have Euler circuit\nVertices: 2\nEdges: 1\nReason: Graph is not connected or has odd-degree vertices"
    );
}

#[test]
fn algorithm_reply_echoes_requested_counts() {
    let request = parse("-e 50 -v 2 -s 7 -a MAX_FLOW").expect("well-formed");
    let graph = request.generate().expect("valid graph");
    assert_eq!(
        respond(&request, &graph).expect("analysis succeeds"),
        "ALGORITHM: Max Flow\nVertices: 2\nEdges: 50\nSeed: 7\nResult:\nMax Flow from node 0 to node 1: 1"
    );
}

#[test]
fn analysis_report_accumulates_sections() {
    let request = parse("-e 3 -v 3 -s 5 -a SCC").expect("well-formed");
    let graph = request.generate().expect("valid graph");
    let mut report = AnalysisReport::begin(&request, &graph);
    assert!(report.as_str().starts_with(
        "GRAPH ANALYSIS RESULTS:\nVertices: 3\nEdges: 3\nSeed: 5\nRequested algorithm: SCC\n\nEULER CIRCUIT: SUCCESS!\n"
    ));
    for algorithm in &Algorithm::ALL[..4] {
        report.append_section(*algorithm, &graph);
    }
    report.append_error(&"stage failed");
    let text = report.finish(Duration::from_micros(1500));

    let titles = [
        "=== MST WEIGHT ALGORITHM ===\nMST Weight\nResult: MST Weight: 2\n\n",
        "=== SCC ALGORITHM ===\nStrongly Connected Components\nResult: Found 1",
        "=== MAX FLOW ALGORITHM ===\nMax Flow\nResult: Max Flow from node 0 to node 2: 2\n\n",
        "=== MAX CLIQUE ALGORITHM ===\nMax Clique\nResult: Max Clique Size: 3\n",
    ];
    let mut last = 0;
    for title in titles {
        let at = text.find(title).unwrap_or_else(|| panic!("missing section {title:?}"));
        assert!(at > last, "sections out of order");
        last = at;
    }
    assert!(text.contains("ERROR: stage failed\n\n"));
    assert!(text.ends_with("\n\nPipeline processing time: 1500 microseconds\n"));
}

#[test]
fn generate_uses_seed_bits() {
    let request = Request {
        edges: 10,
        vertices: 8,
        seed: -1,
        algorithm: Algorithm::EulerCircuit,
    };
    let graph = request.generate().expect("valid graph");
    assert_eq!(graph, Graph::random(8, 10, u64::MAX).expect("valid graph"));
}
