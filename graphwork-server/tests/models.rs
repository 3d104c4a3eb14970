//! End-to-end behaviour of the three concurrency models over loopback TCP.

mod common;

use std::{sync::Arc, thread, time::Duration};

use common::{line_value, request, start_model, test_config};
use graphwork_core::{Algorithm, AnalysisReport, RequestLimits, answer, parse_request};
use graphwork_server::{ConcurrencyModel, Dispatcher, Pipeline, Server};
use graphwork_test_support::wait::wait_until;
use rstest::rstest;

const INVALID: &str = "ERROR: Invalid parameters. Use format: -e <edges> -v <vertices> -s <seed> [-a <algorithm>]\nAvailable algorithms: EULER, MST_WEIGHT, SCC, MAX_FLOW, MAX_CLIQUE";

fn expected_pipeline_prefix(payload: &str) -> String {
    let request = parse_request(payload, &RequestLimits::default()).expect("valid payload");
    let graph = request.generate().expect("graph");
    let mut report = AnalysisReport::begin(&request, &graph);
    for algorithm in [
        Algorithm::MstWeight,
        Algorithm::StronglyConnected,
        Algorithm::MaxFlow,
        Algorithm::MaxClique,
    ] {
        report.append_section(algorithm, &graph);
    }
    report.as_str().to_owned()
}

#[rstest]
#[case::euler("-e 6 -v 4 -s 3")]
#[case::euler_alias("-e 10 -v 5 -s 9 -a EULER_CIRCUIT")]
#[case::mst("-e 12 -v 8 -s 5 -a MST_WEIGHT")]
#[case::scc("-e 7 -v 6 -s 1 -a SCC")]
#[case::flow("-e 9 -v 6 -s 2 -a MAX_FLOW")]
#[case::clique("-e 14 -v 7 -s 4 -a MAX_CLIQUE")]
#[case::dense_clique("-e 4095 -v 91 -a MAX_CLIQUE")]
#[case::unknown("-e 4 -v 4 -a DIJKSTRA")]
#[case::limit("-e 4 -v 100000")]
fn single_algorithm_models_match_local_answer(
    #[values(ConcurrencyModel::Sequential, ConcurrencyModel::LeaderFollower)]
    model: ConcurrencyModel,
    #[case] payload: &str,
) {
    let server = start_model(model);
    let reply = request(server.local_addr(), payload);
    assert_eq!(reply, answer(payload, &RequestLimits::default()));
}

#[rstest]
#[case::sequential(ConcurrencyModel::Sequential)]
#[case::leader_follower(ConcurrencyModel::LeaderFollower)]
#[case::pipeline(ConcurrencyModel::Pipeline)]
fn missing_vertex_count_is_rejected(#[case] model: ConcurrencyModel) {
    let server = start_model(model);
    assert_eq!(request(server.local_addr(), "-e -v"), INVALID);
}

#[rstest]
#[case::euler("-e 6 -v 4 -s 3")]
#[case::mst_requested("-e 12 -v 8 -s 5 -a MST_WEIGHT")]
#[case::edgeless("-e 0 -v 3 -s 8 -a SCC")]
fn pipeline_reports_every_analysis(#[case] payload: &str) {
    let server = start_model(ConcurrencyModel::Pipeline);
    let reply = request(server.local_addr(), payload);

    let expected = expected_pipeline_prefix(payload);
    assert!(
        reply.starts_with(&expected),
        "unexpected pipeline report:\n{reply}"
    );
    let trailer = reply
        .strip_prefix(&expected)
        .expect("prefix checked above");
    let micros = trailer
        .trim()
        .strip_prefix("Pipeline processing time: ")
        .and_then(|rest| rest.strip_suffix(" microseconds"))
        .expect("processing time trailer");
    assert!(micros.parse::<u128>().is_ok(), "non-numeric time {micros:?}");
}

#[test]
fn pipeline_rejects_unknown_algorithm_at_ingest() {
    let server = start_model(ConcurrencyModel::Pipeline);
    let reply = request(server.local_addr(), "-e 3 -v 3 -a BFS");
    assert!(reply.starts_with("ERROR: Unknown algorithm 'BFS'"), "{reply}");
}

#[test]
fn dense_request_does_not_stall_the_pipeline() {
    let server = start_model(ConcurrencyModel::Pipeline);
    let addr = server.local_addr();
    let dense = thread::spawn(move || request(addr, "-e 4095 -v 91 -a EULER"));

    let small = request(addr, "-e 3 -v 3 -s 2");
    assert!(
        small.starts_with(&expected_pipeline_prefix("-e 3 -v 3 -s 2")),
        "{small}"
    );
    let dense = dense.join().expect("dense client");
    assert_eq!(line_value(&dense, "Max Clique Size"), Some("91"));
    assert_eq!(server.shutdown().remaining, 0);
}

#[rstest]
#[case::sequential(ConcurrencyModel::Sequential)]
#[case::leader_follower(ConcurrencyModel::LeaderFollower)]
#[case::pipeline(ConcurrencyModel::Pipeline)]
fn concurrent_requests_are_not_mixed(#[case] model: ConcurrencyModel) {
    let server = start_model(model);
    let addr = server.local_addr();
    let clients: Vec<_> = (0_i64..16)
        .map(|seed| {
            thread::spawn(move || {
                let vertices = 4 + seed;
                let edges = 2 * seed;
                let payload = format!("-e {edges} -v {vertices} -s {seed} -a MST_WEIGHT");
                (vertices, edges, seed, request(addr, &payload))
            })
        })
        .collect();

    for client in clients {
        let (vertices, edges, seed, reply) = client.join().expect("client thread");
        assert_eq!(line_value(&reply, "Vertices"), Some(vertices.to_string().as_str()));
        assert_eq!(line_value(&reply, "Edges"), Some(edges.to_string().as_str()));
        assert_eq!(line_value(&reply, "Seed"), Some(seed.to_string().as_str()));
    }
}

#[test]
fn pipeline_counts_submissions_and_completions() {
    let config = test_config(ConcurrencyModel::Pipeline)
        .build()
        .expect("config");
    let server = Server::bind("127.0.0.1:0", config).expect("bind");
    let pipeline = Arc::new(Pipeline::start(Arc::clone(server.context())).expect("pipeline"));
    let dispatcher: Arc<dyn Dispatcher> = Arc::<Pipeline>::clone(&pipeline);
    let handle = server.spawn_with(dispatcher).expect("spawn");

    for seed in 0..3 {
        let reply = request(handle.local_addr(), &format!("-e 3 -v 4 -s {seed}"));
        assert!(reply.starts_with("GRAPH ANALYSIS RESULTS:"));
    }
    assert_eq!(request(handle.local_addr(), "-v 0 -e 1"), INVALID);

    assert!(wait_until(Duration::from_secs(5), || pipeline.completed() == 4));
    assert_eq!(pipeline.submitted(), 4);
    handle.shutdown();
}
