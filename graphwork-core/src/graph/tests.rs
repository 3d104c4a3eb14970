//! Unit tests for the adjacency-list graph and its generator.

use std::collections::HashSet;

use rstest::{fixture, rstest};

use super::{DEFAULT_WEIGHT, Graph};
use crate::error::{GraphError, GraphErrorCode};

#[fixture]
fn triangle() -> Graph {
    let mut graph = Graph::new(3).expect("three vertices");
    graph.add_edge(0, 1, 2).expect("edge 0-1");
    graph.add_edge(1, 2, 3).expect("edge 1-2");
    graph.add_edge(2, 0, 4).expect("edge 2-0");
    graph
}

fn assert_closed_walk_covers(graph: &Graph, circuit: &[usize]) {
    assert_eq!(circuit.len(), graph.edge_count() + 1);
    assert_eq!(circuit.first(), circuit.last());
    let mut used = HashSet::new();
    for pair in circuit.windows(2) {
        let key = (pair[0].min(pair[1]), pair[0].max(pair[1]));
        assert!(graph.has_edge(key.0, key.1).expect("vertices in range"));
        assert!(used.insert(key), "edge {key:?} traversed twice");
    }
    assert_eq!(used.len(), graph.edge_count());
}

#[test]
fn rejects_zero_vertices() {
    let err = Graph::new(0).expect_err("zero vertices must fail");
    assert_eq!(err, GraphError::EmptyGraph);
    assert_eq!(err.code(), GraphErrorCode::EmptyGraph);
}

#[rstest]
#[case::left_out_of_range(3, 0)]
#[case::right_out_of_range(0, 3)]
#[case::far_out_of_range(99, 1)]
fn add_edge_rejects_bad_indices(#[case] u: usize, #[case] v: usize) {
    let mut graph = Graph::new(3).expect("three vertices");
    let err = graph.add_edge(u, v, 1).expect_err("index must be rejected");
    assert!(matches!(err, GraphError::VertexOutOfRange { vertex_count: 3, .. }));
    assert_eq!(err.code().as_str(), "GRAPH_RANGE_ERROR");
}

#[rstest]
#[case::left(7, 1)]
#[case::right(1, 7)]
#[case::both(7, 9)]
fn accessors_report_first_unknown_endpoint(
    mut triangle: Graph,
    #[case] u: usize,
    #[case] v: usize,
) {
    let expected = GraphError::VertexOutOfRange {
        vertex: 7,
        vertex_count: 3,
    };
    let before = triangle.clone();
    assert_eq!(triangle.has_edge(u, v), Err(expected.clone()));
    assert_eq!(triangle.edge_weight(u, v), Err(expected.clone()));
    assert_eq!(triangle.remove_edge(u, v), Err(expected.clone()));
    assert_eq!(triangle.add_edge(u, v, 5), Err(expected));
    assert_eq!(
        triangle.degree(9).expect_err("unknown vertex").code(),
        GraphErrorCode::VertexOutOfRange
    );
    assert_eq!(triangle, before);
}

#[test]
fn add_edge_rejects_self_loop() {
    let mut graph = Graph::new(2).expect("two vertices");
    let err = graph.add_edge(1, 1, 1).expect_err("self loop must be rejected");
    assert_eq!(err, GraphError::SelfLoop { vertex: 1 });
    assert_eq!(err.code().as_str(), "GRAPH_INVALID_ARGUMENT");
}

#[rstest]
fn adding_existing_edge_updates_weight_symmetrically(mut triangle: Graph) {
    triangle.add_edge(1, 0, 9).expect("update 1-0");
    assert_eq!(triangle.edge_count(), 3);
    assert_eq!(triangle.edge_weight(0, 1).expect("edge exists"), 9);
    assert_eq!(triangle.edge_weight(1, 0).expect("edge exists"), 9);
    assert_eq!(triangle.degree(0).expect("vertex exists"), 2);
}

#[rstest]
fn remove_missing_edge_is_not_found() {
    let mut graph = Graph::new(4).expect("four vertices");
    graph.add_edge(0, 1, 1).expect("edge 0-1");
    let err = graph.remove_edge(2, 3).expect_err("edge is absent");
    assert_eq!(err, GraphError::EdgeNotFound { left: 2, right: 3 });
    assert_eq!(err.code().as_str(), "GRAPH_NOT_FOUND");
}

#[rstest]
fn add_then_remove_restores_state(mut triangle: Graph) {
    let mut graph = Graph::new(4).expect("four vertices");
    graph.add_edge(0, 1, 1).expect("edge 0-1");
    let before = graph.edge_count();
    graph.add_edge(2, 3, 5).expect("edge 2-3");
    graph.remove_edge(3, 2).expect("edge 3-2 exists");
    assert!(!graph.has_edge(2, 3).expect("vertices in range"));
    assert_eq!(graph.edge_count(), before);

    triangle.remove_edge(0, 2).expect("edge 0-2 exists");
    assert_eq!(triangle.edge_count(), 2);
    assert!(matches!(
        triangle.edge_weight(2, 0),
        Err(GraphError::EdgeNotFound { left: 2, right: 0 })
    ));
}

#[rstest]
fn edges_are_listed_once_in_canonical_order(triangle: Graph) {
    let mut edges: Vec<_> = triangle.edges().collect();
    edges.sort_unstable();
    assert_eq!(edges, vec![(0, 1, 2), (0, 2, 4), (1, 2, 3)]);
}

#[rstest]
fn neighbours_reflect_insertion_order(triangle: Graph) {
    let neighbours: Vec<_> = triangle
        .neighbours(2)
        .expect("vertex exists")
        .iter()
        .map(|n| (n.vertex, n.weight))
        .collect();
    assert_eq!(neighbours, vec![(1, 3), (0, 4)]);
    assert!(triangle.neighbours(3).is_err());
}

#[test]
fn edgeless_graph_is_connected_without_circuit() {
    let graph = Graph::new(5).expect("five vertices");
    assert!(graph.is_connected());
    assert!(graph.has_euler_circuit());
    assert!(graph.find_euler_circuit().is_empty());
}

#[test]
fn isolated_vertices_do_not_break_connectivity() {
    let mut graph = Graph::new(5).expect("five vertices");
    graph.add_edge(1, 2, 1).expect("edge 1-2");
    graph.add_edge(2, 3, 1).expect("edge 2-3");
    assert!(graph.is_connected());

    graph.add_edge(0, 4, 1).expect("edge 0-4");
    assert!(!graph.is_connected());
}

#[rstest]
fn triangle_has_circuit(triangle: Graph) {
    assert!(triangle.has_euler_circuit());
    let circuit = triangle.find_euler_circuit();
    assert_eq!(circuit[0], 0);
    assert_closed_walk_covers(&triangle, &circuit);
}

#[test]
fn circuit_starts_at_first_vertex_with_edges() {
    let mut graph = Graph::new(6).expect("six vertices");
    for (u, v) in [(2, 3), (3, 4), (4, 2), (2, 5), (5, 1), (1, 2)] {
        graph.add_edge(u, v, 1).expect("valid edge");
    }
    let circuit = graph.find_euler_circuit();
    assert_eq!(circuit[0], 1);
    assert_closed_walk_covers(&graph, &circuit);
}

#[test]
fn odd_degree_graph_has_no_circuit() {
    let mut graph = Graph::new(3).expect("three vertices");
    graph.add_edge(0, 1, 1).expect("edge 0-1");
    graph.add_edge(1, 2, 1).expect("edge 1-2");
    assert!(graph.is_connected());
    assert!(!graph.has_euler_circuit());
    assert!(graph.find_euler_circuit().is_empty());
}

#[rstest]
fn working_copy_is_independent(triangle: Graph) {
    let mut copy = triangle.working_copy();
    assert_eq!(copy, triangle);
    copy.remove_edge(0, 1).expect("edge exists in copy");
    copy.add_edge(0, 1, 7).expect("edge re-added in copy");
    copy.remove_edge(1, 2).expect("edge exists in copy");
    assert_eq!(triangle.edge_count(), 3);
    assert_eq!(triangle.edge_weight(0, 1).expect("original untouched"), 2);
    assert!(triangle.has_edge(1, 2).expect("vertices in range"));
}

#[rstest]
fn circuit_extraction_leaves_graph_intact(triangle: Graph) {
    let before = triangle.clone();
    let _ = triangle.find_euler_circuit();
    assert_eq!(triangle, before);
}

#[rstest]
#[case::single_vertex(1, 5, 0)]
#[case::pair(2, 5, 1)]
#[case::five(5, 100, 10)]
#[case::six(6, 15, 15)]
fn max_edges_clamps_requests(#[case] vertices: usize, #[case] requested: usize, #[case] expected: usize) {
    let graph = Graph::random(vertices, requested, 3).expect("positive vertex count");
    assert_eq!(graph.edge_count(), expected);
}

#[test]
fn random_graph_is_reproducible() {
    let left = Graph::random(20, 40, 1234).expect("valid parameters");
    let right = Graph::random(20, 40, 1234).expect("valid parameters");
    assert_eq!(left, right);
    assert!(left.edges().all(|(_, _, w)| w == DEFAULT_WEIGHT));
}

#[test]
fn random_graph_rejects_zero_vertices() {
    assert_eq!(Graph::random(0, 3, 1), Err(GraphError::EmptyGraph));
}
