//! Strategies and helpers shared by graphwork-core integration tests.

use std::collections::HashSet;

use graphwork_core::Graph;
use graphwork_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::{
    collection::vec,
    prelude::{TestCaseError, prop_assert, prop_assert_eq},
    test_runner::{Config as ProptestConfig, TestCaseResult},
};
use test_strategy::Arbitrary;

/// Builds a proptest configuration from the shared CI profile.
#[must_use]
pub fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Parameters for [`Graph::random`].
#[derive(Clone, Debug, Arbitrary)]
pub struct RandomSpec {
    #[strategy(1usize..24)]
    pub vertices: usize,
    #[strategy(0usize..120)]
    pub edges: usize,
    pub seed: u64,
}

/// Shape of a generated test graph.
#[derive(Clone, Debug, Arbitrary)]
pub enum GraphShape {
    /// Output of the seeded generator.
    #[weight(3)]
    Random(RandomSpec),
    /// Cycles that share vertex 0; always Eulerian.
    #[weight(1)]
    Flower {
        #[strategy(vec(2usize..6, 1..5))]
        petals: Vec<usize>,
        #[strategy(0usize..4)]
        isolated: usize,
    },
}

impl GraphShape {
    /// Materialises the graph.
    pub fn build(&self) -> Graph {
        match self {
            Self::Random(shape) => {
                Graph::random(shape.vertices, shape.edges, shape.seed).expect("positive vertex count")
            }
            Self::Flower { petals, isolated } => {
                let vertices = 1 + petals.iter().sum::<usize>() + isolated;
                let mut graph = Graph::new(vertices).expect("positive vertex count");
                let mut next = 1;
                for &petal in petals {
                    let mut previous = 0;
                    for vertex in next..next + petal {
                        graph.add_edge(previous, vertex, 1).expect("valid edge");
                        previous = vertex;
                    }
                    graph.add_edge(previous, 0, 1).expect("valid edge");
                    next += petal;
                }
                graph
            }
        }
    }
}

/// Checks that `circuit` is a closed walk using every edge of `graph` once.
pub fn check_circuit(graph: &Graph, circuit: &[usize]) -> TestCaseResult {
    prop_assert_eq!(circuit.len(), graph.edge_count() + 1);
    prop_assert_eq!(circuit.first(), circuit.last());
    let mut used = HashSet::new();
    for step in circuit.windows(2) {
        let key = (step[0].min(step[1]), step[0].max(step[1]));
        let exists = graph
            .has_edge(key.0, key.1)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(exists, "walk uses missing edge {:?}", key);
        prop_assert!(used.insert(key), "edge {:?} used twice", key);
    }
    prop_assert_eq!(used.len(), graph.edge_count());
    Ok(())
}
