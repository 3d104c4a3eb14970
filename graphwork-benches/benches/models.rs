//! Request latency of the three concurrency models over loopback TCP.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use graphwork_benches::{
    error::BenchSetupError,
    params::GraphBenchParams,
    workload::{REQUEST_TIMEOUT, SEED, loopback_server},
};
use graphwork_server::{ConcurrencyModel, send_request};

const REQUEST: GraphBenchParams = GraphBenchParams::sparse(64, 3);

fn round_trip_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let payload = REQUEST.payload(SEED, "MST_WEIGHT");
    let mut group = c.benchmark_group("request_round_trip");
    group.sample_size(30);
    for model in ConcurrencyModel::ALL {
        let handle = loopback_server(model, &payload)?;
        let addr = handle.local_addr().to_string();
        group.bench_function(BenchmarkId::new(model.as_str(), REQUEST), |b| {
            b.iter(|| send_request(&addr, &payload, REQUEST_TIMEOUT));
        });
        handle.shutdown();
    }
    group.finish();
    Ok(())
}

fn round_trip(c: &mut Criterion) {
    if let Err(err) = round_trip_impl(c) {
        panic!("model benchmark setup failed: {err}");
    }
}

criterion_group!(benches, round_trip);
criterion_main!(benches);
