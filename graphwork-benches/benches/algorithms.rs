//! Analysis benchmarks.
//!
//! Runs each of the five analyses on pre-generated graphs so that only the
//! algorithm and its report rendering are measured.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use graphwork_benches::{
    error::BenchSetupError,
    workload::{SIZES, graph},
};
use graphwork_core::Algorithm;

fn analyses_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let graphs = SIZES
        .into_iter()
        .map(|params| graph(params).map(|built| (params, built)))
        .collect::<Result<Vec<_>, _>>()?;

    for algorithm in Algorithm::ALL {
        let mut group = c.benchmark_group(format!("analysis_{}", algorithm.token()));
        group.sample_size(20);
        for (params, built) in &graphs {
            group.bench_with_input(BenchmarkId::from_parameter(params), built, |b, built| {
                b.iter(|| algorithm.execute(built));
            });
        }
        group.finish();
    }
    Ok(())
}

fn analyses(c: &mut Criterion) {
    if let Err(err) = analyses_impl(c) {
        panic!("analysis benchmark setup failed: {err}");
    }
}

criterion_group!(benches, analyses);
criterion_main!(benches);
