//! Benchmark support crate for graphwork.
//!
//! Provides graph workloads and parameter types used by the Criterion
//! benchmarks for the generator, the five analyses and the three server
//! concurrency models.

pub mod error;
pub mod params;
pub mod workload;
