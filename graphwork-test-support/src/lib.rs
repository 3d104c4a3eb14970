//! Shared test utilities used across graphwork crates.

pub mod ci;
pub mod tracing;
pub mod wait;
