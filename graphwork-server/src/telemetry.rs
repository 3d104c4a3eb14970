//! Request counters, compiled to no-ops without the `metrics` feature.

use std::time::Duration;

#[cfg(feature = "metrics")]
pub(crate) fn record_accepted() {
    metrics::counter!("requests_accepted").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_accepted() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_rejected() {
    metrics::counter!("requests_rejected").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_rejected() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_completed(latency: Duration) {
    metrics::counter!("requests_completed").increment(1);
    metrics::histogram!("request_latency_seconds").record(latency.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_completed(_latency: Duration) {}
