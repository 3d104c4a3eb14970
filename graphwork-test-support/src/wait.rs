//! Polling helpers for tests that observe other threads.

use std::{
    thread,
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Polls `condition` until it holds or `timeout` elapses.
///
/// Returns the final value of `condition`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use graphwork_test_support::wait::wait_until;
///
/// assert!(wait_until(Duration::from_millis(50), || true));
/// assert!(!wait_until(Duration::from_millis(20), || false));
/// ```
pub fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
