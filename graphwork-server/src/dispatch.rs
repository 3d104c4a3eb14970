//! The seam between the accept loop and a concurrency model.

use std::{
    mem,
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use crate::{
    config::ConcurrencyModel,
    context::ServerContext,
    error::ServerError,
    leader_follower::LeaderFollowerPool,
    pipeline::Pipeline,
    sequential::SequentialDispatcher,
    session::Session,
};

/// Schedules accepted sessions onto worker threads.
pub trait Dispatcher: Send + Sync {
    /// Model implemented by this dispatcher.
    fn model(&self) -> ConcurrencyModel;

    /// Hands over an accepted session.
    ///
    /// # Errors
    /// Returns [`ServerError::ShuttingDown`] once shutdown has begun and
    /// [`ServerError::Spawn`] when a per-connection thread cannot start. The
    /// session is dropped in both cases.
    fn submit(&self, session: Session) -> Result<(), ServerError>;

    /// Wakes every parked worker and joins them all. In-flight requests run
    /// to completion. Calling it again is a no-op.
    ///
    /// Callers trigger the context's shutdown signal first.
    fn shutdown(&self);
}

/// Starts the dispatcher selected by the context's configuration.
///
/// # Errors
/// Returns [`ServerError::Spawn`] when a worker thread cannot start.
pub fn start(context: &Arc<ServerContext>) -> Result<Arc<dyn Dispatcher>, ServerError> {
    let dispatcher: Arc<dyn Dispatcher> = match context.config().model() {
        ConcurrencyModel::Sequential => Arc::new(SequentialDispatcher::new(Arc::clone(context))),
        ConcurrencyModel::LeaderFollower => {
            Arc::new(LeaderFollowerPool::start(Arc::clone(context))?)
        }
        ConcurrencyModel::Pipeline => Arc::new(Pipeline::start(Arc::clone(context))?),
    };
    Ok(dispatcher)
}

pub(crate) fn spawn_named<F>(name: String, body: F) -> Result<thread::JoinHandle<()>, ServerError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|source| ServerError::Spawn { role: name, source })
}

pub(crate) fn join_all(handles: Vec<thread::JoinHandle<()>>) {
    for handle in handles {
        let name = handle.thread().name().map(str::to_owned);
        if handle.join().is_err() {
            tracing::error!(
                thread = name.as_deref().unwrap_or("unnamed"),
                "worker thread panicked"
            );
        }
    }
}

/// Adds `handle` to `workers`, joining any that have already finished.
pub(crate) fn track(workers: &Mutex<Vec<thread::JoinHandle<()>>>, handle: thread::JoinHandle<()>) {
    let mut guard = workers.lock().unwrap_or_else(PoisonError::into_inner);
    let (finished, running): (Vec<_>, Vec<_>) = mem::take(&mut *guard)
        .into_iter()
        .partition(thread::JoinHandle::is_finished);
    *guard = running;
    guard.push(handle);
    drop(guard);
    join_all(finished);
}
