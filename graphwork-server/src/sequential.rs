//! One dedicated thread per accepted connection.

use std::{
    mem,
    sync::{Arc, Mutex, PoisonError},
    thread::JoinHandle,
};

use tracing::{debug, info};

use crate::{
    config::ConcurrencyModel,
    context::ServerContext,
    dispatch::{Dispatcher, join_all, spawn_named, track},
    error::ServerError,
    session::Session,
    worker::serve_session,
};

/// Spawns a worker for every session. Finished workers are reaped on each
/// submission and the rest are joined at shutdown.
pub struct SequentialDispatcher {
    context: Arc<ServerContext>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SequentialDispatcher {
    /// Creates the dispatcher. No threads run until the first submission.
    #[must_use]
    pub fn new(context: Arc<ServerContext>) -> Self {
        Self {
            context,
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Number of connection threads not yet reaped.
    #[must_use]
    pub fn live_workers(&self) -> usize {
        let workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        workers.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Dispatcher for SequentialDispatcher {
    fn model(&self) -> ConcurrencyModel {
        ConcurrencyModel::Sequential
    }

    fn submit(&self, session: Session) -> Result<(), ServerError> {
        if self.context.is_shutting_down() {
            return Err(ServerError::ShuttingDown);
        }
        let context = Arc::clone(&self.context);
        let name = format!("graphwork-conn-{}", session.id());
        let handle = spawn_named(name, move || serve_session(&context, session))?;
        track(&self.workers, handle);
        Ok(())
    }

    fn shutdown(&self) {
        let workers = mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        if workers.is_empty() {
            return;
        }
        debug!(workers = workers.len(), "joining connection threads");
        join_all(workers);
        info!("sequential dispatcher stopped");
    }
}
