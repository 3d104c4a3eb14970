//! Fixed worker pool with a single leader role.
//!
//! Each worker loops through three phases. It first waits until the leader
//! role is free and claims it. As leader it waits for a queued session. It
//! then releases the role before touching the request, so the next worker
//! can lead while this one processes. Both waits re-check the shutdown
//! signal on every wake-up.

use std::{
    collections::VecDeque,
    mem,
    sync::{
        Arc, Condvar, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    thread::JoinHandle,
};

use tracing::{debug, info, instrument, trace};

use crate::{
    config::ConcurrencyModel,
    context::ServerContext,
    dispatch::{Dispatcher, join_all, spawn_named},
    error::ServerError,
    session::Session,
    worker::serve_session,
};

/// Observer of leader role transitions.
///
/// Both callbacks run while the leader lock is held, so an observer sees
/// transitions in their true order.
pub trait RoleObserver: Send + Sync {
    /// `worker` has claimed the leader role.
    fn on_promoted(&self, worker: usize) {
        let _ = worker;
    }

    /// `worker` has released the leader role.
    fn on_demoted(&self, worker: usize) {
        let _ = worker;
    }
}

struct Silent;

impl RoleObserver for Silent {}

#[derive(Debug)]
struct LeaderState {
    available: bool,
    current: Option<usize>,
}

struct PoolShared {
    context: Arc<ServerContext>,
    leader: Mutex<LeaderState>,
    leader_cv: Condvar,
    queue: Mutex<VecDeque<Session>>,
    work_cv: Condvar,
    processing: AtomicUsize,
    observer: Arc<dyn RoleObserver>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PoolShared {
    fn stopping(&self) -> bool {
        self.context.is_shutting_down()
    }

    /// Blocks until the role is free and claims it. Returns `false` on
    /// shutdown.
    fn become_leader(&self, worker: usize) -> bool {
        let mut state = lock(&self.leader);
        while !state.available && !self.stopping() {
            state = self
                .leader_cv
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if self.stopping() {
            return false;
        }
        state.available = false;
        state.current = Some(worker);
        self.observer.on_promoted(worker);
        trace!(worker, "promoted to leader");
        true
    }

    fn release_leadership(&self, worker: usize) {
        let mut state = lock(&self.leader);
        state.available = true;
        state.current = None;
        self.observer.on_demoted(worker);
        self.leader_cv.notify_one();
        trace!(worker, "released leadership");
    }

    /// Waits for a session; `None` once shutdown is signalled.
    fn next_session(&self) -> Option<Session> {
        let mut queue = lock(&self.queue);
        loop {
            if self.stopping() {
                return None;
            }
            if let Some(session) = queue.pop_front() {
                return Some(session);
            }
            queue = self
                .work_cv
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn run_worker(&self, worker: usize) {
        while self.become_leader(worker) {
            let session = self.next_session();
            self.release_leadership(worker);
            let Some(session) = session else {
                break;
            };
            self.processing.fetch_add(1, Ordering::SeqCst);
            debug!(worker, session = session.id(), "processing as follower");
            serve_session(&self.context, session);
            self.processing.fetch_sub(1, Ordering::SeqCst);
        }
        debug!(worker, "worker exiting");
    }

    fn wake_all(&self) {
        drop(lock(&self.leader));
        self.leader_cv.notify_all();
        drop(lock(&self.queue));
        self.work_cv.notify_all();
    }
}

/// Leader-follower worker pool.
pub struct LeaderFollowerPool {
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl LeaderFollowerPool {
    /// Starts `context.config().pool_size()` workers.
    ///
    /// # Errors
    /// Returns [`ServerError::Spawn`] when a worker cannot start; workers
    /// already started are stopped first.
    pub fn start(context: Arc<ServerContext>) -> Result<Self, ServerError> {
        Self::start_observed(context, Arc::new(Silent))
    }

    /// Starts the pool reporting role transitions to `observer`.
    ///
    /// # Errors
    /// Same as [`LeaderFollowerPool::start`].
    #[instrument(
        name = "leader_follower.start",
        err,
        skip_all,
        fields(pool_size = context.config().pool_size())
    )]
    pub fn start_observed(
        context: Arc<ServerContext>,
        observer: Arc<dyn RoleObserver>,
    ) -> Result<Self, ServerError> {
        let pool_size = context.config().pool_size();
        let pool = Self {
            shared: Arc::new(PoolShared {
                context,
                leader: Mutex::new(LeaderState {
                    available: true,
                    current: None,
                }),
                leader_cv: Condvar::new(),
                queue: Mutex::new(VecDeque::new()),
                work_cv: Condvar::new(),
                processing: AtomicUsize::new(0),
                observer,
            }),
            workers: Mutex::new(Vec::with_capacity(pool_size)),
        };
        for worker in 0..pool_size {
            let shared = Arc::clone(&pool.shared);
            match spawn_named(format!("graphwork-lf-{worker}"), move || {
                shared.run_worker(worker);
            }) {
                Ok(handle) => lock(&pool.workers).push(handle),
                Err(err) => {
                    pool.shared.context.signal().trigger();
                    pool.shutdown();
                    return Err(err);
                }
            }
        }
        info!(pool_size, "leader-follower pool started");
        Ok(pool)
    }

    /// Worker currently holding the leader role.
    #[must_use]
    pub fn leader(&self) -> Option<usize> {
        lock(&self.shared.leader).current
    }

    /// Workers currently processing a request.
    #[must_use]
    pub fn processing(&self) -> usize {
        self.shared.processing.load(Ordering::SeqCst)
    }

    /// Sessions queued but not yet claimed.
    #[must_use]
    pub fn queued(&self) -> usize {
        lock(&self.shared.queue).len()
    }
}

impl Dispatcher for LeaderFollowerPool {
    fn model(&self) -> ConcurrencyModel {
        ConcurrencyModel::LeaderFollower
    }

    fn submit(&self, session: Session) -> Result<(), ServerError> {
        if self.shared.stopping() {
            return Err(ServerError::ShuttingDown);
        }
        lock(&self.shared.queue).push_back(session);
        self.shared.work_cv.notify_one();
        Ok(())
    }

    fn shutdown(&self) {
        self.shared.wake_all();
        let workers = mem::take(&mut *lock(&self.workers));
        if workers.is_empty() {
            return;
        }
        join_all(workers);
        let abandoned = mem::take(&mut *lock(&self.shared.queue)).len();
        info!(abandoned, "leader-follower pool stopped");
    }
}
