//! Six-stage pipeline.
//!
//! A reader thread per connection waits for the request text and queues it
//! for Ingest. Ingest parses it, builds the graph and starts the report; the
//! unit then passes through the MST, SCC, max-flow and max-clique stages,
//! each appending its section, before Respond sends the report. Every unit
//! visits every stage whatever algorithm the client named. A rejected
//! request is answered by Ingest directly.
//!
//! Shutdown drains the stages in flow order: readers are joined, then each
//! queue is closed and its workers joined before the next queue is closed,
//! so units already inside the pipeline are answered.

mod queue;
mod stage;


use std::{
    mem,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    thread::JoinHandle,
    time::Instant,
};

use graphwork_core::{AnalysisReport, GraphSummary, error_response, parse_request};
use tracing::{debug, field, info, info_span, warn};

pub use self::stage::Stage;
use self::{
    queue::StageQueue,
    stage::{Arrival, WorkUnit},
};
use crate::{
    config::ConcurrencyModel,
    context::ServerContext,
    dispatch::{Dispatcher, join_all, spawn_named, track},
    error::ServerError,
    session::Session,
    worker::{deliver, receive},
};

const STATS_INTERVAL: u64 = 10;

#[derive(Debug, Default)]
struct PipelineStats {
    submitted: AtomicU64,
    completed: AtomicU64,
}

struct PipelineShared {
    context: Arc<ServerContext>,
    ingest: StageQueue<Arrival>,
    downstream: [StageQueue<Box<WorkUnit>>; 5],
    stats: PipelineStats,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PipelineShared {
    fn queue(&self, stage: Stage) -> Option<&StageQueue<Box<WorkUnit>>> {
        stage
            .downstream_index()
            .and_then(|index| self.downstream.get(index))
    }

    fn close(&self, stage: Stage) {
        match self.queue(stage) {
            Some(queue) => queue.close(),
            None => self.ingest.close(),
        }
    }

    fn queued(&self, stage: Stage) -> usize {
        self.queue(stage).map_or_else(|| self.ingest.len(), StageQueue::len)
    }

    fn read(&self, mut session: Session) {
        let span = info_span!(
            "pipeline.read",
            session = session.id(),
            peer = %session.peer()
        );
        let _entered = span.enter();
        let Some(raw) = receive(&mut session) else {
            return;
        };
        session.mark_active();
        let arrival = Arrival {
            session,
            raw,
            started: Instant::now(),
        };
        if let Err(arrival) = self.ingest.push(arrival) {
            warn!(session = arrival.session.id(), "ingest closed, dropping request");
        }
    }

    fn run_ingest(&self, worker: usize) {
        while let Some(arrival) = self.ingest.pop() {
            let span = info_span!(
                "pipeline.stage",
                stage = Stage::Ingest.as_str(),
                worker,
                session = arrival.session.id(),
                outcome = field::Empty
            );
            let _entered = span.enter();
            if let Some(unit) = self.ingest_one(arrival) {
                self.forward(Stage::Ingest, unit);
            }
        }
        debug!(stage = Stage::Ingest.as_str(), worker, "stage worker exiting");
    }

    /// Turns an arrival into a work unit, answering it directly when the
    /// request is rejected.
    fn ingest_one(&self, arrival: Arrival) -> Option<Box<WorkUnit>> {
        let Arrival {
            mut session,
            raw,
            started,
        } = arrival;
        let limits = self.context.config().limits();
        let parsed = parse_request(&raw, limits)
            .map_err(|err| {
                debug!(code = %err.code(), "rejected request");
                error_response(&err)
            })
            .and_then(|request| match request.generate() {
                Ok(graph) => Ok((request, graph)),
                Err(err) => Err(error_response(&err)),
            });
        match parsed {
            Ok((request, graph)) => {
                let summary = GraphSummary::of(&graph);
                debug!(
                    edges = summary.edges,
                    connected = summary.connected,
                    euler = summary.has_euler_circuit(),
                    "generated graph"
                );
                let report = AnalysisReport::begin(&request, &graph);
                Some(Box::new(WorkUnit {
                    session,
                    request,
                    graph,
                    report,
                    started,
                }))
            }
            Err(reply) => {
                deliver(&mut session, &reply, started);
                self.stats.completed.fetch_add(1, Ordering::SeqCst);
                None
            }
        }
    }

    fn run_stage(&self, stage: Stage, queue: &StageQueue<Box<WorkUnit>>) {
        while let Some(mut unit) = queue.pop() {
            let span = info_span!(
                "pipeline.stage",
                stage = stage.as_str(),
                session = unit.session.id(),
                algorithm = unit.request.algorithm.token(),
                outcome = field::Empty
            );
            let _entered = span.enter();
            match stage.algorithm() {
                Some(algorithm) => {
                    unit.report.append_section(algorithm, &unit.graph);
                    self.forward(stage, unit);
                }
                None => self.respond(*unit),
            }
        }
        debug!(stage = stage.as_str(), "stage worker exiting");
    }

    fn forward(&self, from: Stage, unit: Box<WorkUnit>) {
        let Some(queue) = from.next().and_then(|next| self.queue(next)) else {
            return;
        };
        if let Err(unit) = queue.push(unit) {
            warn!(
                stage = from.as_str(),
                session = unit.session.id(),
                "next stage closed, dropping work unit"
            );
        }
    }

    fn respond(&self, unit: WorkUnit) {
        let WorkUnit {
            mut session,
            report,
            started,
            ..
        } = unit;
        let reply = report.finish(started.elapsed());
        deliver(&mut session, &reply, started);
        self.stats.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn log_stats(&self) {
        info!(
            submitted = self.stats.submitted.load(Ordering::SeqCst),
            completed = self.stats.completed.load(Ordering::SeqCst),
            "pipeline statistics"
        );
    }
}

/// Staged pipeline dispatcher.
pub struct Pipeline {
    shared: Arc<PipelineShared>,
    readers: Mutex<Vec<JoinHandle<()>>>,
    stages: Mutex<Vec<(Stage, JoinHandle<()>)>>,
}

impl Pipeline {
    /// Starts `ingest_workers` Ingest threads and one thread for each later
    /// stage.
    ///
    /// # Errors
    /// Returns [`ServerError::Spawn`] when a stage thread cannot start;
    /// stages already started are drained and joined first.
    pub fn start(context: Arc<ServerContext>) -> Result<Self, ServerError> {
        let ingest_workers = context.config().ingest_workers();
        let pipeline = Self {
            shared: Arc::new(PipelineShared {
                context,
                ingest: StageQueue::new(),
                downstream: [
                    StageQueue::new(),
                    StageQueue::new(),
                    StageQueue::new(),
                    StageQueue::new(),
                    StageQueue::new(),
                ],
                stats: PipelineStats::default(),
            }),
            readers: Mutex::new(Vec::new()),
            stages: Mutex::new(Vec::new()),
        };
        if let Err(err) = pipeline.spawn_stages(ingest_workers) {
            pipeline.shutdown();
            return Err(err);
        }
        info!(ingest_workers, "pipeline started");
        Ok(pipeline)
    }

    fn spawn_stages(&self, ingest_workers: usize) -> Result<(), ServerError> {
        for worker in 0..ingest_workers {
            let shared = Arc::clone(&self.shared);
            let handle = spawn_named(format!("graphwork-ingest-{worker}"), move || {
                shared.run_ingest(worker);
            })?;
            lock(&self.stages).push((Stage::Ingest, handle));
        }
        for stage in Stage::ALL.into_iter().skip(1) {
            let shared = Arc::clone(&self.shared);
            let handle = spawn_named(format!("graphwork-{stage}"), move || {
                if let Some(queue) = shared.queue(stage) {
                    shared.run_stage(stage, queue);
                }
            })?;
            lock(&self.stages).push((stage, handle));
        }
        Ok(())
    }

    /// Connections handed to the pipeline so far.
    #[must_use]
    pub fn submitted(&self) -> u64 {
        self.shared.stats.submitted.load(Ordering::SeqCst)
    }

    /// Requests answered so far, including rejected ones.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.shared.stats.completed.load(Ordering::SeqCst)
    }

    /// Units waiting in front of `stage`.
    #[must_use]
    pub fn queued(&self, stage: Stage) -> usize {
        self.shared.queued(stage)
    }
}

impl Dispatcher for Pipeline {
    fn model(&self) -> ConcurrencyModel {
        ConcurrencyModel::Pipeline
    }

    fn submit(&self, session: Session) -> Result<(), ServerError> {
        if self.shared.context.is_shutting_down() {
            return Err(ServerError::ShuttingDown);
        }
        let shared = Arc::clone(&self.shared);
        let name = format!("graphwork-read-{}", session.id());
        let handle = spawn_named(name, move || shared.read(session))?;
        track(&self.readers, handle);

        let submitted = self.shared.stats.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        if submitted.is_multiple_of(STATS_INTERVAL) {
            self.shared.log_stats();
        }
        Ok(())
    }

    fn shutdown(&self) {
        let readers = mem::take(&mut *lock(&self.readers));
        let mut stages = mem::take(&mut *lock(&self.stages));
        if readers.is_empty() && stages.is_empty() {
            return;
        }
        join_all(readers);
        for stage in Stage::ALL {
            self.shared.close(stage);
            let (current, rest): (Vec<_>, Vec<_>) =
                stages.into_iter().partition(|(owner, _)| *owner == stage);
            stages = rest;
            join_all(current.into_iter().map(|(_, handle)| handle).collect());
            debug!(stage = stage.as_str(), "stage drained");
        }
        self.shared.log_stats();
        info!("pipeline stopped");
    }
}
