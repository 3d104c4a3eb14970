//! Leader role hand-off in the leader-follower pool.

mod common;

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use common::{request, test_config};
use graphwork_server::{
    ConcurrencyModel, Dispatcher, LeaderFollowerPool, RoleObserver, Server, ServerHandle,
};
use graphwork_test_support::wait::wait_until;

/// Tracks how many workers hold the leader role at once.
#[derive(Default)]
struct RoleCounter {
    leaders: AtomicUsize,
    most_leaders: AtomicUsize,
    promotions: AtomicUsize,
    promoted: Mutex<Vec<usize>>,
}

impl RoleObserver for RoleCounter {
    fn on_promoted(&self, worker: usize) {
        let now = self.leaders.fetch_add(1, Ordering::SeqCst) + 1;
        self.most_leaders.fetch_max(now, Ordering::SeqCst);
        self.promotions.fetch_add(1, Ordering::SeqCst);
        self.promoted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(worker);
    }

    fn on_demoted(&self, _worker: usize) {
        self.leaders.fetch_sub(1, Ordering::SeqCst);
    }
}

fn observed_pool(pool_size: usize) -> (ServerHandle, Arc<LeaderFollowerPool>, Arc<RoleCounter>) {
    let config = test_config(ConcurrencyModel::LeaderFollower)
        .with_pool_size(pool_size)
        .build()
        .expect("config");
    let server = Server::bind("127.0.0.1:0", config).expect("bind");
    let counter = Arc::new(RoleCounter::default());
    let observer: Arc<dyn RoleObserver> = Arc::<RoleCounter>::clone(&counter);
    let pool = Arc::new(
        LeaderFollowerPool::start_observed(Arc::clone(server.context()), observer)
            .expect("pool"),
    );
    let dispatcher: Arc<dyn Dispatcher> = Arc::<LeaderFollowerPool>::clone(&pool);
    let handle = server.spawn_with(dispatcher).expect("spawn");
    (handle, pool, counter)
}

#[test]
fn idle_pool_has_exactly_one_leader() {
    let (handle, pool, counter) = observed_pool(3);
    assert!(wait_until(Duration::from_secs(5), || pool.leader().is_some()));
    assert_eq!(counter.leaders.load(Ordering::SeqCst), 1);
    assert_eq!(pool.processing(), 0);
    handle.shutdown();
    assert_eq!(pool.leader(), None);
    assert_eq!(counter.leaders.load(Ordering::SeqCst), 0);
}

#[test]
fn leadership_is_never_shared_under_load() {
    let (handle, pool, counter) = observed_pool(3);
    let addr = handle.local_addr();
    let clients: Vec<_> = (0..24)
        .map(|seed| {
            thread::spawn(move || request(addr, &format!("-e 20 -v 10 -s {seed} -a MAX_CLIQUE")))
        })
        .collect();
    for client in clients {
        let reply = client.join().expect("client thread");
        assert!(reply.starts_with("ALGORITHM: Max Clique"), "{reply}");
    }

    assert_eq!(counter.most_leaders.load(Ordering::SeqCst), 1);
    assert!(counter.promotions.load(Ordering::SeqCst) >= 24);
    assert!(wait_until(Duration::from_secs(5), || pool.processing() == 0));
    assert_eq!(pool.queued(), 0);
    handle.shutdown();
}

#[test]
fn leadership_rotates_between_workers() {
    let (handle, _pool, counter) = observed_pool(2);
    for seed in 0..4 {
        let reply = request(handle.local_addr(), &format!("-e 3 -v 3 -s {seed}"));
        assert!(reply.starts_with("SUCCESS"), "{reply}");
    }
    handle.shutdown();
    let mut promoted = counter
        .promoted
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    promoted.sort_unstable();
    promoted.dedup();
    assert_eq!(promoted, vec![0, 1]);
}
