//! Accepted connections and the registry used to notify them at shutdown.

use std::{
    collections::HashMap,
    io::{self, ErrorKind, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::{debug, trace};

/// Token written to every open connection when the server stops.
pub const SHUTDOWN_NOTICE: &str = "SERVER_SHUTDOWN";

/// Largest request accepted in a single read.
pub const MAX_REQUEST_BYTES: usize = 4096;

/// Lifecycle stage of a registered connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Accepted, request not yet read.
    Pending,
    /// Request read and being processed.
    Active,
}

#[derive(Debug)]
struct Entry {
    stream: TcpStream,
    peer: SocketAddr,
    state: SessionState,
}

/// Live connections keyed by session id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, Entry>>,
}

impl SessionRegistry {
    /// Registers `stream` and returns the session that owns it.
    ///
    /// # Errors
    /// Fails when the stream handle cannot be duplicated.
    pub fn register(self: &Arc<Self>, stream: TcpStream, peer: SocketAddr) -> io::Result<Session> {
        let handle = stream.try_clone()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(
            id,
            Entry {
                stream: handle,
                peer,
                state: SessionState::Pending,
            },
        );
        Ok(Session {
            id,
            peer,
            stream,
            registry: Arc::clone(self),
        })
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no session is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of sessions in `state`.
    #[must_use]
    pub fn count(&self, state: SessionState) -> usize {
        self.lock().values().filter(|e| e.state == state).count()
    }

    /// Sends [`SHUTDOWN_NOTICE`] to every session matching `only` (or to all
    /// sessions when `None`) and closes their sockets.
    ///
    /// Stream handles are duplicated under the registry lock and written
    /// after it is released. Notified sessions stay registered until their
    /// owner drops them. Returns the number of sessions notified.
    pub fn notify_shutdown(&self, only: Option<SessionState>) -> usize {
        let targets = self.notice_targets(only);
        let notified = targets.len();
        for target in targets {
            target.deliver();
        }
        notified
    }

    fn notice_targets(&self, only: Option<SessionState>) -> Vec<Notice> {
        self.lock()
            .iter()
            .filter(|(_, entry)| only.is_none_or(|state| state == entry.state))
            .filter_map(|(&id, entry)| match entry.stream.try_clone() {
                Ok(stream) => Some(Notice {
                    id,
                    peer: entry.peer,
                    stream,
                }),
                Err(err) => {
                    trace!(
                        session = id,
                        peer = %entry.peer,
                        error = %err,
                        "cannot duplicate stream for shutdown notice"
                    );
                    None
                }
            })
            .collect()
    }

    fn set_state(&self, id: u64, state: SessionState) {
        if let Some(entry) = self.lock().get_mut(&id) {
            entry.state = state;
        }
    }

    fn remove(&self, id: u64) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Notice {
    id: u64,
    peer: SocketAddr,
    stream: TcpStream,
}

impl Notice {
    fn deliver(mut self) {
        if let Err(err) = self.stream.write_all(SHUTDOWN_NOTICE.as_bytes()) {
            trace!(
                session = self.id,
                peer = %self.peer,
                error = %err,
                "shutdown notice not delivered"
            );
        }
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            trace!(session = self.id, error = %err, "socket already closed");
        }
    }
}

/// Outcome of waiting for a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadOutcome {
    /// Request text, decoded lossily.
    Request(String),
    /// The peer closed the connection before sending anything.
    Closed,
    /// The read timeout expired.
    TimedOut,
}

/// An accepted connection. Dropping it closes the socket and removes it from
/// the registry.
#[derive(Debug)]
pub struct Session {
    id: u64,
    peer: SocketAddr,
    stream: TcpStream,
    registry: Arc<SessionRegistry>,
}

impl Session {
    /// Registry-assigned identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remote address.
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Performs the single bounded read of the request.
    ///
    /// # Errors
    /// Returns socket errors other than timeouts.
    pub fn read_request(&mut self) -> io::Result<ReadOutcome> {
        let mut buf = [0_u8; MAX_REQUEST_BYTES];
        match self.stream.read(&mut buf) {
            Ok(0) => Ok(ReadOutcome::Closed),
            Ok(n) => {
                let bytes = buf.get(..n).unwrap_or_default();
                Ok(ReadOutcome::Request(String::from_utf8_lossy(bytes).into_owned()))
            }
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                Ok(ReadOutcome::TimedOut)
            }
            Err(err) => Err(err),
        }
    }

    /// Marks the request as being processed so shutdown lets it finish.
    pub fn mark_active(&self) {
        self.registry.set_state(self.id, SessionState::Active);
    }

    /// Writes the full response.
    ///
    /// # Errors
    /// Returns the socket error when the peer has gone away.
    pub fn respond(&mut self, response: &str) -> io::Result<()> {
        self.stream.write_all(response.as_bytes())?;
        self.stream.flush()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.registry.remove(self.id);
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            trace!(session = self.id, error = %err, "socket already closed");
        }
        debug!(session = self.id, peer = %self.peer, "session closed");
    }
}
