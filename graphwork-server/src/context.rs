//! Process-wide state shared by every worker.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{config::ServerConfig, session::SessionRegistry};

/// One-way cancellation flag.
#[derive(Debug, Default)]
pub struct ShutdownSignal(AtomicBool);

impl ShutdownSignal {
    /// Raises the flag. Later calls have no further effect.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`ShutdownSignal::trigger`] has been called.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration, cancellation signal and live-session registry handed to
/// every worker at construction.
#[derive(Debug)]
pub struct ServerContext {
    config: ServerConfig,
    signal: ShutdownSignal,
    sessions: Arc<SessionRegistry>,
}

impl ServerContext {
    /// Creates a context for `config`.
    #[must_use]
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            signal: ShutdownSignal::default(),
            sessions: Arc::new(SessionRegistry::default()),
        })
    }

    /// Server settings.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Cancellation signal.
    #[must_use]
    pub fn signal(&self) -> &ShutdownSignal {
        &self.signal
    }

    /// Shorthand for `self.signal().is_triggered()`.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.signal.is_triggered()
    }

    /// Registry of open connections.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }
}
