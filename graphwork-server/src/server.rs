//! Listener, accept loop and ordered shutdown.

use std::{
    io::{self, ErrorKind},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
    sync::Arc,
    thread::{self, JoinHandle},
};

use tracing::{Span, debug, field, info, instrument, warn};

use crate::{
    config::ServerConfig,
    context::ServerContext,
    dispatch::{self, Dispatcher, join_all, spawn_named},
    error::ServerError,
    session::SessionState,
    telemetry,
};

/// A bound listener that has not started accepting yet.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl Server {
    /// Binds `addr` and prepares a context for `config`.
    ///
    /// # Errors
    /// Returns [`ServerError::Io`] when the address cannot be bound.
    #[instrument(name = "server.bind", err, skip(addr, config), fields(local_addr = field::Empty))]
    pub fn bind(addr: impl ToSocketAddrs, config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).map_err(ServerError::io("binding the listener"))?;
        listener
            .set_nonblocking(true)
            .map_err(ServerError::io("configuring the listener"))?;
        if let Ok(local) = listener.local_addr() {
            Span::current().record("local_addr", field::display(local));
        }
        Ok(Self {
            listener,
            context: ServerContext::new(config),
        })
    }

    /// Address the listener is bound to.
    ///
    /// # Errors
    /// Returns [`ServerError::Io`] when the socket cannot report it.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener
            .local_addr()
            .map_err(ServerError::io("reading the local address"))
    }

    /// Context shared with every worker.
    #[must_use]
    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    /// Starts the configured concurrency model and the accept loop.
    ///
    /// # Errors
    /// Returns [`ServerError::Spawn`] when a thread cannot start.
    pub fn spawn(self) -> Result<ServerHandle, ServerError> {
        let dispatcher = dispatch::start(&self.context)?;
        self.spawn_with(dispatcher)
    }

    /// Starts the accept loop feeding an already running `dispatcher`.
    ///
    /// The dispatcher must have been built from [`Server::context`].
    ///
    /// # Errors
    /// Returns [`ServerError::Spawn`] when the accept thread cannot start;
    /// the dispatcher is stopped first.
    pub fn spawn_with(self, dispatcher: Arc<dyn Dispatcher>) -> Result<ServerHandle, ServerError> {
        let local_addr = self.local_addr()?;
        let Self { listener, context } = self;
        let accept = {
            let context = Arc::clone(&context);
            let dispatcher = Arc::clone(&dispatcher);
            spawn_named("graphwork-accept".into(), move || {
                accept_loop(&listener, &context, dispatcher.as_ref());
            })
        };
        let accept = match accept {
            Ok(handle) => handle,
            Err(err) => {
                context.signal().trigger();
                dispatcher.shutdown();
                return Err(err);
            }
        };
        info!(%local_addr, model = %dispatcher.model(), "server listening");
        Ok(ServerHandle {
            context,
            dispatcher,
            accept: Some(accept),
            local_addr,
        })
    }
}

fn accept_loop(listener: &TcpListener, context: &ServerContext, dispatcher: &dyn Dispatcher) {
    let poll = context.config().accept_poll_interval();
    while !context.is_shutting_down() {
        match listener.accept() {
            Ok((stream, peer)) => admit(context, dispatcher, stream, peer),
            Err(err) if err.kind() == ErrorKind::WouldBlock => thread::sleep(poll),
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => {
                warn!(error = %err, "accept failed");
                thread::sleep(poll);
            }
        }
    }
    debug!("accept loop stopped");
}

fn prepare(stream: &TcpStream, context: &ServerContext) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(context.config().read_timeout()))
}

fn admit(context: &ServerContext, dispatcher: &dyn Dispatcher, stream: TcpStream, peer: SocketAddr) {
    if let Err(err) = prepare(&stream, context) {
        warn!(%peer, error = %err, "could not configure connection");
        return;
    }
    let session = match context.sessions().register(stream, peer) {
        Ok(session) => session,
        Err(err) => {
            warn!(%peer, error = %err, "could not register connection");
            return;
        }
    };
    telemetry::record_accepted();
    debug!(session = session.id(), %peer, "accepted connection");
    if let Err(err) = dispatcher.submit(session) {
        telemetry::record_rejected();
        warn!(%peer, code = %err.code(), error = %err, "connection not dispatched");
    }
}

/// Sessions notified during shutdown.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ShutdownReport {
    /// Connections still waiting for their request.
    pub pending: usize,
    /// Connections left open after the workers stopped.
    pub remaining: usize,
}

/// A running server. Dropping it shuts the server down.
pub struct ServerHandle {
    context: Arc<ServerContext>,
    dispatcher: Arc<dyn Dispatcher>,
    accept: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    /// Address clients connect to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    /// Stops the server.
    ///
    /// The accept loop is stopped first. Connections still waiting for
    /// their request receive the shutdown notice, in-flight requests are
    /// allowed to finish, and anything left open afterwards is notified
    /// too.
    pub fn shutdown(mut self) -> ShutdownReport {
        self.stop()
    }

    #[instrument(name = "server.shutdown", skip(self), fields(model = %self.dispatcher.model()))]
    fn stop(&mut self) -> ShutdownReport {
        let Some(accept) = self.accept.take() else {
            return ShutdownReport::default();
        };
        self.context.signal().trigger();
        join_all(vec![accept]);
        let sessions = self.context.sessions();
        let pending = sessions.notify_shutdown(Some(SessionState::Pending));
        self.dispatcher.shutdown();
        let remaining = sessions.notify_shutdown(None);
        info!(pending, remaining, "server stopped");
        ShutdownReport { pending, remaining }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
