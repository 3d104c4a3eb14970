//! Server configuration and its validating builder.

use std::{fmt, str::FromStr, time::Duration};

use graphwork_core::RequestLimits;

use crate::error::ServerError;

/// How accepted connections are scheduled onto threads.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ConcurrencyModel {
    /// One dedicated thread per connection.
    Sequential,
    /// Fixed pool handing a single leader role between workers.
    #[default]
    LeaderFollower,
    /// Six-stage pipeline with one queue per stage.
    Pipeline,
}

impl ConcurrencyModel {
    /// Every model, in documentation order.
    pub const ALL: [Self; 3] = [Self::Sequential, Self::LeaderFollower, Self::Pipeline];

    /// Identifier used on the command line and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::LeaderFollower => "leader-follower",
            Self::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for ConcurrencyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConcurrencyModel {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or(ServerError::InvalidConfig {
                field: "model",
                reason: "expected sequential, leader-follower or pipeline",
            })
    }
}

/// Validated server settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    model: ConcurrencyModel,
    pool_size: usize,
    ingest_workers: usize,
    read_timeout: Duration,
    accept_poll_interval: Duration,
    limits: RequestLimits,
}

impl ServerConfig {
    /// Starts a builder populated with defaults.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Selected concurrency model.
    #[must_use]
    pub fn model(&self) -> ConcurrencyModel {
        self.model
    }

    /// Leader-follower worker count.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Number of pipeline ingest workers.
    #[must_use]
    pub fn ingest_workers(&self) -> usize {
        self.ingest_workers
    }

    /// Bound on the wait for a connection's request.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// How often the accept loop checks for shutdown.
    #[must_use]
    pub fn accept_poll_interval(&self) -> Duration {
        self.accept_poll_interval
    }

    /// Request size limits.
    #[must_use]
    pub fn limits(&self) -> &RequestLimits {
        &self.limits
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let builder = ServerConfigBuilder::default();
        Self {
            model: builder.model,
            pool_size: builder.pool_size,
            ingest_workers: builder.ingest_workers,
            read_timeout: builder.read_timeout,
            accept_poll_interval: builder.accept_poll_interval,
            limits: builder.limits,
        }
    }
}

/// Configures and validates [`ServerConfig`] values.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use graphwork_server::{ConcurrencyModel, ServerConfig};
///
/// let config = ServerConfig::builder()
///     .with_model(ConcurrencyModel::Pipeline)
///     .with_read_timeout(Duration::from_secs(5))
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.model(), ConcurrencyModel::Pipeline);
/// assert_eq!(config.ingest_workers(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct ServerConfigBuilder {
    model: ConcurrencyModel,
    pool_size: usize,
    ingest_workers: usize,
    read_timeout: Duration,
    accept_poll_interval: Duration,
    limits: RequestLimits,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            model: ConcurrencyModel::default(),
            pool_size: 4,
            ingest_workers: 3,
            read_timeout: Duration::from_secs(30),
            accept_poll_interval: Duration::from_millis(100),
            limits: RequestLimits::default(),
        }
    }
}

impl ServerConfigBuilder {
    /// Selects the concurrency model.
    #[must_use]
    pub fn with_model(mut self, model: ConcurrencyModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the leader-follower worker count.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the number of pipeline ingest workers.
    #[must_use]
    pub fn with_ingest_workers(mut self, ingest_workers: usize) -> Self {
        self.ingest_workers = ingest_workers;
        self
    }

    /// Sets the bound on the initial request read.
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Sets how often the accept loop checks for shutdown.
    #[must_use]
    pub fn with_accept_poll_interval(mut self, interval: Duration) -> Self {
        self.accept_poll_interval = interval;
        self
    }

    /// Sets the request size limits.
    #[must_use]
    pub fn with_limits(mut self, limits: RequestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    /// Returns [`ServerError::InvalidConfig`] when a count is zero or a
    /// duration is zero.
    pub fn build(self) -> Result<ServerConfig, ServerError> {
        let checks: [(bool, &'static str, &'static str); 6] = [
            (self.pool_size == 0, "pool_size", "must be at least 1"),
            (self.ingest_workers == 0, "ingest_workers", "must be at least 1"),
            (self.read_timeout.is_zero(), "read_timeout", "must be non-zero"),
            (
                self.accept_poll_interval.is_zero(),
                "accept_poll_interval",
                "must be non-zero",
            ),
            (self.limits.max_vertices == 0, "max_vertices", "must be at least 1"),
            (
                Duration::from_secs(60) < self.accept_poll_interval,
                "accept_poll_interval",
                "must not exceed 60 seconds",
            ),
        ];
        if let Some((_, field, reason)) = checks.into_iter().find(|(failed, _, _)| *failed) {
            return Err(ServerError::InvalidConfig { field, reason });
        }
        Ok(ServerConfig {
            model: self.model,
            pool_size: self.pool_size,
            ingest_workers: self.ingest_workers,
            read_timeout: self.read_timeout,
            accept_poll_interval: self.accept_poll_interval,
            limits: self.limits,
        })
    }
}
