//! Loopback servers and clients shared by the server integration tests.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::{net::SocketAddr, time::Duration};

use graphwork_server::{
    ConcurrencyModel, ServerConfig, ServerConfigBuilder, ServerHandle, send_request,
};

pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration tuned for tests: quick shutdown polling and small pools.
#[must_use]
pub fn test_config(model: ConcurrencyModel) -> ServerConfigBuilder {
    ServerConfig::builder()
        .with_model(model)
        .with_pool_size(3)
        .with_ingest_workers(2)
        .with_read_timeout(Duration::from_secs(5))
        .with_accept_poll_interval(Duration::from_millis(5))
}

/// Binds an ephemeral loopback port and starts `config`.
#[must_use]
pub fn start(config: ServerConfigBuilder) -> ServerHandle {
    let config = config.build().expect("test configuration is valid");
    graphwork_server::Server::bind("127.0.0.1:0", config)
        .expect("bind loopback")
        .spawn()
        .expect("start server")
}

#[must_use]
pub fn start_model(model: ConcurrencyModel) -> ServerHandle {
    start(test_config(model))
}

/// Sends one request and returns the full reply.
#[must_use]
pub fn request(addr: SocketAddr, payload: &str) -> String {
    send_request(&addr.to_string(), payload, CLIENT_TIMEOUT).expect("request round trip")
}

/// Value of the first `label: value` line in `reply`.
#[must_use]
pub fn line_value<'a>(reply: &'a str, label: &str) -> Option<&'a str> {
    reply
        .lines()
        .find_map(|line| line.strip_prefix(label)?.strip_prefix(": "))
}
