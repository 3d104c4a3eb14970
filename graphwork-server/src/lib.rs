//! Graphwork job server.
//!
//! Accepts one request per TCP connection and answers it with the analysis
//! report from `graphwork-core`. Connections are scheduled by one of three
//! interchangeable concurrency models behind the [`Dispatcher`] trait.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod context;
mod dispatch;
mod error;
mod leader_follower;
mod pipeline;
mod sequential;
mod server;
mod session;
mod telemetry;
mod worker;

pub use crate::{
    client::send_request,
    config::{ConcurrencyModel, ServerConfig, ServerConfigBuilder},
    context::{ServerContext, ShutdownSignal},
    dispatch::{Dispatcher, start as start_dispatcher},
    error::{ClientError, ClientErrorCode, ServerError, ServerErrorCode},
    leader_follower::{LeaderFollowerPool, RoleObserver},
    pipeline::{Pipeline, Stage},
    sequential::SequentialDispatcher,
    server::{Server, ServerHandle, ShutdownReport},
    session::{
        MAX_REQUEST_BYTES, ReadOutcome, SHUTDOWN_NOTICE, Session, SessionRegistry, SessionState,
    },
};
