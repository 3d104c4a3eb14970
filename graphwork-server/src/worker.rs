//! Serving one connection from request read to reply.

use std::time::Instant;

use graphwork_core::answer;
use tracing::{Span, debug, field, info_span, warn};

use crate::{
    context::ServerContext,
    session::{ReadOutcome, Session},
    telemetry,
};

/// Reads the session's request, logging why when none arrives.
pub(crate) fn receive(session: &mut Session) -> Option<String> {
    match session.read_request() {
        Ok(ReadOutcome::Request(raw)) => {
            debug!(bytes = raw.len(), "received request");
            Some(raw)
        }
        Ok(ReadOutcome::Closed) => {
            debug!("peer closed before sending a request");
            None
        }
        Ok(ReadOutcome::TimedOut) => {
            warn!("timed out waiting for request");
            telemetry::record_rejected();
            None
        }
        Err(err) => {
            warn!(error = %err, "failed to read request");
            None
        }
    }
}

/// Writes `reply`, logging a failed delivery.
pub(crate) fn deliver(session: &mut Session, reply: &str, started: Instant) {
    match session.respond(reply) {
        Ok(()) => {
            let latency = started.elapsed();
            Span::current().record("outcome", "answered");
            debug!(latency_us = latency.as_micros(), "reply sent");
            telemetry::record_completed(latency);
        }
        Err(err) => {
            Span::current().record("outcome", "send_failed");
            warn!(error = %err, "failed to send reply");
        }
    }
}

/// Runs the complete request cycle for one connection on the calling thread.
pub(crate) fn serve_session(context: &ServerContext, mut session: Session) {
    let span = info_span!(
        "server.session",
        session = session.id(),
        peer = %session.peer(),
        outcome = field::Empty
    );
    let _entered = span.enter();

    let Some(raw) = receive(&mut session) else {
        span.record("outcome", "unserved");
        return;
    };
    session.mark_active();
    let started = Instant::now();
    let reply = answer(&raw, context.config().limits());
    deliver(&mut session, &reply, started);
}
