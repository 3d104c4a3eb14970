//! Blocking client for the one-request-per-connection protocol.

use std::{
    io::{Read, Write},
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use tracing::{debug, instrument};

use crate::error::ClientError;

/// Sends `payload` to `addr` and returns everything the server writes back
/// before closing the connection.
///
/// `timeout` bounds the connect attempt and each read and write.
///
/// # Errors
/// Returns [`ClientError::Resolve`] when `addr` does not resolve,
/// [`ClientError::Connect`] when no resolved address accepts the connection
/// and [`ClientError::Io`] when the exchange fails.
#[instrument(name = "client.request", err, skip(payload), fields(bytes = payload.len()))]
pub fn send_request(addr: &str, payload: &str, timeout: Duration) -> Result<String, ClientError> {
    let candidates: Vec<_> = addr
        .to_socket_addrs()
        .map_err(|_| ClientError::Resolve { addr: addr.to_owned() })?
        .collect();
    let mut last_error = None;
    let mut connected = None;
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => {
                connected = Some(stream);
                break;
            }
            Err(err) => last_error = Some(err),
        }
    }
    let mut stream = match (connected, last_error) {
        (Some(stream), _) => stream,
        (None, Some(source)) => {
            return Err(ClientError::Connect {
                addr: addr.to_owned(),
                source,
            });
        }
        (None, None) => return Err(ClientError::Resolve { addr: addr.to_owned() }),
    };
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    stream.write_all(payload.as_bytes())?;
    stream.flush()?;

    let mut reply = String::new();
    stream.read_to_string(&mut reply)?;
    debug!(bytes = reply.len(), "received reply");
    Ok(reply)
}
