//! Error types for the server and its client.

use std::{fmt, io};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors raised while configuring, starting or running the server.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ServerError {
    /// A socket operation failed.
    #[error("i/o failure while {operation}: {source}")]
    Io {
        /// What the server was doing.
        operation: &'static str,
        /// Underlying error.
        source: io::Error,
    },
    /// A configuration value was rejected by the builder.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Work was submitted after shutdown began.
    #[error("server is shutting down")]
    ShuttingDown,
    /// A worker thread could not be started.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        /// Thread role, for example `leader-follower worker 2`.
        role: String,
        /// Underlying error.
        source: io::Error,
    },
}

impl ServerError {
    pub(crate) fn io(operation: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { operation, source }
    }
}

define_error_codes! {
    /// Stable codes describing [`ServerError`] variants.
    enum ServerErrorCode for ServerError {
        /// A socket operation failed.
        Io => Io { .. } => "SERVER_IO",
        /// A configuration value was rejected.
        InvalidConfig => InvalidConfig { .. } => "SERVER_INVALID_CONFIG",
        /// Work was submitted after shutdown began.
        ShuttingDown => ShuttingDown => "SERVER_SHUTTING_DOWN",
        /// A worker thread could not be started.
        Spawn => Spawn { .. } => "SERVER_SPAWN_FAILED",
    }
}

/// Errors raised by [`crate::send_request`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The address did not resolve to any socket address.
    #[error("could not resolve `{addr}`")]
    Resolve {
        /// Address as supplied.
        addr: String,
    },
    /// No resolved address accepted the connection.
    #[error("could not connect to `{addr}`: {source}")]
    Connect {
        /// Address as supplied.
        addr: String,
        /// Error from the last attempt.
        source: io::Error,
    },
    /// Sending the request or reading the reply failed.
    #[error("i/o failure talking to server: {source}")]
    Io {
        /// Underlying error.
        #[from]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`ClientError`] variants.
    enum ClientErrorCode for ClientError {
        /// The address did not resolve.
        Resolve => Resolve { .. } => "CLIENT_RESOLVE",
        /// The connection was refused or timed out.
        Connect => Connect { .. } => "CLIENT_CONNECT",
        /// Sending or receiving failed.
        Io => Io { .. } => "CLIENT_IO",
    }
}
