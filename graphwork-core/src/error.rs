//! Error types for the graphwork core library.
//!
//! Defines the graph and request-parsing error enums exposed by the public
//! API together with stable machine-readable codes.

use std::fmt;

use thiserror::Error;

use crate::protocol::Parameter;

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

/// An error produced by [`crate::Graph`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// A vertex identifier fell outside `[0, vertex_count)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending vertex identifier.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// An edge would have joined a vertex to itself.
    #[error("self loops are not allowed (vertex {vertex})")]
    SelfLoop {
        /// The vertex named as both endpoints.
        vertex: usize,
    },
    /// A graph was constructed with no vertices.
    #[error("number of vertices must be positive")]
    EmptyGraph,
    /// The requested edge does not exist.
    #[error("edge ({left}, {right}) not found")]
    EdgeNotFound {
        /// First endpoint as supplied by the caller.
        left: usize,
        /// Second endpoint as supplied by the caller.
        right: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A vertex identifier fell outside the graph.
        VertexOutOfRange => VertexOutOfRange { .. } => "GRAPH_RANGE_ERROR",
        /// An edge would have joined a vertex to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_INVALID_ARGUMENT",
        /// A graph was constructed with no vertices.
        EmptyGraph => EmptyGraph => "GRAPH_EMPTY",
        /// The requested edge does not exist.
        EdgeNotFound => EdgeNotFound { .. } => "GRAPH_NOT_FOUND",
    }
}

/// An error produced while parsing request text.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    /// The vertex count was missing or non-positive, or the edge count was
    /// negative.
    #[error(
        "Invalid parameters. Use format: -e <edges> -v <vertices> -s <seed> [-a <algorithm>]\nAvailable algorithms: {available}",
        available = crate::algorithm::AVAILABLE
    )]
    InvalidParameters,
    /// The `-a` token named an algorithm the server does not provide.
    #[error("Unknown algorithm '{name}'. Available: {available}", available = crate::algorithm::AVAILABLE)]
    UnknownAlgorithm {
        /// The unrecognised token.
        name: String,
    },
    /// A parameter exceeded the server-imposed size limit.
    #[error("Requested {requested} {parameter} exceeds the server limit of {limit}")]
    LimitExceeded {
        /// Which parameter was too large.
        parameter: Parameter,
        /// Value supplied by the client.
        requested: usize,
        /// Configured upper bound.
        limit: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ParseError`] variants.
    enum ParseErrorCode for ParseError {
        /// The request parameters were missing or out of range.
        InvalidParameters => InvalidParameters => "PARSE_INVALID_PARAMETERS",
        /// The requested algorithm is unknown.
        UnknownAlgorithm => UnknownAlgorithm { .. } => "PARSE_UNKNOWN_ALGORITHM",
        /// A parameter exceeded the server limit.
        LimitExceeded => LimitExceeded { .. } => "PARSE_LIMIT_EXCEEDED",
    }
}

/// Convenient alias for results returned by graph operations.
pub type Result<T> = core::result::Result<T, GraphError>;
