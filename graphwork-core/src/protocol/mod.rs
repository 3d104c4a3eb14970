//! Text request protocol.
//!
//! A request is a whitespace-separated token list of the form
//! `-e <edges> -v <vertices> [-s <seed>] [-a <ALGO>]`. Parsing validates
//! the counts, resolves the algorithm token and enforces the server's size
//! limits before any graph is built.

mod response;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::{
    algorithm::Algorithm,
    error::{ParseError, Result},
    graph::Graph,
};

pub use self::response::{AnalysisReport, error_response, respond};

/// Seed used when a request omits `-s`.
pub const DEFAULT_SEED: i64 = -1;

/// Request parameters subject to server limits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Parameter {
    /// The `-v` vertex count.
    Vertices,
    /// The `-e` edge count.
    Edges,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertices => "vertices",
            Self::Edges => "edges",
        })
    }
}

/// Upper bounds applied to incoming requests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequestLimits {
    /// Largest accepted `-v` value.
    pub max_vertices: usize,
    /// Largest accepted `-e` value.
    pub max_edges: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_vertices: 512,
            max_edges: 4096,
        }
    }
}

/// A validated request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    /// Requested edge count before clamping to the simple-graph maximum.
    pub edges: usize,
    /// Vertex count, always positive.
    pub vertices: usize,
    /// Generator seed as sent by the client.
    pub seed: i64,
    /// Selected analysis.
    pub algorithm: Algorithm,
}

impl Request {
    /// Builds the random graph described by this request.
    ///
    /// # Errors
    /// Propagates [`crate::GraphError`] from the generator.
    pub fn generate(&self) -> Result<Graph> {
        Graph::random(self.vertices, self.edges, self.seed.cast_unsigned())
    }
}

/// Parses request text.
///
/// A numeric flag only consumes its successor when that token is an integer,
/// so `-e -v 5` leaves the edge count unset.
///
/// # Errors
/// Returns [`ParseError::InvalidParameters`] when the vertex count is
/// missing or not positive or the edge count is missing or negative,
/// [`ParseError::UnknownAlgorithm`] for an unrecognised `-a` token and
/// [`ParseError::LimitExceeded`] when a count is above `limits`.
///
/// # Examples
/// ```
/// use graphwork_core::{Algorithm, RequestLimits, parse_request};
///
/// let request = parse_request("-e 5 -v 4 -s 43 -a MST_WEIGHT", &RequestLimits::default())
///     .expect("well-formed request");
/// assert_eq!(request.vertices, 4);
/// assert_eq!(request.algorithm, Algorithm::MstWeight);
/// ```
pub fn parse_request(
    raw: &str,
    limits: &RequestLimits,
) -> core::result::Result<Request, ParseError> {
    let mut edges: Option<i64> = None;
    let mut vertices: Option<i64> = None;
    let mut seed = DEFAULT_SEED;
    let mut algorithm_token: Option<&str> = None;

    let mut tokens = raw.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        match token {
            "-a" => {
                if let Some(next) = tokens.next() {
                    algorithm_token = Some(next);
                }
            }
            "-e" | "-v" | "-s" => {
                let Some(value) = tokens.peek().and_then(|next| next.parse::<i64>().ok()) else {
                    continue;
                };
                tokens.next();
                match token {
                    "-e" => edges = Some(value),
                    "-v" => vertices = Some(value),
                    _ => seed = value,
                }
            }
            _ => {}
        }
    }

    let (Some(edges), Some(vertices)) = (edges, vertices) else {
        return Err(ParseError::InvalidParameters);
    };
    let (Ok(edges), Ok(vertices)) = (usize::try_from(edges), usize::try_from(vertices)) else {
        return Err(ParseError::InvalidParameters);
    };
    if vertices == 0 {
        return Err(ParseError::InvalidParameters);
    }

    let algorithm = match algorithm_token {
        Some(token) => token
            .parse::<Algorithm>()
            .map_err(|unknown| ParseError::UnknownAlgorithm { name: unknown.0 })?,
        None => Algorithm::default(),
    };

    check_limit(Parameter::Vertices, vertices, limits.max_vertices)?;
    check_limit(Parameter::Edges, edges, limits.max_edges)?;

    Ok(Request {
        edges,
        vertices,
        seed,
        algorithm,
    })
}

fn check_limit(
    parameter: Parameter,
    requested: usize,
    limit: usize,
) -> core::result::Result<(), ParseError> {
    if requested > limit {
        return Err(ParseError::LimitExceeded {
            parameter,
            requested,
            limit,
        });
    }
    Ok(())
}
