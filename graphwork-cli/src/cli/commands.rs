use std::{
    io::{self, Write},
    net::SocketAddr,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use graphwork_core::{
    Algorithm, DEFAULT_SEED, GraphError, GraphSummary, ParseError, Request, RequestLimits,
    UnknownAlgorithm, respond,
};
use graphwork_server::{
    ClientError, ConcurrencyModel, SHUTDOWN_NOTICE, Server, ServerConfig, ServerError,
    ShutdownReport, send_request,
};
use thiserror::Error;
use tracing::{info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "graphwork",
    version,
    about = "Serve, query and run random graph analyses."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the job server until interrupted.
    Serve(ServeCommand),
    /// Send one request to a running server and print the reply.
    Request(RequestCommand),
    /// Build a graph locally and print its summary and analysis.
    Analyse(AnalyseCommand),
}

/// Concurrency models selectable on the command line.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum ModelArg {
    /// One thread per connection.
    Sequential,
    /// Fixed pool with leader hand-off.
    #[default]
    LeaderFollower,
    /// Six-stage pipeline.
    Pipeline,
}

impl From<ModelArg> for ConcurrencyModel {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::Sequential => Self::Sequential,
            ModelArg::LeaderFollower => Self::LeaderFollower,
            ModelArg::Pipeline => Self::Pipeline,
        }
    }
}

/// Options accepted by `serve`.
#[derive(Debug, Args, Clone)]
pub struct ServeCommand {
    /// TCP port to listen on.
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Concurrency model.
    #[arg(long, value_enum, default_value_t = ModelArg::default())]
    pub model: ModelArg,

    /// Leader-follower worker count.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Pipeline ingest worker count.
    #[arg(long = "ingest-workers", default_value_t = 3)]
    pub ingest_workers: usize,

    /// Seconds to wait for a request after accepting a connection.
    #[arg(long = "read-timeout-secs", default_value_t = 30)]
    pub read_timeout_secs: u64,

    /// Largest vertex count a request may ask for.
    #[arg(long = "max-vertices", default_value_t = 512)]
    pub max_vertices: usize,

    /// Largest edge count a request may ask for.
    #[arg(long = "max-edges", default_value_t = 4096)]
    pub max_edges: usize,
}

/// Options accepted by `request`.
#[derive(Debug, Args, Clone)]
pub struct RequestCommand {
    /// Server host name or address.
    pub host: String,

    /// Server port.
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Seconds allowed for connecting and for each read or write.
    #[arg(long = "timeout-secs", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Request tokens, for example `-e 10 -v 6 -s 3 -a MAX_FLOW`.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub payload: Vec<String>,
}

/// Options accepted by `analyse`.
#[derive(Debug, Args, Clone)]
pub struct AnalyseCommand {
    /// Vertex count.
    #[arg(short = 'v', long)]
    pub vertices: usize,

    /// Edge count, clamped to the simple-graph maximum.
    #[arg(short = 'e', long)]
    pub edges: usize,

    /// Generator seed.
    #[arg(short = 's', long, default_value_t = DEFAULT_SEED, allow_negative_numbers = true)]
    pub seed: i64,

    /// Analysis to run.
    #[arg(short = 'a', long, default_value = "EULER")]
    pub algorithm: String,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The server could not be configured or started.
    #[error(transparent)]
    Server(#[from] ServerError),
    /// Talking to a server failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A request option was rejected.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Building or analysing the graph failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The interrupt handler could not be installed.
    #[error("failed to wait for the interrupt signal: {source}")]
    Signal {
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Stable code of the underlying error, when it has one.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Server(err) => Some(err.code().as_str()),
            Self::Client(err) => Some(err.code().as_str()),
            Self::Parse(err) => Some(err.code().as_str()),
            Self::Graph(err) => Some(err.code().as_str()),
            Self::Signal { .. } => None,
        }
    }
}

/// Local analysis printed by `analyse`.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Degrees, connectivity and Euler verdict.
    pub summary: GraphSummary,
    /// The reply a server would send for the same request.
    pub response: String,
}

/// Result of executing a CLI command.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The server ran and was shut down.
    Served(ShutdownReport),
    /// A server replied.
    Reply(String),
    /// A graph was analysed locally.
    Analysis(Analysis),
}

/// Executes `cli`. `serve` blocks until the process is interrupted.
///
/// # Errors
/// Returns [`CliError`] when the command fails.
pub fn run_cli(cli: Cli) -> Result<Outcome, CliError> {
    match cli.command {
        Command::Serve(command) => {
            serve_until(&command, |_| wait_for_interrupt()).map(Outcome::Served)
        }
        Command::Request(command) => run_request(&command).map(Outcome::Reply),
        Command::Analyse(command) => run_analyse(&command).map(Outcome::Analysis),
    }
}

fn server_config(command: &ServeCommand) -> Result<ServerConfig, ServerError> {
    ServerConfig::builder()
        .with_model(command.model.into())
        .with_pool_size(command.workers)
        .with_ingest_workers(command.ingest_workers)
        .with_read_timeout(Duration::from_secs(command.read_timeout_secs))
        .with_limits(RequestLimits {
            max_vertices: command.max_vertices,
            max_edges: command.max_edges,
        })
        .build()
}

/// Runs the server described by `command` until `until` returns, then shuts
/// it down. `until` receives the bound address.
///
/// # Errors
/// Returns [`CliError::Server`] when the server cannot start and whatever
/// `until` returns.
#[instrument(
    name = "cli.serve",
    err,
    skip(command, until),
    fields(port = command.port, model = ?command.model)
)]
pub fn serve_until<F>(command: &ServeCommand, until: F) -> Result<ShutdownReport, CliError>
where
    F: FnOnce(SocketAddr) -> Result<(), CliError>,
{
    let config = server_config(command)?;
    let handle = Server::bind((command.host.as_str(), command.port), config)?.spawn()?;
    let waited = until(handle.local_addr());
    let report = handle.shutdown();
    waited?;
    Ok(report)
}

fn wait_for_interrupt() -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| CliError::Signal { source })?;
    runtime
        .block_on(tokio::signal::ctrl_c())
        .map_err(|source| CliError::Signal { source })?;
    info!("received interrupt, shutting down");
    Ok(())
}

fn run_request(command: &RequestCommand) -> Result<String, CliError> {
    let addr = format!("{}:{}", command.host, command.port);
    let payload = command.payload.join(" ");
    Ok(send_request(
        &addr,
        &payload,
        Duration::from_secs(command.timeout_secs),
    )?)
}

fn run_analyse(command: &AnalyseCommand) -> Result<Analysis, CliError> {
    let algorithm: Algorithm = command
        .algorithm
        .parse()
        .map_err(|UnknownAlgorithm(name)| ParseError::UnknownAlgorithm { name })?;
    let request = Request {
        edges: command.edges,
        vertices: command.vertices,
        seed: command.seed,
        algorithm,
    };
    let graph = request.generate()?;
    let response = respond(&request, &graph)?;
    Ok(Analysis {
        summary: GraphSummary::of(&graph),
        response,
    })
}

/// Renders `outcome` to `writer`.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
///
/// # Examples
/// ```
/// use graphwork_cli::cli::{Outcome, render_outcome};
///
/// let mut buffer = Vec::new();
/// render_outcome(&Outcome::Reply("SERVER_SHUTDOWN".into()), &mut buffer)?;
/// assert_eq!(buffer, b"server shut down before answering\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_outcome(outcome: &Outcome, mut writer: impl Write) -> io::Result<()> {
    match outcome {
        Outcome::Served(report) => writeln!(
            writer,
            "server stopped ({} waiting and {} remaining connections notified)",
            report.pending, report.remaining
        ),
        Outcome::Reply(reply) if reply == SHUTDOWN_NOTICE => {
            writeln!(writer, "server shut down before answering")
        }
        Outcome::Reply(reply) => writeln!(writer, "{reply}"),
        Outcome::Analysis(analysis) => {
            writeln!(writer, "{}", analysis.summary)?;
            writeln!(writer, "{}", analysis.response)
        }
    }
}
