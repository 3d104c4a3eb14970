//! Command-line interface for the graphwork job server.
//!
//! `serve` runs the server until interrupted, `request` sends one request
//! to a running server and `analyse` runs the same analysis in-process.

mod commands;

pub use commands::{
    AnalyseCommand, Analysis, Cli, CliError, Command, ModelArg, Outcome, RequestCommand,
    ServeCommand, render_outcome, run_cli, serve_until,
};
