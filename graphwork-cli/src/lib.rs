//! Support library for the graphwork CLI binary.
//!
//! Exposes the command and logging modules so tests can drive commands
//! without spawning a process.

pub mod cli;
pub mod logging;
