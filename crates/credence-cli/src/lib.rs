//! Credence CLI library.
//!
//! Configuration loading, service wiring, command execution and output
//! formatting for the `credence` binary.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use backend::{Context, RetrieverBackend};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
