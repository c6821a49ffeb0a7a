//! CLI module
//!
//! Provides:
//! - Argument parsing for the fix and compile-patch commands
//! - Logging setup
//! - Command dispatch with deterministic exit codes

pub mod args;
pub mod dispatch;
pub mod logging;

// Re-exports
pub use args::{parse_args, Args, Command};
pub use dispatch::{run_cli_mode, run_command, ExitCode};
pub use logging::init_logging;

use crate::config::ConfigError;
use crate::fixer::FixerError;
use crate::llm::adapters::AdapterError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Missing parameters. {0}")]
    MissingArgument(String),

    #[error("{0}")]
    UnsupportedModel(String),

    #[error("{0}")]
    InvalidMode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Backend(#[from] AdapterError),

    #[error("{0}")]
    Fixer(#[from] FixerError),

    #[error("{0} case(s) skipped for missing evidence")]
    IncompleteRun(usize),
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
