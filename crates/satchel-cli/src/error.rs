//! Error handling for the Satchel CLI.
//!
//! A thin layer over the library error types: [`CliError`] adds the few
//! failure modes that originate in the CLI itself (bad arguments, unusable
//! working directory) and converts everything to miette reports at the
//! binary boundary.

use miette::Report;
use satchel_pack::{ConfigError, PackError};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The packaging pipeline failed
    #[error("Packaging error: {0}")]
    Pack(#[from] PackError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation found problems (check command with --strict)
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CliError`] as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] to a miette [`Report`].
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Pack(PackError::ResetFailed { command, status }) => miette::miette!(
            "Environment reset failed: `{command}` exited with {status}\n\n\
             Hint: the content tree must be restorable to its checked-in state;\n\
             a stale tree would silently produce a corrupt bundle"
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {e}"),
        _ => miette::miette!("{err}"),
    }
}
