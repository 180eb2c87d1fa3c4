//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Price history could not be read.
    #[error("Invalid price history {path}: {reason}")]
    InvalidHistory {
        /// CSV file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Refusing to overwrite a file.
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
