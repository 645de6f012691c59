//! CLI-specific error types and mappings.
//!
//! This module maps engine errors to exit codes and user-facing one-line
//! diagnostics.

use thiserror::Error;

use themesync_core::paths::PathError;
use themesync_sync::SyncError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing/validation error.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error (missing binaries, bad environment).
    #[error("configuration error: {0}")]
    Config(String),

    /// Fatal sync engine error.
    #[error("{0}")]
    Sync(String),

    /// The run was interrupted by the operator.
    #[error("interrupted")]
    Interrupted,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    /// - 130: Interrupted (128 + SIGINT)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2,  // EX_USAGE
            Self::Io(_) => 74,        // EX_IOERR
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Sync(_) => 1,
            Self::Interrupted => 130,
        }
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Cancelled => Self::Interrupted,
            other => Self::Sync(other.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
