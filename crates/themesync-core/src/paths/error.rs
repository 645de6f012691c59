//! Path-related error types.
//!
//! Provides semantic errors for mirror filesystem operations without
//! exposing implementation details or adapter-specific concerns.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while maintaining the mirror tree.
#[derive(Debug, Error)]
pub enum PathError {
    /// A path was expected to be a directory but was not.
    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Failed to create a target directory.
    #[error("failed to create directory {}: {reason}", .path.display())]
    CreateFailed {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying failure detail.
        reason: String,
    },

    /// Failed to read the checkpoint file.
    #[error("failed to read checkpoint {}: {reason}", .path.display())]
    CheckpointRead {
        /// The checkpoint file.
        path: PathBuf,
        /// Underlying failure detail.
        reason: String,
    },

    /// The checkpoint file did not contain a revision number.
    #[error("checkpoint {} is not a revision number: {value:?}", .path.display())]
    CheckpointParse {
        /// The checkpoint file.
        path: PathBuf,
        /// The offending content.
        value: String,
    },

    /// Failed to replace the checkpoint file.
    #[error("failed to write checkpoint {}: {reason}", .path.display())]
    CheckpointWrite {
        /// The checkpoint file.
        path: PathBuf,
        /// Underlying failure detail.
        reason: String,
    },

    /// Failed to write the download queue file.
    #[error("failed to write download queue {}: {reason}", .path.display())]
    QueueWrite {
        /// The queue file.
        path: PathBuf,
        /// Underlying failure detail.
        reason: String,
    },

    /// Failed to append to the failure log.
    #[error("failed to append to failure log {}: {reason}", .path.display())]
    FailureLogAppend {
        /// The failure log file.
        path: PathBuf,
        /// Underlying failure detail.
        reason: String,
    },
}
