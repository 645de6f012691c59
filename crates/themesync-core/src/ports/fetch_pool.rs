//! Fetch pool trait definitions.
//!
//! This port abstracts the bounded worker pool that runs one external fetch
//! per theme. The engine never talks to processes directly; it launches a
//! pool, drains the merged progress stream line by line, and asks how the
//! pool terminated once the stream closes. Tests substitute a scripted
//! in-memory implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::SyncTarget;

/// Errors surfaced by fetch pool implementations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A binary the pool needs could not be located.
    #[error("fetch pool binary not found: {reason}")]
    MissingBinary {
        /// Lookup failure detail.
        reason: String,
    },

    /// The pool process could not be started.
    #[error("failed to start fetch pool: {reason}")]
    SpawnFailed {
        /// Spawn failure detail.
        reason: String,
    },

    /// Reading the merged progress stream failed.
    #[error("failed to read fetch pool output: {reason}")]
    StreamRead {
        /// Read failure detail.
        reason: String,
    },

    /// Collecting the pool's exit status failed.
    #[error("failed to collect fetch pool status: {reason}")]
    WaitFailed {
        /// Wait failure detail.
        reason: String,
    },
}

impl PoolError {
    /// Create a missing-binary error.
    pub fn missing_binary(reason: impl Into<String>) -> Self {
        Self::MissingBinary {
            reason: reason.into(),
        }
    }

    /// Create a spawn-failed error.
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Create a stream-read error.
    pub fn stream_read(reason: impl Into<String>) -> Self {
        Self::StreamRead {
            reason: reason.into(),
        }
    }

    /// Create a wait-failed error.
    pub fn wait_failed(reason: impl Into<String>) -> Self {
        Self::WaitFailed {
            reason: reason.into(),
        }
    }
}

/// Everything a pool needs to start fetching.
#[derive(Debug, Clone)]
pub struct FetchPoolSpec {
    /// Which mirror tree the fetches belong to.
    pub target: SyncTarget,
    /// File listing the themes to fetch, one slug per line.
    pub queue_path: PathBuf,
    /// Maximum number of concurrent fetches. Must be positive.
    pub parallel: usize,
}

/// How the pool ended, observed after its output stream closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolTermination {
    /// Every fetch ran to completion and the pool exited cleanly.
    Normal,
    /// The pool had still not exited after the stream closed.
    StillRunning,
    /// The pool exited with a failure status.
    Failed {
        /// Exit code, or `None` when the pool was killed by a signal.
        code: Option<i32>,
    },
}

impl PoolTermination {
    /// Whether the pool terminated the way a healthy run does.
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Launcher for a bounded pool of external fetch workers.
#[async_trait]
pub trait FetchPool: Send + Sync {
    /// Start the pool described by `spec`.
    ///
    /// Returns a handle to the merged progress stream. At most
    /// `spec.parallel` fetches run at once; themes are consumed from the
    /// queue file in order as slots free up.
    async fn launch(&self, spec: &FetchPoolSpec) -> Result<Box<dyn FetchPoolHandle>, PoolError>;
}

/// Handle to a running fetch pool.
///
/// The stream is forward-only and not restartable: once `next_line` returns
/// `None` the only remaining operation is `finish`.
#[async_trait]
pub trait FetchPoolHandle: Send {
    /// Next line of the merged progress stream, or `None` at end of stream.
    async fn next_line(&mut self) -> Result<Option<String>, PoolError>;

    /// Consume the handle and report how the pool terminated.
    ///
    /// Call only after `next_line` has returned `None`.
    async fn finish(self: Box<Self>) -> Result<PoolTermination, PoolError>;
}
