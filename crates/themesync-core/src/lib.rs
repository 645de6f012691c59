//! Core domain types and port definitions for themesync.
//!
//! This crate holds everything the sync engine and the CLI adapter share:
//! the domain vocabulary (theme slugs, sync targets, revision batches, run
//! statistics), the ports that adapters implement (fetch pool, size probe),
//! and the on-disk mirror layout (checkpoint, download queue, failure log).
//!
//! No adapter concerns live here - nothing in this crate spawns processes,
//! opens sockets, or parses command lines.

pub mod domain;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    RevisionBatch, RunStats, SlugError, SyncOutcome, SyncTarget, ThemeSlug, UnknownTarget,
};
pub use paths::{
    CHECKPOINT_FILE, FAILURE_LOG_FILE, MirrorLayout, PathError, QUEUE_FILE,
};
pub use ports::{FetchPool, FetchPoolHandle, FetchPoolSpec, PoolError, PoolTermination, SizeProbe};
