//! Parallel download orchestration engine for themesync.
//!
//! A sync run fans per-theme fetches out to a bounded pool of external
//! workers, consumes their merged newline-delimited JSON progress stream,
//! maintains the partial-sync revision ledger, and renders one status line
//! per event. The hexagonal seams (pool, size probe) live in
//! `themesync-core`; this crate provides the engine and the real adapters.

pub mod ledger;
pub mod orchestrator;
pub mod pool;
pub mod probe;
pub mod progress;
pub mod protocol;
pub mod testing;

pub use ledger::RevisionLedger;
pub use orchestrator::{SyncDeps, SyncError, SyncMode, SyncRequest, run_sync};
pub use pool::XargsFetchPool;
pub use probe::HttpSizeProbe;
pub use progress::{ProgressAggregator, STALL_THRESHOLD, StatusLabel};
pub use protocol::{FetchEvent, ProtocolError, parse_line};
