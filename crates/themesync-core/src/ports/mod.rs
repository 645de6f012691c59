//! Ports - the seams where adapters plug into the engine.
//!
//! # Design Rules
//!
//! - Express **intent**, not implementation detail
//! - No process/HTTP/CLI concerns in signatures
//! - Must support: the real xargs-backed pool, a scripted in-memory pool
//!   for tests, alternative probe transports

mod fetch_pool;
mod size_probe;

pub use fetch_pool::{FetchPool, FetchPoolHandle, FetchPoolSpec, PoolError, PoolTermination};
pub use size_probe::SizeProbe;
