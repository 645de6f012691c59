//! Remote size probe trait definition.
//!
//! Used by the progress aggregator to estimate how far along a stalled
//! download is. The probe is strictly best-effort: every failure mode maps
//! to `None`, and the caller degrades its display rather than erroring.

use async_trait::async_trait;

/// Best-effort lookup of a remote resource's size.
#[async_trait]
pub trait SizeProbe: Send + Sync {
    /// Size in bytes of the resource at `url`, or `None` when it cannot be
    /// determined (network failure, missing header, zero length).
    async fn content_length(&self, url: &str) -> Option<u64>;
}
