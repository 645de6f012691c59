//! Test doubles for the engine's ports.
//!
//! Used by this crate's own tests and available to downstream crates that
//! want to exercise the orchestrator without real subprocesses or network
//! access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use themesync_core::ports::{
    FetchPool, FetchPoolHandle, FetchPoolSpec, PoolError, PoolTermination, SizeProbe,
};

/// In-memory fetch pool that replays a scripted progress stream.
///
/// The script is shared with every handle the pool hands out, so a test can
/// observe how much of the stream the orchestrator consumed before
/// aborting.
pub struct ScriptedFetchPool {
    lines: Arc<Mutex<VecDeque<String>>>,
    termination: PoolTermination,
    launches: Arc<AtomicUsize>,
}

impl ScriptedFetchPool {
    /// Pool that replays `lines` and then terminates as `termination`.
    pub fn new(
        lines: impl IntoIterator<Item = impl Into<String>>,
        termination: PoolTermination,
    ) -> Self {
        Self {
            lines: Arc::new(Mutex::new(lines.into_iter().map(Into::into).collect())),
            termination,
            launches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Pool that replays `lines` and terminates normally.
    pub fn normal(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(lines, PoolTermination::Normal)
    }

    /// Lines the orchestrator has not consumed.
    pub fn remaining(&self) -> usize {
        self.lines.lock().expect("script lock poisoned").len()
    }

    /// How many times the pool was launched.
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchPool for ScriptedFetchPool {
    async fn launch(&self, _spec: &FetchPoolSpec) -> Result<Box<dyn FetchPoolHandle>, PoolError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedHandle {
            lines: Arc::clone(&self.lines),
            termination: self.termination,
        }))
    }
}

struct ScriptedHandle {
    lines: Arc<Mutex<VecDeque<String>>>,
    termination: PoolTermination,
}

#[async_trait]
impl FetchPoolHandle for ScriptedHandle {
    async fn next_line(&mut self) -> Result<Option<String>, PoolError> {
        Ok(self.lines.lock().expect("script lock poisoned").pop_front())
    }

    async fn finish(self: Box<Self>) -> Result<PoolTermination, PoolError> {
        Ok(self.termination)
    }
}

/// Size probe that always answers with the same value.
pub struct StaticSizeProbe {
    size: Option<u64>,
}

impl StaticSizeProbe {
    /// Probe answering `size` for every URL.
    #[must_use]
    pub const fn new(size: Option<u64>) -> Self {
        Self { size }
    }
}

#[async_trait]
impl SizeProbe for StaticSizeProbe {
    async fn content_length(&self, _url: &str) -> Option<u64> {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use themesync_core::domain::SyncTarget;

    #[tokio::test]
    async fn test_scripted_pool_replays_and_tracks_consumption() {
        let pool = ScriptedFetchPool::normal(["one", "two"]);
        let spec = FetchPoolSpec {
            target: SyncTarget::Themes,
            queue_path: "unused".into(),
            parallel: 1,
        };

        let mut handle = pool.launch(&spec).await.unwrap();
        assert_eq!(handle.next_line().await.unwrap().as_deref(), Some("one"));
        assert_eq!(pool.remaining(), 1);
        assert_eq!(handle.next_line().await.unwrap().as_deref(), Some("two"));
        assert_eq!(handle.next_line().await.unwrap(), None);
        assert!(handle.finish().await.unwrap().is_normal());
        assert_eq!(pool.launches(), 1);
    }
}
