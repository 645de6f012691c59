//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the engine's real adapters are wired
//! together: the xargs-backed fetch pool, the HTTP size probe, and the
//! mirror layout. Command handlers receive the composed context and
//! delegate to the engine.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use themesync_core::paths::MirrorLayout;
use themesync_sync::orchestrator::SyncDeps;
use themesync_sync::{HttpSizeProbe, XargsFetchPool};

use crate::error::CliError;

/// Bootstrap configuration for a sync command.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Root directory of the local mirror.
    pub root: PathBuf,
    /// Fetch worker command the pool runs once per theme.
    pub fetch_command: PathBuf,
}

/// Fully composed context for sync command handlers.
pub struct CliContext {
    /// The engine's collaborators.
    pub deps: SyncDeps,
    /// Cancellation fired on Ctrl+C.
    pub cancel: CancellationToken,
}

/// Compose the real adapters for a sync run.
///
/// Ctrl+C is wired to the returned context's cancellation token so an
/// interrupted run aborts at the next event boundary and reaps its pool.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let pool = XargsFetchPool::new(config.fetch_command)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let deps = SyncDeps {
        pool: Arc::new(pool),
        probe: Arc::new(HttpSizeProbe::new()),
        layout: MirrorLayout::new(config.root),
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, aborting sync");
                cancel.cancel();
            }
        });
    }

    Ok(CliContext { deps, cancel })
}
