//! Sync run orchestration.
//!
//! Drives the full sequence: write the download queue, launch the fetch
//! pool, loop over decoded progress events feeding the ledger and the
//! aggregator, render one status line per terminal event, and validate the
//! pool's exit once the stream closes.
//!
//! # Concurrency Model
//!
//! The event loop is a single consumer: it blocks on the next stream line,
//! processes it synchronously, and never runs two handlers concurrently,
//! so ledger and aggregator mutation needs no locking. The pool's workers
//! are the only parallel part of a run.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use themesync_core::domain::{RevisionBatch, RunStats, SyncOutcome, SyncTarget, ThemeSlug};
use themesync_core::paths::{MirrorLayout, PathError};
use themesync_core::ports::{FetchPool, FetchPoolSpec, PoolError, PoolTermination, SizeProbe};

use crate::ledger::RevisionLedger;
use crate::progress::{ProgressAggregator, StatusLabel};
use crate::protocol::{FetchEvent, ProtocolError, parse_line};

// ============================================================================
// Error Types
// ============================================================================

/// Fatal conditions that abort a sync run.
///
/// Individual fetch failures are not errors at this level; they are counted
/// in [`RunStats`] and logged to the failure log.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The progress stream violated the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A fetch worker reported an unrecoverable condition.
    #[error("error from download worker: {0}")]
    Worker(String),

    /// The fetch pool could not be launched or read.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The pool had still not exited after its output stream closed.
    #[error("download pool still running after its output stream closed")]
    PoolStillRunning,

    /// The pool exited with a failure status.
    #[error("unexpected download pool exit code: {code}")]
    PoolExited {
        /// The pool's exit code.
        code: i32,
    },

    /// The pool was killed by a signal.
    #[error("download pool terminated by signal")]
    PoolSignaled,

    /// A mirror bookkeeping file could not be maintained.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The run was cancelled before the stream ended.
    #[error("sync cancelled")]
    Cancelled,
}

// ============================================================================
// Request Types
// ============================================================================

/// What a run should do when revisions are involved.
#[derive(Debug, Clone)]
pub enum SyncMode {
    /// Plain re-download; no ledger, no checkpoint.
    Full,
    /// Revision-driven sync: retire `revisions` front-to-back and advance
    /// the checkpoint as they drain.
    Partial {
        /// Revision batches, oldest first.
        revisions: Vec<RevisionBatch>,
    },
}

impl SyncMode {
    /// Whether this run maintains the revision ledger.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

/// One sync run, fully described.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Which mirror tree to sync.
    pub target: SyncTarget,
    /// Themes to fetch, in enqueue order.
    pub themes: Vec<ThemeSlug>,
    /// Full or revision-driven.
    pub mode: SyncMode,
    /// Maximum concurrent fetches.
    pub parallel: usize,
    /// External cancellation. A run aborts at the next event boundary once
    /// this fires.
    pub cancel: CancellationToken,
}

/// The collaborators a run needs.
pub struct SyncDeps {
    /// Worker pool launcher.
    pub pool: Arc<dyn FetchPool>,
    /// Remote size probe for stall reporting.
    pub probe: Arc<dyn SizeProbe>,
    /// Mirror tree layout.
    pub layout: MirrorLayout,
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run one sync to completion.
///
/// Returns final statistics on success. Any fatal error aborts the run with
/// no partial statistics; successes already written to the mirror (and the
/// checkpoint advances already persisted) are kept.
pub async fn run_sync(request: SyncRequest, deps: &SyncDeps) -> Result<SyncOutcome, SyncError> {
    let run_id = Uuid::new_v4();
    let total = request.themes.len() as u64;
    tracing::info!(
        %run_id,
        target_dir = request.target.directory(),
        total,
        partial = request.mode.is_partial(),
        "sync run starting"
    );

    deps.layout.ensure_target_dir(request.target)?;

    let mut ledger = match &request.mode {
        SyncMode::Partial { revisions } => Some(RevisionLedger::new(
            revisions.iter().cloned(),
            deps.layout.read_checkpoint(request.target)?,
        )),
        SyncMode::Full => None,
    };

    if request.themes.is_empty() {
        tracing::info!(%run_id, "nothing to download");
        return Ok(SyncOutcome {
            run_id,
            stats: RunStats::new(0),
            checkpoint: ledger.map(|ledger| ledger.checkpoint()),
        });
    }

    let queue_path = deps.layout.write_queue(request.target, &request.themes)?;
    let spec = FetchPoolSpec {
        target: request.target,
        queue_path,
        parallel: request.parallel.max(1),
    };
    let mut handle = deps.pool.launch(&spec).await?;
    let mut aggregator = ProgressAggregator::new(total);

    loop {
        let line = tokio::select! {
            biased;

            () = request.cancel.cancelled() => {
                // Dropping the handle reaps the pool.
                return Err(SyncError::Cancelled);
            }

            line = handle.next_line() => line?,
        };
        let Some(line) = line else { break };

        match parse_line(&line)? {
            FetchEvent::Start {
                theme,
                download_path,
                download_url,
            } => {
                aggregator.on_start(theme, download_path, download_url, Instant::now());
            }

            FetchEvent::Done { theme } => {
                aggregator.note_done(&theme);
                let suffix = after_terminal(&theme, ledger.as_mut(), &mut aggregator, deps, &request).await?;
                println!(
                    "{}",
                    aggregator.render_line(StatusLabel::Updated, &theme, suffix.as_deref())
                );
            }

            FetchEvent::Fail { theme } => {
                aggregator.note_fail(&theme);
                deps.layout.append_failure(request.target, &theme)?;
                let suffix = after_terminal(&theme, ledger.as_mut(), &mut aggregator, deps, &request).await?;
                println!(
                    "{}",
                    aggregator.render_line(StatusLabel::Failed, &theme, suffix.as_deref())
                );
            }

            FetchEvent::Error { details } => {
                return Err(SyncError::Worker(details));
            }
        }
    }

    match handle.finish().await? {
        PoolTermination::Normal => {}
        PoolTermination::StillRunning => return Err(SyncError::PoolStillRunning),
        PoolTermination::Failed { code: Some(code) } => {
            return Err(SyncError::PoolExited { code });
        }
        PoolTermination::Failed { code: None } => return Err(SyncError::PoolSignaled),
    }

    let stats = aggregator.stats();
    let checkpoint = ledger.as_ref().map(RevisionLedger::checkpoint);
    tracing::info!(
        %run_id,
        updated = stats.updated,
        failed = stats.failed,
        checkpoint,
        "sync run complete"
    );
    Ok(SyncOutcome {
        run_id,
        stats,
        checkpoint,
    })
}

/// Ledger upkeep after a terminal event: clear the theme, retire drained
/// revisions, persist any checkpoint advance, and pick the line suffix -
/// the checkpoint note when it advanced, otherwise possible stall info.
async fn after_terminal(
    theme: &ThemeSlug,
    ledger: Option<&mut RevisionLedger>,
    aggregator: &mut ProgressAggregator,
    deps: &SyncDeps,
    request: &SyncRequest,
) -> Result<Option<String>, SyncError> {
    let Some(ledger) = ledger else {
        return Ok(None);
    };

    ledger.complete_item(theme);
    if let Some(checkpoint) = ledger.retire_ready() {
        deps.layout.write_checkpoint(request.target, checkpoint)?;
        tracing::info!(checkpoint, "local copy advanced");
        return Ok(Some(format!("-> local copy now at r{checkpoint}")));
    }

    let ledger = &*ledger;
    Ok(aggregator
        .stall_suffix(
            |candidate| ledger.awaiting_oldest(candidate),
            deps.probe.as_ref(),
            Instant::now(),
        )
        .await)
}
