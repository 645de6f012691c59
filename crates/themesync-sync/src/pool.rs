//! xargs-backed fetch pool.
//!
//! The pool is one `xargs -n 1 -P <parallel>` process reading theme slugs
//! from the queue file and running the external fetch command once per
//! slug. Workers share the pool's stdout, which becomes the merged
//! progress stream; stderr passes straight through to the operator.

use std::process::Stdio;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::time::{Duration, timeout};

use themesync_core::ports::{FetchPool, FetchPoolHandle, FetchPoolSpec, PoolError, PoolTermination};

/// How long after stream close the pool gets to finish exiting before it is
/// reported as still running. Stream EOF and process exit are not atomic.
const REAP_GRACE: Duration = Duration::from_secs(5);

/// Fetch pool that fans out to an external fetch command via `xargs`.
pub struct XargsFetchPool {
    xargs_path: PathBuf,
    fetch_command: PathBuf,
}

impl XargsFetchPool {
    /// Build a pool around `fetch_command`, locating `xargs` on `PATH`.
    pub fn new(fetch_command: impl Into<PathBuf>) -> Result<Self, PoolError> {
        let xargs_path =
            which::which("xargs").map_err(|e| PoolError::missing_binary(e.to_string()))?;
        Ok(Self {
            xargs_path,
            fetch_command: fetch_command.into(),
        })
    }
}

#[async_trait]
impl FetchPool for XargsFetchPool {
    async fn launch(&self, spec: &FetchPoolSpec) -> Result<Box<dyn FetchPoolHandle>, PoolError> {
        let queue = std::fs::File::open(&spec.queue_path)
            .map_err(|e| PoolError::spawn_failed(format!("cannot open queue file: {e}")))?;

        let mut child = Command::new(&self.xargs_path)
            .arg("-n")
            .arg("1")
            .arg("-P")
            .arg(spec.parallel.to_string())
            .arg(&self.fetch_command)
            .arg(spec.target.fetch_arg())
            .stdin(Stdio::from(queue))
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PoolError::spawn_failed(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PoolError::spawn_failed("missing stdout pipe".to_string()))?;

        tracing::debug!(
            parallel = spec.parallel,
            fetch_command = %self.fetch_command.display(),
            "fetch pool started"
        );

        Ok(Box::new(XargsPoolHandle {
            child,
            lines: BufReader::new(stdout).lines(),
        }))
    }
}

struct XargsPoolHandle {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

#[async_trait]
impl FetchPoolHandle for XargsPoolHandle {
    async fn next_line(&mut self) -> Result<Option<String>, PoolError> {
        self.lines
            .next_line()
            .await
            .map_err(|e| PoolError::stream_read(e.to_string()))
    }

    async fn finish(mut self: Box<Self>) -> Result<PoolTermination, PoolError> {
        let Ok(status) = timeout(REAP_GRACE, self.child.wait()).await else {
            // Dropping the handle kills the process (kill_on_drop).
            return Ok(PoolTermination::StillRunning);
        };
        let status = status.map_err(|e| PoolError::wait_failed(e.to_string()))?;
        if status.success() {
            Ok(PoolTermination::Normal)
        } else {
            Ok(PoolTermination::Failed {
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use themesync_core::domain::SyncTarget;

    #[tokio::test]
    async fn test_pool_runs_command_once_per_queue_line() {
        let dir = tempfile::tempdir().unwrap();
        let queue_path = dir.path().join(".to_download");
        let mut queue = std::fs::File::create(&queue_path).unwrap();
        writeln!(queue, "alpha\nbeta").unwrap();
        drop(queue);

        // `echo` stands in for the fetch command: each invocation prints
        // the mode argument followed by one slug.
        let pool = XargsFetchPool::new("echo").unwrap();
        let spec = FetchPoolSpec {
            target: SyncTarget::Themes,
            queue_path,
            parallel: 2,
        };

        let mut handle = pool.launch(&spec).await.unwrap();
        let mut lines = Vec::new();
        while let Some(line) = handle.next_line().await.unwrap() {
            lines.push(line);
        }
        lines.sort();
        assert_eq!(lines, vec!["all alpha", "all beta"]);

        let termination = handle.finish().await.unwrap();
        assert!(termination.is_normal());
    }

    #[tokio::test]
    async fn test_pool_reports_missing_queue_file() {
        let pool = XargsFetchPool::new("echo").unwrap();
        let spec = FetchPoolSpec {
            target: SyncTarget::Themes,
            queue_path: PathBuf::from("/nonexistent/.to_download"),
            parallel: 1,
        };

        let err = match pool.launch(&spec).await {
            Ok(_) => panic!("expected launch to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, PoolError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn test_pool_reports_failing_workers() {
        let dir = tempfile::tempdir().unwrap();
        let queue_path = dir.path().join(".to_download");
        std::fs::write(&queue_path, "alpha\n").unwrap();

        // `false` exits 1, which xargs reports as an aggregate failure.
        let pool = XargsFetchPool::new("false").unwrap();
        let spec = FetchPoolSpec {
            target: SyncTarget::Themes,
            queue_path,
            parallel: 1,
        };

        let mut handle = pool.launch(&spec).await.unwrap();
        while let Some(_line) = handle.next_line().await.unwrap() {}

        let termination = handle.finish().await.unwrap();
        assert!(matches!(
            termination,
            PoolTermination::Failed { code: Some(_) }
        ));
    }
}
