//! Mirror tree layout and the bookkeeping files each target carries.
//!
//! Every sync target owns one directory under the mirror root with three
//! well-known dotfiles: the checkpoint (`.last-revision`), the download
//! queue handed to the fetch pool (`.to_download`), and the append-only
//! failure log (`.failed_downloads`).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::{SyncTarget, ThemeSlug};

use super::error::PathError;

/// Checkpoint file name: the highest fully synced revision, `"<n>\n"`.
pub const CHECKPOINT_FILE: &str = ".last-revision";
/// Download queue file name: one theme slug per line.
pub const QUEUE_FILE: &str = ".to_download";
/// Failure log file name: one theme slug per line, append-only.
pub const FAILURE_LOG_FILE: &str = ".failed_downloads";

/// Resolves paths inside the local mirror and owns its bookkeeping files.
#[derive(Debug, Clone)]
pub struct MirrorLayout {
    root: PathBuf,
}

impl MirrorLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The mirror root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `target`'s tree.
    #[must_use]
    pub fn target_dir(&self, target: SyncTarget) -> PathBuf {
        self.root.join(target.directory())
    }

    /// Path of `target`'s checkpoint file.
    #[must_use]
    pub fn checkpoint_path(&self, target: SyncTarget) -> PathBuf {
        self.target_dir(target).join(CHECKPOINT_FILE)
    }

    /// Path of `target`'s download queue file.
    #[must_use]
    pub fn queue_path(&self, target: SyncTarget) -> PathBuf {
        self.target_dir(target).join(QUEUE_FILE)
    }

    /// Path of `target`'s failure log.
    #[must_use]
    pub fn failure_log_path(&self, target: SyncTarget) -> PathBuf {
        self.target_dir(target).join(FAILURE_LOG_FILE)
    }

    /// Ensure `target`'s directory exists.
    pub fn ensure_target_dir(&self, target: SyncTarget) -> Result<(), PathError> {
        let dir = self.target_dir(target);
        if dir.exists() {
            if !dir.is_dir() {
                return Err(PathError::NotADirectory(dir));
            }
            return Ok(());
        }
        fs::create_dir_all(&dir).map_err(|e| PathError::CreateFailed {
            path: dir,
            reason: e.to_string(),
        })
    }

    /// Read `target`'s checkpoint. A missing file means nothing has been
    /// synced yet and reads as revision 0.
    pub fn read_checkpoint(&self, target: SyncTarget) -> Result<u64, PathError> {
        let path = self.checkpoint_path(target);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(PathError::CheckpointRead {
                    path,
                    reason: e.to_string(),
                });
            }
        };
        content
            .trim()
            .parse()
            .map_err(|_| PathError::CheckpointParse {
                path,
                value: content.trim().to_string(),
            })
    }

    /// Replace `target`'s checkpoint with `revision`.
    ///
    /// Written to a temp file in the same directory and renamed into place,
    /// so a reader never observes a partially written checkpoint.
    pub fn write_checkpoint(&self, target: SyncTarget, revision: u64) -> Result<(), PathError> {
        let path = self.checkpoint_path(target);
        let write = || -> std::io::Result<()> {
            let mut file = NamedTempFile::new_in(self.target_dir(target))?;
            writeln!(file, "{revision}")?;
            file.persist(&path).map_err(|e| e.error)?;
            Ok(())
        };
        write().map_err(|e| PathError::CheckpointWrite {
            path: self.checkpoint_path(target),
            reason: e.to_string(),
        })?;
        tracing::debug!(target_dir = target.directory(), revision, "checkpoint written");
        Ok(())
    }

    /// Write the download queue for `target`, one slug per line, and return
    /// its path.
    pub fn write_queue(
        &self,
        target: SyncTarget,
        themes: &[ThemeSlug],
    ) -> Result<PathBuf, PathError> {
        let path = self.queue_path(target);
        let mut content = String::new();
        for theme in themes {
            content.push_str(theme.as_str());
            content.push('\n');
        }
        fs::write(&path, content).map_err(|e| PathError::QueueWrite {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(path)
    }

    /// Append one failed theme to `target`'s failure log.
    pub fn append_failure(&self, target: SyncTarget, theme: &ThemeSlug) -> Result<(), PathError> {
        let path = self.failure_log_path(target);
        let append = || -> std::io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            writeln!(file, "{theme}")?;
            Ok(())
        };
        append().map_err(|e| PathError::FailureLogAppend {
            path,
            reason: e.to_string(),
        })
    }
}
