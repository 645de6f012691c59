//! Run statistics and the orchestrator's result type.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counters accumulated over one sync run.
///
/// All counters are monotonically non-decreasing for the duration of a run;
/// `total` is fixed when the run is enqueued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of themes enqueued for this run.
    pub total: u64,
    /// Themes whose fetch succeeded.
    pub updated: u64,
    /// Themes whose fetch failed.
    pub failed: u64,
}

impl RunStats {
    /// Fresh stats for a run over `total` themes.
    #[must_use]
    pub const fn new(total: u64) -> Self {
        Self {
            total,
            updated: 0,
            failed: 0,
        }
    }

    /// Count one successful fetch.
    pub const fn record_updated(&mut self) {
        self.updated += 1;
    }

    /// Count one failed fetch.
    pub const fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Themes that have reached a terminal state, successful or not.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.updated + self.failed
    }

    /// Overall completion as a percentage of `total`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.completed() as f64 / self.total as f64
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} themes updated, {} failed",
            self.updated, self.total, self.failed
        )
    }
}

/// Result of one sync run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Unique identifier for this run (log correlation).
    pub run_id: Uuid,
    /// Final counters.
    pub stats: RunStats,
    /// Checkpoint in effect when the run finished (partial sync only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = RunStats::new(3);
        stats.record_updated();
        stats.record_failed();
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completed(), 2);
    }

    #[test]
    fn test_percent_complete() {
        let mut stats = RunStats::new(3);
        stats.record_updated();
        assert!((stats.percent_complete() - 33.333).abs() < 0.001);
    }

    #[test]
    fn test_percent_complete_empty_run() {
        let stats = RunStats::new(0);
        assert!(stats.percent_complete().abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_summary() {
        let mut stats = RunStats::new(5);
        stats.record_updated();
        stats.record_updated();
        stats.record_failed();
        assert_eq!(stats.to_string(), "2 of 5 themes updated, 1 failed");
    }
}
