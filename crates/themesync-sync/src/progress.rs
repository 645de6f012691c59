//! Progress aggregation and status line rendering.
//!
//! Pure bookkeeping plus presentation: the aggregator owns the run
//! counters and the in-flight download map, and turns each terminal event
//! into one rendered status line. The only I/O it performs is the lazy,
//! best-effort stall probe (remote size via the [`SizeProbe`] port, local
//! size via file metadata).

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use themesync_core::domain::{RunStats, ThemeSlug};
use themesync_core::ports::SizeProbe;

// ============================================================================
// Constants
// ============================================================================

/// How long a fetch may run before the aggregator starts reporting it as
/// stalled and probing its remote size.
pub const STALL_THRESHOLD: Duration = Duration::from_secs(30);

/// Status lines longer than this get the primary slug truncated.
const MAX_LINE_WIDTH: usize = 100;

/// Shortest slug rendering worth keeping when a line is squeezed.
const MIN_SLUG_WIDTH: usize = 12;

// ============================================================================
// Types
// ============================================================================

/// Fixed-width status token at the head of each line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLabel {
    /// The fetch succeeded.
    Updated,
    /// The fetch failed.
    Failed,
}

impl StatusLabel {
    /// The 4-character token rendered inside the brackets.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Updated => " OK ",
            Self::Failed => "FAIL",
        }
    }
}

/// One in-flight download, tracked from `start` to its terminal event.
#[derive(Debug)]
struct InProgressEntry {
    started: Instant,
    download_path: PathBuf,
    download_url: String,
    /// Remote size cache. Probed at most once per entry; a failed probe is
    /// cached as `None` so it is never retried.
    probed_size: Option<u64>,
    probe_attempted: bool,
}

/// Turns decoded fetch events into run counters and rendered status lines.
///
/// Exclusively owned by the event loop; all mutation is single-threaded.
pub struct ProgressAggregator {
    stats: RunStats,
    in_progress: IndexMap<ThemeSlug, InProgressEntry>,
}

impl ProgressAggregator {
    /// Aggregator for a run over `total` themes.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            stats: RunStats::new(total),
            in_progress: IndexMap::new(),
        }
    }

    /// Current counters.
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Number of downloads currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_progress.len()
    }

    /// Record a `start` event. A repeated start for the same theme resets
    /// its entry.
    pub fn on_start(
        &mut self,
        theme: ThemeSlug,
        download_path: PathBuf,
        download_url: String,
        now: Instant,
    ) {
        self.in_progress.insert(
            theme,
            InProgressEntry {
                started: now,
                download_path,
                download_url,
                probed_size: None,
                probe_attempted: false,
            },
        );
    }

    /// Record a successful fetch.
    pub fn note_done(&mut self, theme: &ThemeSlug) {
        self.stats.record_updated();
        self.in_progress.shift_remove(theme);
    }

    /// Record a failed fetch.
    pub fn note_fail(&mut self, theme: &ThemeSlug) {
        self.stats.record_failed();
        self.in_progress.shift_remove(theme);
    }

    /// Build the stall suffix for a tick on which the checkpoint did not
    /// advance.
    ///
    /// Scans the in-flight map for themes the oldest pending revision still
    /// awaits (per `awaiting_oldest`) that started more than
    /// [`STALL_THRESHOLD`] ago. Each qualifying entry gets its remote size
    /// probed once; the rendered suffix belongs to the last one found.
    /// Probe failures only degrade the suffix, never error.
    pub async fn stall_suffix<F>(
        &mut self,
        awaiting_oldest: F,
        probe: &dyn SizeProbe,
        now: Instant,
    ) -> Option<String>
    where
        F: Fn(&ThemeSlug) -> bool,
    {
        let mut suffix = None;
        for (theme, entry) in &mut self.in_progress {
            if !awaiting_oldest(theme) {
                continue;
            }
            if now.duration_since(entry.started) <= STALL_THRESHOLD {
                continue;
            }

            if !entry.probe_attempted {
                entry.probe_attempted = true;
                entry.probed_size = probe
                    .content_length(&entry.download_url)
                    .await
                    .filter(|size| *size > 0);
            }

            suffix = Some(match entry.probed_size {
                Some(size) => {
                    let local = fs::metadata(&entry.download_path)
                        .map(|meta| meta.len())
                        .unwrap_or(0);
                    format!("[{theme} {}%]", local.saturating_mul(100) / size)
                }
                None => format!("[{theme}]"),
            });
        }
        suffix
    }

    /// The overall-completion token: one decimal, right-aligned in 6
    /// columns (`"  0.0%"` through `"100.0%"`).
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:>6}", format!("{:.1}%", self.stats.percent_complete()))
    }

    /// Render one status line for a terminal event, with an optional
    /// checkpoint or stall suffix.
    #[must_use]
    pub fn render_line(
        &self,
        status: StatusLabel,
        theme: &ThemeSlug,
        suffix: Option<&str>,
    ) -> String {
        // "[ OK ] " + percent + two spaces.
        let fixed = 7 + 6 + 2;
        let budget = MAX_LINE_WIDTH
            .saturating_sub(fixed + suffix.map_or(0, |s| s.len() + 2))
            .max(MIN_SLUG_WIDTH);

        let mut line = format!(
            "[{}] {}  {}",
            status.token(),
            self.percent_label(),
            fit_slug(theme.as_str(), budget)
        );
        if let Some(suffix) = suffix {
            line.push_str("  ");
            line.push_str(suffix);
        }
        line
    }
}

/// Truncate a slug to at most `max` characters, ellipsizing the tail.
fn fit_slug(raw: &str, max: usize) -> String {
    let char_count = raw.chars().count();
    if char_count <= max {
        return raw.to_string();
    }
    let mut buf: String = raw.chars().take(max.saturating_sub(1)).collect();
    buf.push('…');
    buf
}

// ============================================================================
// Tests
// ============================================================================
