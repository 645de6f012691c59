//! Revision ledger for coordinating partial-sync checkpoint advancement.
//!
//! This module provides a pure state tracker that accumulates per-theme
//! completion events and retires upstream revisions from the front of the
//! queue as their pending sets drain. No I/O happens here; persisting the
//! checkpoint is the caller's job.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use themesync_core::domain::{RevisionBatch, ThemeSlug};

/// Ordered ledger of not-yet-synced upstream revisions.
///
/// Records are kept oldest-first and keyed by revision number; the
/// theme-to-revisions index stores revision numbers, never positions, so
/// retiring a record can never invalidate the index.
///
/// INVARIANT: only the frontmost record may be removed, and only once its
/// pending set is empty. A later revision whose themes all finished early
/// stays in the ledger until every older record has also drained, which
/// keeps the checkpoint a contiguous prefix of fully-downloaded history.
#[derive(Debug)]
pub struct RevisionLedger {
    /// Pending revisions, oldest first.
    pending: IndexMap<u64, BTreeSet<ThemeSlug>>,
    /// Which revisions still await a given theme. Built once at
    /// construction; consulted, never rebuilt, during the run.
    interested: HashMap<ThemeSlug, Vec<u64>>,
    /// Highest fully retired revision number.
    checkpoint: u64,
}

impl RevisionLedger {
    /// Build a ledger from revision batches ordered oldest-first.
    ///
    /// `base_checkpoint` is the persisted checkpoint in effect when the
    /// batches were computed; it is what `checkpoint()` reports until the
    /// first retirement.
    pub fn new(
        batches: impl IntoIterator<Item = RevisionBatch>,
        base_checkpoint: u64,
    ) -> Self {
        let mut pending: IndexMap<u64, BTreeSet<ThemeSlug>> = IndexMap::new();
        let mut interested: HashMap<ThemeSlug, Vec<u64>> = HashMap::new();

        for batch in batches {
            for theme in &batch.themes {
                interested
                    .entry(theme.clone())
                    .or_default()
                    .push(batch.number);
            }
            pending.entry(batch.number).or_default().extend(batch.themes);
        }

        Self {
            pending,
            interested,
            checkpoint: base_checkpoint,
        }
    }

    /// The highest fully retired revision number.
    #[must_use]
    pub const fn checkpoint(&self) -> u64 {
        self.checkpoint
    }

    /// Number of revisions still awaiting at least one retirement pass.
    #[must_use]
    pub fn pending_revisions(&self) -> usize {
        self.pending.len()
    }

    /// Whether every revision has been retired.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the oldest pending revision is still waiting on `theme`.
    #[must_use]
    pub fn awaiting_oldest(&self, theme: &ThemeSlug) -> bool {
        self.pending
            .first()
            .is_some_and(|(_, themes)| themes.contains(theme))
    }

    /// Record a terminal event for `theme`, clearing it from every revision
    /// that still awaits it.
    ///
    /// Both success and failure are terminal: a permanently failed theme
    /// does not hold the checkpoint back (it is recorded in the failure log
    /// instead). Idempotent; unknown themes are a no-op.
    pub fn complete_item(&mut self, theme: &ThemeSlug) {
        if let Some(numbers) = self.interested.get(theme) {
            for number in numbers {
                if let Some(themes) = self.pending.get_mut(number) {
                    themes.remove(theme);
                }
            }
        }
    }

    /// Retire drained revisions from the front of the queue.
    ///
    /// Advances the checkpoint to each retired revision's number and stops
    /// at the first record still waiting on a theme. Returns the new
    /// checkpoint iff it advanced.
    pub fn retire_ready(&mut self) -> Option<u64> {
        let mut advanced = false;
        while let Some((&number, themes)) = self.pending.first() {
            if !themes.is_empty() {
                break;
            }
            self.pending.shift_remove_index(0);
            self.checkpoint = number;
            advanced = true;
        }
        advanced.then_some(self.checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> ThemeSlug {
        ThemeSlug::new(s).unwrap()
    }

    fn batch(number: u64, themes: &[&str]) -> RevisionBatch {
        RevisionBatch::new(number, themes.iter().map(|s| slug(s)))
    }

    #[test]
    fn test_strict_fifo_retirement() {
        // Revisions [{10, {A,B}}, {20, {B,C}}] with events done(B), done(A),
        // done(C): nothing retires, then 10, then 20.
        let mut ledger = RevisionLedger::new(
            [batch(10, &["theme-a", "theme-b"]), batch(20, &["theme-b", "theme-c"])],
            0,
        );

        ledger.complete_item(&slug("theme-b"));
        assert_eq!(ledger.retire_ready(), None);
        assert_eq!(ledger.checkpoint(), 0);

        ledger.complete_item(&slug("theme-a"));
        assert_eq!(ledger.retire_ready(), Some(10));
        assert_eq!(ledger.checkpoint(), 10);

        ledger.complete_item(&slug("theme-c"));
        assert_eq!(ledger.retire_ready(), Some(20));
        assert_eq!(ledger.checkpoint(), 20);
        assert!(ledger.is_drained());
    }

    #[test]
    fn test_later_revision_waits_for_earlier() {
        let mut ledger = RevisionLedger::new([batch(10, &["slow"]), batch(20, &["fast"])], 0);

        // The newer revision drains first but must not retire.
        ledger.complete_item(&slug("fast"));
        assert_eq!(ledger.retire_ready(), None);
        assert_eq!(ledger.checkpoint(), 0);

        // Once the older one drains, both retire in one pass.
        ledger.complete_item(&slug("slow"));
        assert_eq!(ledger.retire_ready(), Some(20));
    }

    #[test]
    fn test_checkpoint_is_monotonic() {
        let mut ledger =
            RevisionLedger::new([batch(5, &["a"]), batch(6, &["b"]), batch(9, &["c"])], 3);

        let mut last = ledger.checkpoint();
        for theme in ["b", "a", "c"] {
            ledger.complete_item(&slug(theme));
            ledger.retire_ready();
            assert!(ledger.checkpoint() >= last);
            last = ledger.checkpoint();
        }
        assert_eq!(last, 9);
    }

    #[test]
    fn test_base_checkpoint_reported_until_first_retirement() {
        let ledger = RevisionLedger::new([batch(100, &["a"])], 42);
        assert_eq!(ledger.checkpoint(), 42);
    }

    #[test]
    fn test_complete_is_idempotent_and_tolerates_unknown_themes() {
        let mut ledger = RevisionLedger::new([batch(10, &["a", "b"])], 0);

        ledger.complete_item(&slug("a"));
        ledger.complete_item(&slug("a"));
        ledger.complete_item(&slug("never-enqueued"));
        assert_eq!(ledger.retire_ready(), None);

        ledger.complete_item(&slug("b"));
        assert_eq!(ledger.retire_ready(), Some(10));
    }

    #[test]
    fn test_shared_theme_clears_every_interested_revision() {
        let mut ledger = RevisionLedger::new(
            [batch(1, &["shared"]), batch(2, &["shared", "other"])],
            0,
        );

        ledger.complete_item(&slug("shared"));
        assert_eq!(ledger.retire_ready(), Some(1));

        ledger.complete_item(&slug("other"));
        assert_eq!(ledger.retire_ready(), Some(2));
    }

    #[test]
    fn test_empty_batch_retires_on_next_pass() {
        let mut ledger = RevisionLedger::new([batch(7, &[]), batch(8, &["a"])], 0);

        ledger.complete_item(&slug("a"));
        assert_eq!(ledger.retire_ready(), Some(8));
    }

    #[test]
    fn test_awaiting_oldest_tracks_the_front_record() {
        let mut ledger = RevisionLedger::new([batch(10, &["a"]), batch(20, &["b"])], 0);

        assert!(ledger.awaiting_oldest(&slug("a")));
        assert!(!ledger.awaiting_oldest(&slug("b")));

        ledger.complete_item(&slug("a"));
        ledger.retire_ready();
        assert!(ledger.awaiting_oldest(&slug("b")));
    }

    #[test]
    fn test_drained_ledger_never_advances_again() {
        let mut ledger = RevisionLedger::new([batch(10, &["a"])], 0);
        ledger.complete_item(&slug("a"));
        assert_eq!(ledger.retire_ready(), Some(10));
        assert_eq!(ledger.retire_ready(), None);
        assert_eq!(ledger.checkpoint(), 10);
    }
}
