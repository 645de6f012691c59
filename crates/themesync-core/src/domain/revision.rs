//! Revision batches - the upstream change-sets a partial sync works through.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::theme::ThemeSlug;

/// One upstream revision and the themes it touched.
///
/// Produced by the collaborator that walks the upstream change log; consumed
/// oldest-first by the revision ledger. The themes are a set: a revision
/// names each changed theme once, however many files it touched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionBatch {
    /// Upstream revision number.
    pub number: u64,
    /// Themes changed in this revision that still need downloading.
    pub themes: BTreeSet<ThemeSlug>,
}

impl RevisionBatch {
    /// Build a batch from a revision number and any iterable of slugs.
    pub fn new(number: u64, themes: impl IntoIterator<Item = ThemeSlug>) -> Self {
        Self {
            number,
            themes: themes.into_iter().collect(),
        }
    }
}
