//! Domain vocabulary shared by the engine and its adapters.

mod revision;
mod stats;
mod target;
mod theme;

pub use revision::RevisionBatch;
pub use stats::{RunStats, SyncOutcome};
pub use target::{SyncTarget, UnknownTarget};
pub use theme::{SlugError, ThemeSlug};
