//! Sync target - which local mirror tree a run operates on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a sync target from a string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sync target {value:?} (expected \"themes\" or \"readmes\")")]
pub struct UnknownTarget {
    /// The rejected input.
    pub value: String,
}

/// Which local tree is being mirrored.
///
/// Each target keeps its own directory, checkpoint, download queue, and
/// failure log, so a readme-only mirror can advance independently of the
/// full package mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTarget {
    /// Full theme packages.
    Themes,
    /// Readme files only.
    Readmes,
}

impl SyncTarget {
    /// Directory name of this target's tree under the mirror root.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Themes => "themes",
            Self::Readmes => "readmes",
        }
    }

    /// The mode argument handed to the fetch worker for this target.
    #[must_use]
    pub const fn fetch_arg(self) -> &'static str {
        match self {
            Self::Themes => "all",
            Self::Readmes => "readme",
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory())
    }
}

impl FromStr for SyncTarget {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "themes" => Ok(Self::Themes),
            "readmes" => Ok(Self::Readmes),
            other => Err(UnknownTarget {
                value: other.to_string(),
            }),
        }
    }
}
