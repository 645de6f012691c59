//! Theme slug - the identifier of one downloadable package.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when validating a theme slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    /// The slug was empty.
    #[error("theme slug cannot be empty")]
    Empty,

    /// The slug contained a character that is not allowed.
    #[error("invalid theme slug: {value:?}")]
    Invalid {
        /// The rejected input.
        value: String,
    },
}

/// Identifier of a downloadable theme package.
///
/// Slugs come from untrusted inputs (list files, revision files, the worker
/// progress stream) and are joined onto mirror paths, so they are validated
/// once at the boundary: non-empty, no path separators, no whitespace, and
/// no leading dot (the mirror's own bookkeeping files are dotfiles).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThemeSlug(String);

impl ThemeSlug {
    /// Validate and wrap a raw slug.
    pub fn new(raw: impl Into<String>) -> Result<Self, SlugError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        let ok = !raw.starts_with('.')
            && !raw
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_whitespace());
        if ok {
            Ok(Self(raw))
        } else {
            Err(SlugError::Invalid { value: raw })
        }
    }

    /// The slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ThemeSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ThemeSlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ThemeSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ThemeSlug> for String {
    fn from(slug: ThemeSlug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_slugs() {
        for raw in ["twentyten", "my-theme", "theme_2", "Theme.Pro"] {
            assert_eq!(ThemeSlug::new(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(ThemeSlug::new(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_rejects_separators_and_whitespace() {
        for raw in ["a/b", "a\\b", "a b", "a\tb", "a\nb"] {
            assert!(matches!(
                ThemeSlug::new(raw),
                Err(SlugError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_leading_dot() {
        assert!(matches!(
            ThemeSlug::new(".last-revision"),
            Err(SlugError::Invalid { .. })
        ));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let slug: ThemeSlug = serde_json::from_str("\"twentyten\"").unwrap();
        assert_eq!(slug.as_str(), "twentyten");

        let err = serde_json::from_str::<ThemeSlug>("\"a/b\"");
        assert!(err.is_err());
    }
}
