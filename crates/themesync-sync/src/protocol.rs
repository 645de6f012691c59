//! Progress protocol parsing for fetch worker communication.
//!
//! Each fetch worker writes newline-delimited JSON to the pool's shared
//! output stream; every line maps 1:1 to a [`FetchEvent`] variant.
//!
//! # Protocol Schema
//!
//! All messages are JSON objects with a required `type` field:
//!
//! ```json
//! {"type": "start", "theme": "twentyten", "download_path": "themes/.twentyten.zip", "download_url": "https://..."}
//! {"type": "done", "theme": "twentyten"}
//! {"type": "fail", "theme": "twentyten"}
//! {"type": "error", "details": "catalog listing returned HTTP 500"}
//! ```
//!
//! The stream is trusted to be well-formed: any line that is not one of the
//! four message shapes is a protocol violation and aborts the run, carrying
//! the raw line for the diagnostic.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use themesync_core::domain::ThemeSlug;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when parsing progress messages.
///
/// Every variant keeps the raw offending line: by the time a violation is
/// reported the stream is gone, and the line is the only evidence left.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line was not a JSON object.
    #[error("invalid progress update message: {line}")]
    Malformed {
        /// The raw offending line.
        line: String,
    },

    /// A required field was absent for the message's type.
    #[error("progress update missing `{field}`: {line}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
        /// The raw offending line.
        line: String,
    },

    /// The `type` field named no known message kind.
    #[error("unrecognized update type `{kind}`: {line}")]
    UnknownKind {
        /// The unrecognized kind.
        kind: String,
        /// The raw offending line.
        line: String,
    },

    /// The `theme` field was not a valid slug.
    #[error("invalid theme slug in progress update: {line}")]
    InvalidSlug {
        /// The raw offending line.
        line: String,
    },
}

// ============================================================================
// Protocol Events
// ============================================================================

/// Events emitted by fetch workers.
///
/// Maps 1:1 to the JSON protocol schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// A fetch began.
    Start {
        /// The theme being fetched.
        theme: ThemeSlug,
        /// Where the worker writes the partial download.
        download_path: PathBuf,
        /// The remote package URL.
        download_url: String,
    },

    /// A fetch succeeded.
    Done {
        /// The theme that finished.
        theme: ThemeSlug,
    },

    /// A fetch failed. Non-fatal to the run.
    Fail {
        /// The theme that failed.
        theme: ThemeSlug,
    },

    /// A worker hit an unrecoverable condition. Fatal to the run.
    Error {
        /// Human-readable detail reported by the worker.
        details: String,
    },
}

// ============================================================================
// Parsing
// ============================================================================

/// Raw JSON envelope for parsing.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    theme: Option<String>,
    download_path: Option<PathBuf>,
    download_url: Option<String>,
    details: Option<String>,
}

/// Parse one line of the merged progress stream into a [`FetchEvent`].
pub fn parse_line(line: &str) -> Result<FetchEvent, ProtocolError> {
    let envelope: RawEnvelope =
        serde_json::from_str(line).map_err(|_| ProtocolError::Malformed {
            line: line.to_string(),
        })?;

    let kind = envelope.kind.ok_or_else(|| ProtocolError::MissingField {
        field: "type",
        line: line.to_string(),
    })?;

    let theme = |raw: Option<String>| -> Result<ThemeSlug, ProtocolError> {
        let raw = raw.ok_or_else(|| ProtocolError::MissingField {
            field: "theme",
            line: line.to_string(),
        })?;
        ThemeSlug::new(raw).map_err(|_| ProtocolError::InvalidSlug {
            line: line.to_string(),
        })
    };

    match kind.as_str() {
        "start" => {
            let theme = theme(envelope.theme)?;
            let download_path =
                envelope
                    .download_path
                    .ok_or_else(|| ProtocolError::MissingField {
                        field: "download_path",
                        line: line.to_string(),
                    })?;
            let download_url =
                envelope
                    .download_url
                    .ok_or_else(|| ProtocolError::MissingField {
                        field: "download_url",
                        line: line.to_string(),
                    })?;
            Ok(FetchEvent::Start {
                theme,
                download_path,
                download_url,
            })
        }

        "done" => Ok(FetchEvent::Done {
            theme: theme(envelope.theme)?,
        }),

        "fail" => Ok(FetchEvent::Fail {
            theme: theme(envelope.theme)?,
        }),

        "error" => {
            let details = envelope.details.ok_or_else(|| ProtocolError::MissingField {
                field: "details",
                line: line.to_string(),
            })?;
            Ok(FetchEvent::Error { details })
        }

        other => Err(ProtocolError::UnknownKind {
            kind: other.to_string(),
            line: line.to_string(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
