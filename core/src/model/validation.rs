//! Load-time error and issue types.
//!
//! `ParseError` fails a whole document load. `ValidationIssue` records a
//! dropped part of an otherwise-loadable document. `ValidationError` rejects
//! a single activation without poisoning anything else.

use std::path::PathBuf;

use overcue_types::ExternalId;

/// A document could not be read or was not valid JSON.
///
/// Nothing is loaded or cached when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

/// An activation that cannot be rendered at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("activation {id:?} has no usable template")]
    EmptyTemplate { id: String },
}

/// A part of a document that was dropped during loading.
///
/// Issues are returned beside the loaded value so callers can log them
/// without losing the rest of the document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("window for {external_id} has end {end_ms} <= start {start_ms}, dropped")]
    WindowOutOfOrder {
        external_id: ExternalId,
        start_ms: u64,
        end_ms: u64,
    },

    #[error("window for {external_id} has no position key, dropped")]
    WindowMissingPosition { external_id: ExternalId },

    #[error("malformed segment in block {block:?}, dropped: {detail}")]
    MalformedSegment { block: String, detail: String },
}
