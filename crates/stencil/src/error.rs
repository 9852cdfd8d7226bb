//! Error types for Stencil operations.
//!
//! [`StencilError`] is the top-level error returned by the
//! [`DocumentBuilder`](crate::DocumentBuilder) pipeline. [`OverrideError`]
//! describes why a single property override could not be applied; the
//! expansion pass logs and skips those, while direct callers of
//! [`ElementTree::apply_override`](crate::element::ElementTree::apply_override)
//! receive them.

use std::io;

use thiserror::Error;

use stencil_parser::error::ParseError;

/// The main error type for Stencil operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured
/// diagnostics so that callers can render labeled snippets.
#[derive(Debug, Error)]
pub enum StencilError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Override error: {0}")]
    Override(#[from] OverrideError),

    #[error("Expansion error: {0}")]
    Expand(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StencilError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// Why an override could not be applied to a node payload.
///
/// Whenever one of these is returned the payload is left exactly as it was.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("property path `{path}` has no field `{segment}`")]
    PathNotFound { path: String, segment: String },

    #[error("index {index} is out of bounds (length {len}) in property path `{path}`")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("segment `{segment}` of property path `{path}` does not address {expected}")]
    NotAContainer {
        path: String,
        segment: String,
        expected: &'static str,
    },

    #[error("edited payload is no longer a valid {kind}: {source}")]
    Incompatible {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("node has no payload to edit")]
    NoPayload,
}

impl OverrideError {
    /// An `Incompatible` error carrying a plain message instead of a serde failure.
    pub(crate) fn incompatible(kind: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Incompatible {
            kind,
            source: <serde_json::Error as serde::de::Error>::custom(message),
        }
    }
}
