//! Loading design documents from JSON text.

use log::{debug, trace};
use serde_json::error::Category;

use stencil_core::model::DesignModel;

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
    validate,
};

/// Convert a `serde_json` error into a diagnostic pointing into `source`.
fn json_error(err: &serde_json::Error, source: &str) -> Diagnostic {
    let span = Span::from_line_column(source, err.line(), err.column());

    let (code, label, help) = match err.classify() {
        Category::Data => (
            ErrorCode::E002,
            "does not match the document schema",
            "check the `class` tag and field types of this object",
        ),
        Category::Eof => (
            ErrorCode::E001,
            "unexpected end of input",
            "the document is truncated or a bracket is not closed",
        ),
        Category::Syntax | Category::Io => (
            ErrorCode::E001,
            "invalid JSON here",
            "the document must be a single JSON object",
        ),
    };

    Diagnostic::error(err.to_string())
        .with_code(code)
        .with_label(span, label)
        .with_help(help)
}

/// Parse and validate a design document.
///
/// The document is deserialized into a [`DesignModel`] and then validated as
/// a whole, so every duplicate id is reported in one pass. Warnings (such as
/// instances naming an unknown master) are logged and do not fail the load.
///
/// # Errors
///
/// Returns [`ParseError`] for:
/// - `E001`: malformed JSON
/// - `E002`: JSON that is not a design document
/// - `E200`: object ids that are not unique
///
/// # Example
///
/// ```
/// use stencil_parser::parse_document;
///
/// let source = r#"{
///     "version": "1.0",
///     "fileType": 0,
///     "frames": [{ "class": "frame", "id": "f", "childObjects": [] }]
/// }"#;
/// let model = parse_document(source).unwrap();
/// assert_eq!(model.frames.len(), 1);
/// ```
pub fn parse_document(source: &str) -> Result<DesignModel, ParseError> {
    let model: DesignModel =
        serde_json::from_str(source).map_err(|err| ParseError::from(json_error(&err, source)))?;
    debug!(
        frames = model.frames.len(),
        references = model.references.as_ref().map_or(0, Vec::len);
        "Document deserialized"
    );
    trace!(model:?; "Deserialized document");

    validate::validate_document(&model, source)?;

    Ok(model)
}
