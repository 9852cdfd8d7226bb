//! Error codes for the Stencil diagnostic system.
//!
//! Codes are grouped by phase:
//! - `E0xx` - Document syntax
//! - `E1xx` - Property path grammar
//! - `E2xx` - Document validation

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Syntax Errors (E0xx)
    // =========================================================================
    /// Malformed JSON.
    ///
    /// The document is not valid JSON text.
    E001,

    /// Schema mismatch.
    ///
    /// The document is valid JSON but does not have the shape of a design
    /// document, e.g. an unknown `class` tag or a string where a number is
    /// expected.
    E002,

    // =========================================================================
    // Property Path Errors (E1xx)
    // =========================================================================
    /// Empty path segment.
    ///
    /// A property path is empty, or contains `..`, or starts or ends with `.`.
    E100,

    /// Misplaced wildcard.
    ///
    /// `*` must be a whole segment; it cannot be part of a field name.
    E101,

    /// Index out of range.
    ///
    /// A numeric segment does not fit in a machine-sized index.
    E102,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Duplicate object id.
    ///
    /// Two objects in the stored document share an id.
    E200,

    /// Unknown master.
    ///
    /// A symbol instance names a master that the document does not define.
    /// Reported as a warning; the instance stays unexpanded.
    E201,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed JSON",
            ErrorCode::E002 => "not a design document",
            ErrorCode::E100 => "empty path segment",
            ErrorCode::E101 => "misplaced wildcard",
            ErrorCode::E102 => "index out of range",
            ErrorCode::E200 => "duplicate object id",
            ErrorCode::E201 => "unknown master",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
