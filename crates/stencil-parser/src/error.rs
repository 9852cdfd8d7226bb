//! Diagnostics reported while loading documents and parsing property paths.
//!
//! The error system is built around [`Diagnostic`]: one error or warning with
//! an optional [`ErrorCode`], labeled [`Span`](crate::Span)s into the source
//! text, and help text. A failed load returns a [`ParseError`] holding every
//! diagnostic found, so one run reports all duplicate ids at once.
//!
//! # Example
//!
//! ```
//! # use stencil_parser::error::{Diagnostic, ErrorCode};
//! # use stencil_parser::Span;
//!
//! let diag = Diagnostic::error("object id `button` is used more than once")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(120..128), "duplicate id")
//!     .with_secondary_label(Span::new(40..48), "first used here")
//!     .with_help("object ids must be unique before symbol expansion");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
