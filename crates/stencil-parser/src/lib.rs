//! # Stencil Parser
//!
//! Front end of the Stencil pipeline:
//!
//! 1. [`parse_document`] deserializes a design document and validates it
//! 2. [`parse_property_path`] parses the dotted paths used by overrides and
//!    variable bindings
//!
//! Both report problems as [`error::ParseError`], a list of
//! [`error::Diagnostic`]s with byte [`Span`]s into the input text.
//!
//! ## Usage
//!
//! ```
//! use stencil_parser::{error::ParseError, parse_document, parse_property_path};
//!
//! fn main() -> Result<(), ParseError> {
//!     let model = parse_document(r#"{ "frames": [] }"#)?;
//!     let path = parse_property_path("style.fills.0.color")?;
//!
//!     assert!(model.frames.is_empty());
//!     assert_eq!(path.len(), 4);
//!     Ok(())
//! }
//! ```

pub mod error;

mod document;
mod property_path;
mod span;
mod validate;

pub use document::parse_document;
pub use property_path::parse_property_path;
pub use span::Span;
