//! Parser for dotted override property paths.
//!
//! Grammar:
//!
//! ```text
//! path    = segment ('.' segment)*
//! segment = '*' | digit+ | name
//! name    = (any char except '.' and '*')+
//! ```
//!
//! The public entry point is [`parse_property_path`].

use winnow::{
    Parser as _,
    combinator::{cut_err, eof, separated, terminated},
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location},
    token::take_while,
};

use stencil_core::path::{PathSegment, PropertyPath};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

/// Diagnostic context attached to winnow errors.
///
/// `start..end` is the byte range of the offending segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SegmentError {
    code: ErrorCode,
    start: usize,
    end: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<SegmentError>>>;

/// Classify the raw text of a non-empty segment.
fn classify(raw: &str) -> Result<PathSegment, ErrorCode> {
    if raw == "*" {
        return Ok(PathSegment::Wildcard);
    }
    if raw.contains('*') {
        return Err(ErrorCode::E101);
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<usize>()
            .map(PathSegment::Index)
            .map_err(|_| ErrorCode::E102);
    }
    Ok(PathSegment::Name(raw.to_string()))
}

/// Parse one segment, committing to it: a bad segment is never backtracked.
fn segment(input: &mut Input<'_>) -> IResult<PathSegment> {
    let start = input.current_token_start();

    let raw = cut_err(take_while(1.., |c: char| c != '.'))
        .context(SegmentError {
            code: ErrorCode::E100,
            start,
            end: start,
        })
        .parse_next(input)?;

    classify(raw).map_err(|code| {
        let mut e = ContextError::new();
        e.push(SegmentError {
            code,
            start,
            end: start + raw.len(),
        });
        ErrMode::Cut(e)
    })
}

fn property_path(input: &mut Input<'_>) -> IResult<PropertyPath> {
    terminated(separated(1.., segment, '.'), eof)
        .map(|segments: Vec<PathSegment>| PropertyPath::new(segments))
        .parse_next(input)
}

/// Convert a winnow error into a diagnostic pointing into `path`.
fn convert_err_mode(err: ErrMode<ContextError<SegmentError>>, path: &str) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let (code, start, end) = match context_error.context().next() {
        Some(SegmentError { code, start, end }) => (*code, *start, *end),
        None => (ErrorCode::E100, path.len(), path.len()),
    };

    // Widen empty spans to one byte where possible so the label has a target.
    let end = if end == start {
        (start + 1).min(path.len())
    } else {
        end
    };
    let span = Span::new(start..end);

    let (label, help) = match code {
        ErrorCode::E101 => (
            "wildcard inside a name",
            "use `*` as a whole segment, e.g. `style.fills.*.color`",
        ),
        ErrorCode::E102 => (
            "index too large",
            "array indices must fit in a machine-sized integer",
        ),
        _ => (
            "expected a field name, index or `*`",
            "segments are separated by a single `.`",
        ),
    };

    Diagnostic::error(format!("{} in property path `{path}`", code.description()))
        .with_code(code)
        .with_label(span, label)
        .with_help(help)
}

/// Parse a dotted property path such as `style.fills.*.color`.
///
/// Spans in the returned diagnostics are byte offsets into `path`.
///
/// # Errors
///
/// Returns [`ParseError`] with a single diagnostic:
/// - `E100` for an empty path or an empty segment (`a..b`, `.a`, `a.`)
/// - `E101` for `*` used inside a name (`fill*`)
/// - `E102` for an index that overflows `usize`
///
/// # Example
///
/// ```
/// use stencil_core::path::PathSegment;
/// use stencil_parser::parse_property_path;
///
/// let path = parse_property_path("style.fills.*.color").unwrap();
/// assert_eq!(path.segments()[2], PathSegment::Wildcard);
/// assert_eq!(path.to_json_pointer(), "/style/fills/*/color");
/// ```
pub fn parse_property_path(path: &str) -> Result<PropertyPath, ParseError> {
    let mut input = LocatingSlice::new(path);
    property_path
        .parse_next(&mut input)
        .map_err(|err| convert_err_mode(err, path).into())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn name(s: &str) -> PathSegment {
        PathSegment::Name(s.to_string())
    }

    fn first_code(err: &ParseError) -> Option<ErrorCode> {
        err.diagnostics()[0].code()
    }

    #[test]
    fn test_single_name() {
        let path = parse_property_path("visible").unwrap();
        assert_eq!(path.segments(), &[name("visible")]);
    }

    #[test]
    fn test_mixed_segments() {
        let path = parse_property_path("style.fills.0.color").unwrap();
        assert_eq!(
            path.segments(),
            &[name("style"), name("fills"), PathSegment::Index(0), name("color")]
        );
    }

    #[test]
    fn test_wildcard_segment() {
        let path = parse_property_path("style.borders.*").unwrap();
        assert_eq!(path.last(), Some(&PathSegment::Wildcard));
    }

    #[test]
    fn test_name_with_spaces_and_dashes() {
        let path = parse_property_path("extra.my-key.some key").unwrap();
        assert_eq!(path.segments()[2], name("some key"));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = parse_property_path("").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E100));
    }

    #[test]
    fn test_empty_segment_span() {
        let err = parse_property_path("style..fills").unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.labels()[0].span(), Span::new(6..7));
    }

    #[test]
    fn test_leading_and_trailing_dots() {
        assert_eq!(
            first_code(&parse_property_path(".style").unwrap_err()),
            Some(ErrorCode::E100)
        );
        assert_eq!(
            first_code(&parse_property_path("style.").unwrap_err()),
            Some(ErrorCode::E100)
        );
    }

    #[test]
    fn test_wildcard_inside_name() {
        let err = parse_property_path("style.fill*.color").unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.labels()[0].span(), Span::new(6..11));
        assert!(diag.message().contains("style.fill*.color"));
    }

    #[test]
    fn test_index_overflow() {
        let err = parse_property_path("fills.99999999999999999999999").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E102));
    }

    fn segment_strategy() -> impl Strategy<Value = PathSegment> {
        prop_oneof![
            Just(PathSegment::Wildcard),
            (0usize..100_000).prop_map(PathSegment::Index),
            "[a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_map(PathSegment::Name),
        ]
    }

    proptest! {
        #[test]
        fn prop_display_then_parse_is_identity(
            segments in prop::collection::vec(segment_strategy(), 1..6)
        ) {
            let path = PropertyPath::new(segments);
            let parsed = parse_property_path(&path.to_string()).unwrap();
            prop_assert_eq!(parsed, path);
        }

        #[test]
        fn prop_never_panics(input in ".{0,24}") {
            let _ = parse_property_path(&input);
        }
    }
}
