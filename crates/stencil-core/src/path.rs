//! Typed property paths addressing a field inside a node payload.
//!
//! A [`PropertyPath`] is the parsed form of a dotted override path such as
//! `style.fills.*.color`. Parsing lives in `stencil-parser`; this module only
//! holds the value types so that every crate can share them.

use std::fmt;

/// One segment of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field name, e.g. `fills`.
    Name(String),
    /// An array position, e.g. `0`.
    Index(usize),
    /// `*`: every element of an array, or every value of an object.
    Wildcard,
}

impl PathSegment {
    /// Returns the field name if this is a [`PathSegment::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PathSegment::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if this segment is `*`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathSegment::Wildcard)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => write!(f, "{name}"),
            PathSegment::Index(index) => write!(f, "{index}"),
            PathSegment::Wildcard => write!(f, "*"),
        }
    }
}

/// A parsed dotted property path.
///
/// # Examples
///
/// ```
/// use stencil_core::path::{PathSegment, PropertyPath};
///
/// let path = PropertyPath::new(vec![
///     PathSegment::Name("style".to_string()),
///     PathSegment::Name("fills".to_string()),
///     PathSegment::Index(0),
///     PathSegment::Name("color".to_string()),
/// ]);
///
/// assert_eq!(path.to_string(), "style.fills.0.color");
/// assert_eq!(path.to_json_pointer(), "/style/fills/0/color");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Creates a path from its segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the final segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns `true` if the path begins with the given field names.
    ///
    /// ```
    /// # use stencil_core::path::{PathSegment, PropertyPath};
    /// let path = PropertyPath::new(vec![
    ///     PathSegment::Name("style".to_string()),
    ///     PathSegment::Name("borders".to_string()),
    ///     PathSegment::Wildcard,
    /// ]);
    /// assert!(path.starts_with_names(&["style", "borders"]));
    /// assert!(!path.starts_with_names(&["style", "fills"]));
    /// ```
    pub fn starts_with_names(&self, names: &[&str]) -> bool {
        names.len() <= self.segments.len()
            && names
                .iter()
                .zip(&self.segments)
                .all(|(name, segment)| segment.as_name() == Some(*name))
    }

    /// Renders the path as a JSON pointer (`/a/b/c`).
    ///
    /// `~` and `/` inside names are escaped per RFC 6901. Wildcards render as
    /// a literal `*` segment.
    pub fn to_json_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            match segment {
                PathSegment::Name(name) => {
                    pointer.push_str(&name.replace('~', "~0").replace('/', "~1"));
                }
                other => pointer.push_str(&other.to_string()),
            }
        }
        pointer
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
