//! Applying a property override to a JSON payload.
//!
//! An override addresses a field with a [`PropertyPath`]. Name segments
//! select object keys, index segments select array elements, and `*`
//! selects every element of an array or every value of an object. A `null`
//! value deletes the field the final name selects; a final `*` with `null`
//! empties the container. Applying the same override twice leaves the
//! payload as the first application did.
//!
//! Rules for paths that do not fit the payload:
//!
//! - a missing intermediate key is [`OverrideError::PathNotFound`]
//! - a missing final key is created
//! - an index past the end is [`OverrideError::IndexOutOfBounds`]
//! - a name applied to an array is [`OverrideError::NotAContainer`]; an index
//!   applied to an object is looked up as a key
//! - `*` over an empty container does nothing
//! - a `null` value at a final index is [`OverrideError::NotAContainer`]
//!
//! [`apply`] edits the value in place and may leave it half-edited when it
//! fails, so callers work on a copy.

use serde_json::{Map, Value};

use stencil_core::path::{PathSegment, PropertyPath};

use crate::error::OverrideError;

/// Apply `value` at `path` inside `target`.
///
/// Returns whether anything changed. Ids of nested objects (below the root)
/// whose content changed are appended to `nested_ids`.
pub(crate) fn apply(
    target: &mut Value,
    path: &PropertyPath,
    value: &Value,
    nested_ids: &mut Vec<String>,
) -> Result<bool, OverrideError> {
    if path.is_empty() {
        return Err(OverrideError::PathNotFound {
            path: String::new(),
            segment: String::new(),
        });
    }
    Apply {
        path,
        value,
        nested_ids,
    }
    .visit(target, 0)
}

/// JSON equality that treats `1` and `1.0` as the same number.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

/// Overwrite `slot` with `value`, reporting whether it differed.
fn replace(slot: &mut Value, value: &Value) -> bool {
    if same_value(slot, value) {
        return false;
    }
    *slot = value.clone();
    true
}

struct Apply<'a> {
    path: &'a PropertyPath,
    value: &'a Value,
    nested_ids: &'a mut Vec<String>,
}

impl Apply<'_> {
    fn visit(&mut self, node: &mut Value, depth: usize) -> Result<bool, OverrideError> {
        let path = self.path;
        let segment = &path.segments()[depth];
        let is_last = depth + 1 == path.len();

        let changed = match (segment, &mut *node) {
            (PathSegment::Wildcard, Value::Array(items)) => {
                if is_last && self.value.is_null() {
                    let changed = !items.is_empty();
                    items.clear();
                    changed
                } else {
                    self.visit_all(items.iter_mut(), depth, is_last)?
                }
            }
            (PathSegment::Wildcard, Value::Object(map)) => {
                if is_last && self.value.is_null() {
                    let changed = !map.is_empty();
                    map.clear();
                    changed
                } else {
                    self.visit_all(map.values_mut(), depth, is_last)?
                }
            }
            (PathSegment::Index(index), Value::Array(items)) => {
                let len = items.len();
                if *index >= len {
                    return Err(OverrideError::IndexOutOfBounds {
                        path: self.path.to_string(),
                        index: *index,
                        len,
                    });
                }
                if is_last && self.value.is_null() {
                    return Err(self.not_a_container(depth, "an object field"));
                } else if is_last {
                    replace(&mut items[*index], self.value)
                } else {
                    self.visit(&mut items[*index], depth + 1)?
                }
            }
            (PathSegment::Index(index), Value::Object(map)) => {
                self.visit_key(map, &index.to_string(), depth, is_last)?
            }
            (PathSegment::Name(key), Value::Object(map)) => {
                self.visit_key(map, key, depth, is_last)?
            }
            (PathSegment::Wildcard, _) => {
                return Err(self.not_a_container(depth, "a list or object"));
            }
            (PathSegment::Index(_), _) => return Err(self.not_a_container(depth, "a list")),
            (PathSegment::Name(_), _) => return Err(self.not_a_container(depth, "an object")),
        };

        if changed && depth > 0 {
            if let Some(id) = node.get("id").and_then(Value::as_str) {
                if !self.nested_ids.iter().any(|known| known == id) {
                    self.nested_ids.push(id.to_string());
                }
            }
        }
        Ok(changed)
    }

    fn visit_all<'v>(
        &mut self,
        items: impl Iterator<Item = &'v mut Value>,
        depth: usize,
        is_last: bool,
    ) -> Result<bool, OverrideError> {
        let mut changed = false;
        for item in items {
            changed |= if is_last {
                replace(item, self.value)
            } else {
                self.visit(item, depth + 1)?
            };
        }
        Ok(changed)
    }

    fn visit_key(
        &mut self,
        map: &mut Map<String, Value>,
        key: &str,
        depth: usize,
        is_last: bool,
    ) -> Result<bool, OverrideError> {
        if is_last {
            if self.value.is_null() {
                return Ok(map.remove(key).is_some());
            }
            return Ok(match map.get_mut(key) {
                Some(slot) => replace(slot, self.value),
                None => {
                    map.insert(key.to_string(), self.value.clone());
                    true
                }
            });
        }
        match map.get_mut(key) {
            Some(child) => self.visit(child, depth + 1),
            None => Err(OverrideError::PathNotFound {
                path: self.path.to_string(),
                segment: key.to_string(),
            }),
        }
    }

    fn not_a_container(&self, depth: usize, expected: &'static str) -> OverrideError {
        OverrideError::NotAContainer {
            path: self.path.to_string(),
            segment: self.path.segments()[depth].to_string(),
            expected,
        }
    }
}
