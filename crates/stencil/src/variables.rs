//! Binding master variables to the fields that reference them.
//!
//! A master declares variables with defaults, descendants bind one of their
//! own fields to a variable and an instance may reassign any variable. Binding
//! writes the resolved value into each bound field with the override engine,
//! so it runs before the instance's own overrides and never wins over them.

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use stencil_core::path::PropertyPath;
use stencil_parser::parse_property_path;

use crate::element::{ElementId, ElementTree};

/// Field name that stands for the content of a text node.
const TEXT_DATA_FIELD: &str = "textData";

/// The value of every variable visible inside instance `id`.
///
/// Defaults come from the declarations copied onto the instance when it was
/// bound; instance assignments replace them.
pub(crate) fn variable_values(tree: &ElementTree, id: ElementId) -> IndexMap<String, Value> {
    let Some(state) = tree.instance(id) else {
        return IndexMap::new();
    };
    let model = state.model();

    let mut values: IndexMap<String, Value> = model
        .object
        .variable_defs
        .iter()
        .flatten()
        .map(|define| (define.id.clone(), define.value.clone()))
        .collect();

    for assign in model.variable_assignments.iter().flatten() {
        match values.get_mut(&assign.id) {
            Some(value) => *value = assign.value.clone(),
            None => warn!(
                instance_id = model.object.id.as_str(),
                variable_id = assign.id.as_str();
                "Ignoring assignment to undeclared variable"
            ),
        }
    }
    values
}

/// Write the variable values of instance `id` into every bound field of its
/// subtree.
///
/// Nested expanded instances are bound on their own and are not entered,
/// although their own references are resolved here. Returns how many fields
/// were bound.
pub(crate) fn bind_variables(tree: &mut ElementTree, id: ElementId, dirty: &mut Vec<String>) -> usize {
    let values = variable_values(tree, id);
    if values.is_empty() {
        return 0;
    }

    let mut bound = 0;
    for node in scoped_nodes(tree, id) {
        let Some(object) = tree.get(node).and_then(|element| element.object()) else {
            continue;
        };
        let object_id = object.id.clone();
        let refs = object.variable_refs.clone().unwrap_or_default();

        for refer in refs {
            let Some(value) = values.get(&refer.id) else {
                warn!(
                    object_id = object_id.as_str(),
                    variable_id = refer.id.as_str();
                    "Reference to unknown variable"
                );
                continue;
            };
            let Some(path) = field_path(&refer.object_field) else {
                warn!(
                    object_id = object_id.as_str(),
                    field = refer.object_field.as_str();
                    "Invalid variable field"
                );
                continue;
            };

            match tree.apply_override(node, &path, value, dirty, false) {
                Ok(()) => {
                    debug!(
                        object_id = object_id.as_str(),
                        variable_id = refer.id.as_str();
                        "Variable bound"
                    );
                    bound += 1;
                }
                Err(err) => warn!(
                    object_id = object_id.as_str(),
                    variable_id = refer.id.as_str(),
                    err:err;
                    "Failed to bind variable"
                ),
            }
        }
    }
    bound
}

fn field_path(field: &str) -> Option<PropertyPath> {
    let field = if field == TEXT_DATA_FIELD { "content" } else { field };
    parse_property_path(field).ok()
}

/// Nodes below `id` that are not inside a nested bound instance.
fn scoped_nodes(tree: &ElementTree, id: ElementId) -> Vec<ElementId> {
    let mut result = Vec::new();
    let mut pending: Vec<ElementId> = tree.children(id, false).into_iter().rev().collect();
    while let Some(next) = pending.pop() {
        result.push(next);
        if tree.instance(next).is_some_and(|state| state.is_bound()) {
            continue;
        }
        pending.extend(tree.children(next, false).into_iter().rev());
    }
    result
}
