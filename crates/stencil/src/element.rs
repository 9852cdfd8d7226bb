//! The element tree.
//!
//! A design document is held as an arena of [`Element`] nodes addressed by
//! [`ElementId`]. Each node owns an ordered child list and keeps a plain
//! index back to its parent, so upward walks never involve ownership.
//! Removed nodes leave an empty slot behind; slots are never reused, which
//! keeps a stale [`ElementId`] from silently naming a different node.
//!
//! Node-specific behavior lives in the submodules:
//!
//! - [`payload`]: the typed model data carried by each node
//! - `build`: conversion between model structures and the tree
//! - `instance`: the symbol instance controller and its state stack

mod build;
mod instance;
mod payload;

pub use instance::SymbolInstanceState;
pub use payload::{ElementKind, Payload};

use std::fmt;

use log::{debug, trace, warn};
use serde_json::Value;

use stencil_core::{
    model::{Object, Rect, ReferencedStyle},
    path::PropertyPath,
    sequence::SequenceId,
};

use crate::{error::OverrideError, overrides};

/// Separator between the parts of an expanded, instance-prefixed id.
pub const KEY_SEPARATOR: &str = "__";

/// The id an object had in its master, before any instance prefix.
pub fn original_id(id: &str) -> &str {
    id.rsplit(KEY_SEPARATOR).next().unwrap_or(id)
}

/// Handle to a node inside an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A node of the element tree.
#[derive(Debug, Clone)]
pub struct Element {
    sequence_id: SequenceId,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    first_on_top: bool,
    payload: Payload,
}

impl Element {
    fn new(payload: Payload) -> Self {
        Self {
            sequence_id: SequenceId::next(),
            parent: None,
            children: Vec::new(),
            first_on_top: false,
            payload,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.payload.kind()
    }

    /// Identity of this node that survives cloning and id prefixing.
    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Whether stored child order is newest-first.
    pub fn first_on_top(&self) -> bool {
        self.first_on_top
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    pub fn object(&self) -> Option<&Object> {
        self.payload.object()
    }

    /// The object id, or `None` for nodes without an object header.
    pub fn id(&self) -> Option<&str> {
        self.object().map(|object| object.id.as_str())
    }
}

/// An arena-backed tree of [`Element`]s.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<Option<Element>>,
    root: Option<ElementId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn set_root(&mut self, root: ElementId) {
        self.root = Some(root);
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All live nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.as_ref().map(|node| (ElementId(index), node)))
    }

    /// Add a detached node holding `payload`.
    pub fn insert(&mut self, payload: Payload) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(Element::new(payload)));
        id
    }

    /// Append `child` to `parent`'s children. `None` is a no-op.
    ///
    /// A child that already has a parent is moved: it is removed from the
    /// old parent's list before being appended.
    pub fn add_child(&mut self, parent: ElementId, child: Option<ElementId>) {
        let Some(child) = child else {
            return;
        };
        if child == parent || self.is_ancestor_of(child, Some(parent)) {
            debug_assert!(false, "adding {child} under {parent} would create a cycle");
            return;
        }
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Remove `id` from its parent's child list, keeping it in the arena.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.get_mut(id).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|child| *child != id);
        }
    }

    /// Detach every child of `id` and return them in stored order.
    pub fn detach_children(&mut self, id: ElementId) -> Vec<ElementId> {
        let Some(node) = self.get_mut(id) else {
            return Vec::new();
        };
        let children = std::mem::take(&mut node.children);
        for child in &children {
            if let Some(node) = self.get_mut(*child) {
                node.parent = None;
            }
        }
        children
    }

    /// Detach `id` and drop it together with its whole subtree.
    pub fn remove_subtree(&mut self, id: ElementId) {
        self.detach(id);
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
    }

    pub fn set_first_on_top(&mut self, id: ElementId, first_on_top: bool) {
        if let Some(node) = self.get_mut(id) {
            node.first_on_top = first_on_top;
        }
    }

    /// The children of `id`, reversed when `reverse_if_first_on_top` is set
    /// and the node stores newest-first. Stored order is never changed.
    pub fn children(&self, id: ElementId, reverse_if_first_on_top: bool) -> Vec<ElementId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let mut children = node.children.clone();
        if reverse_if_first_on_top && node.first_on_top {
            children.reverse();
        }
        children
    }

    /// Every node below `id` in depth-first pre-order, `id` excluded.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut pending: Vec<ElementId> = self.children(id, false).into_iter().rev().collect();
        while let Some(next) = pending.pop() {
            result.push(next);
            pending.extend(self.children(next, false).into_iter().rev());
        }
        result
    }

    /// Number of nodes in the subtree rooted at `id`.
    pub fn size(&self, id: ElementId) -> usize {
        if self.get(id).is_none() {
            return 0;
        }
        1 + self.descendants(id).len()
    }

    /// `true` if `node` is `ancestor` itself or lies below it.
    pub fn is_ancestor_of(&self, ancestor: ElementId, node: Option<ElementId>) -> bool {
        let mut current = node;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(Element::parent);
        }
        false
    }

    /// Deep-copy the subtree rooted at `id` into a new tree.
    ///
    /// Every copied node keeps its [`SequenceId`], so the copy can be matched
    /// node by node against the original.
    pub fn clone_tree(&self, id: ElementId) -> ElementTree {
        let mut tree = ElementTree::new();
        if let Some(root) = self.copy_into(&mut tree, id, None) {
            tree.root = Some(root);
        }
        tree
    }

    /// Copy the subtree at `id` from `self` into `target` below `parent`.
    pub(crate) fn copy_into(
        &self,
        target: &mut ElementTree,
        id: ElementId,
        parent: Option<ElementId>,
    ) -> Option<ElementId> {
        let source = self.get(id)?;
        let copy = ElementId(target.nodes.len());
        target.nodes.push(Some(Element {
            sequence_id: source.sequence_id,
            parent: None,
            children: Vec::new(),
            first_on_top: source.first_on_top,
            payload: source.payload.clone(),
        }));
        if let Some(parent) = parent {
            target.add_child(parent, Some(copy));
        }
        for child in &source.children {
            self.copy_into(target, *child, Some(copy));
        }
        Some(copy)
    }

    /// Give `id`, and with `recursive` its whole subtree, fresh sequence ids.
    pub fn regenerate_id(&mut self, id: ElementId, recursive: bool) {
        let mut targets = vec![id];
        if recursive {
            targets.extend(self.descendants(id));
        }
        for target in targets {
            if let Some(node) = self.get_mut(target) {
                node.sequence_id = SequenceId::next();
            }
        }
    }

    /// Resolve a key chain such as `[I1, I2, x]` starting at `id`.
    ///
    /// The first key must name a node in the subtree of `id` (overrideKey
    /// first, then id, both compared against the keys collected so far
    /// joined with [`KEY_SEPARATOR`]). Each further key is resolved inside
    /// the node the previous key matched. The original ids of the matched
    /// scopes are pushed onto `instance_stack` when one is given.
    pub fn find_element_by_key(
        &self,
        id: ElementId,
        key_chain: &[String],
        instance_stack: Option<&mut Vec<String>>,
    ) -> Option<ElementId> {
        let mut local = Vec::new();
        let stack = instance_stack.unwrap_or(&mut local);
        self.find_by_key_in(id, key_chain, stack)
    }

    fn find_by_key_in(
        &self,
        id: ElementId,
        key_chain: &[String],
        stack: &mut Vec<String>,
    ) -> Option<ElementId> {
        let (key, rest) = key_chain.split_first()?;
        let node = self.get(id)?;

        if let Some(object) = node.object() {
            let candidate = if stack.is_empty() {
                key.clone()
            } else {
                format!("{}{KEY_SEPARATOR}{key}", stack.join(KEY_SEPARATOR))
            };
            let matched = object.override_key.as_deref() == Some(candidate.as_str())
                || object.id == candidate;
            if matched {
                if rest.is_empty() {
                    return Some(id);
                }
                stack.push(original_id(&object.id).to_string());
                let found = self.find_by_key_in(id, rest, stack);
                if found.is_none() {
                    stack.pop();
                }
                return found;
            }
        }

        self.children(id, false)
            .into_iter()
            .find_map(|child| self.find_by_key_in(child, key_chain, stack))
    }

    /// Find a node below `id` (or `id` itself) whose id or name is `key`.
    ///
    /// Unlike [`find_element_by_key`](Self::find_element_by_key) this is not
    /// scoped by instance boundaries.
    pub fn get_element_by_key(&self, id: ElementId, key: &str) -> Option<ElementId> {
        std::iter::once(id)
            .chain(self.descendants(id))
            .find(|candidate| {
                self.get(*candidate)
                    .and_then(Element::object)
                    .is_some_and(|object| object.id == key || object.name.as_deref() == Some(key))
            })
    }

    /// Apply one property override to the node `id`.
    ///
    /// Nodes without an object header are skipped. Ids of nodes whose data
    /// actually changed are appended to `dirty`. With `recursive` the same
    /// override is also tried on every descendant; failures there are logged
    /// and skipped. Vector-network groups always propagate border overrides
    /// to their children.
    ///
    /// # Errors
    ///
    /// Returns [`OverrideError`] when the path does not fit this node's
    /// payload or the edited payload no longer type-checks. The node is left
    /// unchanged in that case.
    pub fn apply_override(
        &mut self,
        id: ElementId,
        path: &PropertyPath,
        value: &Value,
        dirty: &mut Vec<String>,
        recursive: bool,
    ) -> Result<(), OverrideError> {
        let Some(node) = self.get(id) else {
            return Ok(());
        };
        let recursive = recursive || propagates_to_children(node.payload(), path);

        self.apply_override_at(id, path, value, dirty)?;

        if recursive {
            for descendant in self.descendants(id) {
                if let Err(err) = self.apply_override_at(descendant, path, value, dirty) {
                    debug!(
                        node = descendant.to_string(),
                        path = path.to_string(),
                        err:err;
                        "Skipping override on descendant"
                    );
                }
            }
        }
        Ok(())
    }

    fn apply_override_at(
        &mut self,
        id: ElementId,
        path: &PropertyPath,
        value: &Value,
        dirty: &mut Vec<String>,
    ) -> Result<(), OverrideError> {
        let Some(object_id) = self.get(id).and_then(Element::id).map(str::to_string) else {
            return Ok(());
        };
        let Some(mut json) = self.json_model(id) else {
            return Ok(());
        };

        let mut nested = Vec::new();
        let changed = overrides::apply(&mut json, path, value, &mut nested)?;
        if !changed {
            trace!(
                object_id = object_id.as_str(),
                path = path.to_string();
                "Override left payload unchanged"
            );
            return Ok(());
        }
        self.update_json_model(id, json)?;

        debug!(object_id = object_id.as_str(), path = path.to_string(); "Override applied");
        for changed_id in std::iter::once(object_id).chain(nested) {
            if !dirty.contains(&changed_id) {
                dirty.push(changed_id);
            }
        }
        Ok(())
    }

    /// Prepend `prefix` to the id and override key of `id`.
    ///
    /// Values that already start with `prefix` are left alone, so repeated
    /// calls during nested expansion never double the prefix.
    pub fn add_key_prefix(&mut self, id: ElementId, prefix: &str) {
        let Some(object) = self.object_mut(id) else {
            return;
        };
        if let Some(new_id) = prefixed(&object.id, prefix) {
            object.id = new_id;
        }
        if let Some(new_key) = object.override_key.as_deref().and_then(|key| prefixed(key, prefix)) {
            object.override_key = Some(new_key);
        }
    }

    /// Point mask references in the subtree of `id` at prefixed ids.
    ///
    /// A reference is rewritten only when the prefixed id resolves to a node
    /// inside `scope`. References to objects outside the expanding instance
    /// keep their original target.
    pub fn make_mask_id_unique(&mut self, id: ElementId, scope: ElementId, prefix: &str) {
        let resolves = |tree: &Self, mask: &str| {
            let candidate = format!("{prefix}{mask}");
            tree.find_element_by_key(scope, std::slice::from_ref(&candidate), None)
                .map(|_| candidate)
        };

        for node in std::iter::once(id).chain(self.descendants(id)) {
            let Some(object) = self.get(node).and_then(Element::object) else {
                continue;
            };
            let alpha: Vec<(usize, String)> = object
                .alpha_mask_by
                .iter()
                .enumerate()
                .filter_map(|(index, mask)| resolves(self, &mask.id).map(|id| (index, id)))
                .collect();
            let outline: Vec<(usize, String)> = object
                .outline_mask_by
                .iter()
                .enumerate()
                .filter_map(|(index, mask)| resolves(self, mask).map(|id| (index, id)))
                .collect();
            if alpha.is_empty() && outline.is_empty() {
                continue;
            }

            let Some(object) = self.object_mut(node) else {
                continue;
            };
            for (index, mask_id) in alpha {
                object.alpha_mask_by[index].id = mask_id;
            }
            for (index, mask_id) in outline {
                object.outline_mask_by[index] = mask_id;
            }
        }
    }

    /// Overwrite the style of `id` with a shared style definition.
    ///
    /// Context settings are replaced when the shared style carries them;
    /// text nodes also take its font attributes.
    pub fn update(&mut self, id: ElementId, style: &ReferencedStyle) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if let Payload::Text(text) = node.payload_mut() {
            if let Some(font_attr) = &style.font_attr {
                text.font_attr = vec![font_attr.clone()];
            }
        }
        let Some(object) = node.payload_mut().object_mut() else {
            debug_assert!(false, "shared style applied to a node without an object");
            return;
        };
        object.style = style.style.clone();
        if let Some(settings) = &style.context_settings {
            object.context_settings = settings.clone();
        }
    }

    /// The object header of `id` for direct edits.
    pub fn object_mut(&mut self, id: ElementId) -> Option<&mut Object> {
        self.get_mut(id)?.payload_mut().object_mut()
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), OverrideError> {
        self.object_mut(id).ok_or(OverrideError::NoPayload)?.visible = visible;
        Ok(())
    }

    pub fn update_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<(), OverrideError> {
        self.object_mut(id).ok_or(OverrideError::NoPayload)?.bounds = bounds;
        Ok(())
    }

    pub fn update_matrix(&mut self, id: ElementId, matrix: [f64; 6]) -> Result<(), OverrideError> {
        self.object_mut(id).ok_or(OverrideError::NoPayload)?.matrix = matrix.to_vec();
        Ok(())
    }

    /// Merge the top-level fields of `fields` into a text node's payload.
    ///
    /// # Errors
    ///
    /// Fails when `id` is not a text node, `fields` is not a JSON object or
    /// the merged payload no longer type-checks.
    pub fn update_text_fields(&mut self, id: ElementId, fields: Value) -> Result<(), OverrideError> {
        let node = self.get(id).ok_or(OverrideError::NoPayload)?;
        if node.kind() != ElementKind::Text {
            return Err(OverrideError::incompatible(
                "text",
                format!("node {id} is a {}", node.kind()),
            ));
        }
        let Value::Object(fields) = fields else {
            return Err(OverrideError::incompatible("text", "fields must be a JSON object"));
        };
        let mut json = self.json_model(id).ok_or(OverrideError::NoPayload)?;
        if let Value::Object(map) = &mut json {
            map.extend(fields);
        }
        self.update_json_model(id, json)
    }

    /// The payload of `id` as JSON.
    ///
    /// For a path, each subshape gets its child node alone as sub-geometry:
    /// containers come back without children and instances as their own
    /// model, so the result always passes `update_json_model`.
    pub fn json_model(&self, id: ElementId) -> Option<Value> {
        let node = self.get(id)?;
        let json = match node.payload() {
            Payload::Path(path) => {
                let mut path = (**path).clone();
                if let Some(shape) = path.shape.as_mut() {
                    let children = self.children(id, false);
                    for (subshape, child) in shape.subshapes.iter_mut().zip(children) {
                        subshape.sub_geometry = self.to_model(child).map(Box::new);
                    }
                }
                serde_json::to_value(path)
            }
            payload => payload.to_json(),
        };
        match json {
            Ok(json) => Some(json),
            Err(err) => {
                warn!(node = id.to_string(), err:err; "Failed to serialize payload");
                None
            }
        }
    }

    /// Replace the payload of `id` from JSON of the same shape `json_model`
    /// returns.
    ///
    /// For a path, edited sub-geometry is pushed back into its children.
    /// Every part is checked before anything is written, so on error the
    /// node and its children are unchanged.
    pub fn update_json_model(&mut self, id: ElementId, json: Value) -> Result<(), OverrideError> {
        let node = self.get(id).ok_or(OverrideError::NoPayload)?;
        if node.kind() != ElementKind::Path {
            return self
                .get_mut(id)
                .ok_or(OverrideError::NoPayload)?
                .payload_mut()
                .update_from_json(json);
        }

        let mut path: stencil_core::model::Path =
            serde_json::from_value(json).map_err(|source| OverrideError::Incompatible {
                kind: "path",
                source,
            })?;
        let children = self.children(id, false);
        let mut edits = Vec::new();
        if let Some(shape) = path.shape.as_mut() {
            for (subshape, child) in shape.subshapes.iter_mut().zip(&children) {
                let Some(geometry) = subshape.sub_geometry.take() else {
                    continue;
                };
                let node = self.get(*child).ok_or(OverrideError::NoPayload)?;
                node.payload().accepts_sub_geometry(&geometry)?;
                edits.push((*child, *geometry));
            }
        }

        for (child, geometry) in edits {
            if let Some(node) = self.get_mut(child) {
                node.payload_mut().update_from_sub_geometry(geometry)?;
            }
        }
        if let Some(node) = self.get_mut(id) {
            *node.payload_mut() = Payload::Path(Box::new(path));
        }
        Ok(())
    }
}

fn prefixed(value: &str, prefix: &str) -> Option<String> {
    (!value.starts_with(prefix)).then(|| format!("{prefix}{value}"))
}

/// Border overrides on a group flattened from a vector network also apply
/// to its children.
fn propagates_to_children(payload: &Payload, path: &PropertyPath) -> bool {
    matches!(payload, Payload::Group(group) if group.is_vector_network == Some(true))
        && path.starts_with_names(&["style", "borders"])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use stencil_core::model::{
        AlphaMask, Color, ContainerChild, Fill, Group, Path, Rectangle, Shape, SubGeometry,
        Subshape, SymbolInstance, SymbolMaster, Text,
    };
    use stencil_parser::parse_property_path;

    use super::*;

    fn group(id: &str) -> Payload {
        Payload::Group(Box::new(Group::new(Object::new(id))))
    }

    fn text(id: &str) -> Payload {
        Payload::Text(Box::new(Text::new(Object::new(id), "")))
    }

    fn red_path(id: &str) -> Payload {
        let mut path = Path::new(Object::new(id));
        path.object.style.fills = vec![Fill::solid(Color::new(1.0, 0.0, 0.0, 1.0))];
        Payload::Path(Box::new(path))
    }

    /// root(g) -> [a(text), b(g) -> [c(text)]]
    fn sample() -> (ElementTree, [ElementId; 4]) {
        let mut tree = ElementTree::new();
        let root = tree.insert(group("root"));
        let a = tree.insert(text("a"));
        let b = tree.insert(group("b"));
        let c = tree.insert(text("c"));
        tree.add_child(root, Some(a));
        tree.add_child(root, Some(b));
        tree.add_child(b, Some(c));
        tree.set_root(root);
        (tree, [root, a, b, c])
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn ids(tree: &ElementTree, nodes: &[ElementId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|n| tree.get(*n).and_then(Element::id).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_original_id() {
        assert_eq!(original_id("I1__I2__x"), "x");
        assert_eq!(original_id("x"), "x");
    }

    #[test]
    fn test_add_child_sets_parent_and_none_is_noop() {
        let (mut tree, [root, a, b, c]) = sample();
        tree.add_child(root, None);

        assert_eq!(tree.get(a).unwrap().parent(), Some(root));
        assert_eq!(tree.children(root, false), vec![a, b]);
        assert_eq!(tree.get(c).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_reparenting_updates_both_sides() {
        let (mut tree, [root, a, b, _]) = sample();
        tree.add_child(b, Some(a));

        assert_eq!(tree.children(root, false), vec![b]);
        assert_eq!(tree.get(a).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_children_reversal_does_not_mutate_storage() {
        let (mut tree, [root, a, b, _]) = sample();
        tree.set_first_on_top(root, true);

        assert_eq!(tree.children(root, true), vec![b, a]);
        assert_eq!(tree.children(root, false), vec![a, b]);
    }

    #[test]
    fn test_size_and_ancestry() {
        let (tree, [root, a, b, c]) = sample();

        assert_eq!(tree.size(root), 4);
        assert_eq!(tree.size(b), 2);
        assert!(tree.is_ancestor_of(root, Some(c)));
        assert!(tree.is_ancestor_of(b, Some(b)));
        assert!(!tree.is_ancestor_of(a, Some(c)));
        assert!(!tree.is_ancestor_of(root, None));
    }

    #[test]
    fn test_clone_tree_keeps_sequence_ids_and_is_independent() {
        let (tree, [root, _, b, _]) = sample();
        let mut copy = tree.clone_tree(root);
        let copy_root = copy.root().unwrap();

        assert_eq!(
            copy.get(copy_root).unwrap().sequence_id(),
            tree.get(root).unwrap().sequence_id()
        );
        assert_eq!(copy.size(copy_root), 4);
        assert_eq!(ids(&copy, &copy.descendants(copy_root)), vec!["a", "b", "c"]);

        let copy_b = copy.children(copy_root, false)[1];
        assert_eq!(
            copy.get(copy_b).unwrap().sequence_id(),
            tree.get(b).unwrap().sequence_id()
        );
        for child in copy.detach_children(copy_root) {
            copy.remove_subtree(child);
        }
        assert_eq!(tree.size(root), 4);
        assert_eq!(copy.size(copy_root), 1);
    }

    #[test]
    fn test_regenerate_id() {
        let (mut tree, [root, a, _, _]) = sample();
        let before_root = tree.get(root).unwrap().sequence_id();
        let before_a = tree.get(a).unwrap().sequence_id();

        tree.regenerate_id(root, false);
        assert_ne!(tree.get(root).unwrap().sequence_id(), before_root);
        assert_eq!(tree.get(a).unwrap().sequence_id(), before_a);

        tree.regenerate_id(root, true);
        assert_ne!(tree.get(a).unwrap().sequence_id(), before_a);
    }

    #[test]
    fn test_remove_subtree_leaves_stale_ids_unresolved() {
        let (mut tree, [root, _, b, c]) = sample();
        tree.remove_subtree(b);

        assert!(tree.get(b).is_none());
        assert!(tree.get(c).is_none());
        assert_eq!(tree.size(root), 2);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_find_element_by_key_is_scoped() {
        let mut tree = ElementTree::new();
        let root = tree.insert(group("page"));
        let i1 = tree.insert(group("I1"));
        let i2 = tree.insert(group("I1__I2"));
        let leaf = tree.insert(text("I1__I2__x"));
        tree.add_child(root, Some(i1));
        tree.add_child(i1, Some(i2));
        tree.add_child(i2, Some(leaf));

        let mut stack = Vec::new();
        let found = tree.find_element_by_key(root, &keys(&["I1", "I2", "x"]), Some(&mut stack));

        assert_eq!(found, Some(leaf));
        assert_eq!(stack, vec!["I1", "I2"]);
        assert_eq!(tree.find_element_by_key(root, &keys(&["x"]), None), None);
        assert_eq!(tree.find_element_by_key(root, &keys(&["I2"]), None), None);
        assert_eq!(tree.find_element_by_key(root, &[], None), None);
    }

    #[test]
    fn test_find_element_by_key_prefers_override_key() {
        let mut tree = ElementTree::new();
        let root = tree.insert(group("page"));
        let node = tree.insert(text("t"));
        tree.object_mut(node).unwrap().override_key = Some("label".to_string());
        tree.add_child(root, Some(node));

        assert_eq!(tree.find_element_by_key(root, &keys(&["label"]), None), Some(node));
        assert_eq!(tree.find_element_by_key(root, &keys(&["t"]), None), Some(node));
    }

    #[test]
    fn test_get_element_by_key_matches_name() {
        let (mut tree, [root, _, _, c]) = sample();
        tree.object_mut(c).unwrap().name = Some("Caption".to_string());

        assert_eq!(tree.get_element_by_key(root, "Caption"), Some(c));
        assert_eq!(tree.get_element_by_key(root, "c"), Some(c));
        assert_eq!(tree.get_element_by_key(root, "nope"), None);
    }

    #[test]
    fn test_apply_override_records_dirty_ids() {
        let mut tree = ElementTree::new();
        let node = tree.insert(red_path("p"));
        let path = parse_property_path("style.fills.0.color").unwrap();
        let blue = json!({ "red": 0.0, "green": 0.0, "blue": 1.0, "alpha": 1.0 });
        let mut dirty = Vec::new();

        tree.apply_override(node, &path, &blue, &mut dirty, false).unwrap();
        tree.apply_override(node, &path, &blue, &mut dirty, false).unwrap();

        assert_eq!(dirty, vec!["p"]);
        let object = tree.get(node).unwrap().object().unwrap();
        assert_eq!(object.style.fills[0].color, Some(Color::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_apply_override_failure_leaves_payload() {
        let mut tree = ElementTree::new();
        let node = tree.insert(red_path("p"));
        let path = parse_property_path("style.fills.0.color").unwrap();
        let mut dirty = Vec::new();

        let err = tree
            .apply_override(node, &path, &json!("blue"), &mut dirty, false)
            .unwrap_err();

        assert!(matches!(err, OverrideError::Incompatible { .. }));
        assert!(dirty.is_empty());
        let object = tree.get(node).unwrap().object().unwrap();
        assert_eq!(object.style.fills[0].color, Some(Color::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_apply_override_skips_geometry() {
        let mut tree = ElementTree::new();
        let node = tree.insert(Payload::Rectangle(Rectangle::default()));
        let path = parse_property_path("visible").unwrap();
        let mut dirty = Vec::new();

        tree.apply_override(node, &path, &json!(false), &mut dirty, false).unwrap();
        assert!(dirty.is_empty());
    }

    #[test]
    fn test_vector_network_group_propagates_borders() {
        let mut tree = ElementTree::new();
        let mut model = Group::new(Object::new("g"));
        model.is_vector_network = Some(true);
        let root = tree.insert(Payload::Group(Box::new(model)));
        let child = tree.insert(text("t"));
        tree.add_child(root, Some(child));
        let path = parse_property_path("style.borders").unwrap();
        let mut dirty = Vec::new();

        tree.apply_override(root, &path, &json!([]), &mut dirty, false).unwrap();
        assert!(dirty.is_empty());

        let visible = parse_property_path("visible").unwrap();
        tree.apply_override(root, &visible, &json!(false), &mut dirty, false).unwrap();
        assert_eq!(dirty, vec!["g"]);
        assert!(tree.get(child).unwrap().object().unwrap().visible);

        let border = json!([{ "isEnabled": true, "thickness": 2.0 }]);
        tree.apply_override(root, &path, &border, &mut dirty, false).unwrap();
        assert_eq!(dirty, vec!["g", "t"]);
    }

    #[test]
    fn test_add_key_prefix_is_idempotent() {
        let (mut tree, [_, a, _, _]) = sample();
        tree.object_mut(a).unwrap().override_key = Some("k".to_string());

        tree.add_key_prefix(a, "I__");
        tree.add_key_prefix(a, "I__");

        let object = tree.get(a).unwrap().object().unwrap();
        assert_eq!(object.id, "I__a");
        assert_eq!(object.override_key.as_deref(), Some("I__k"));
    }

    #[test]
    fn test_make_mask_id_unique_is_scoped() {
        let mut tree = ElementTree::new();
        let page = tree.insert(group("page"));
        let outside = tree.insert(text("outer"));
        let instance = tree.insert(group("I"));
        let mask = tree.insert(text("I__m"));
        let masked = tree.insert(text("I__s"));
        tree.add_child(page, Some(outside));
        tree.add_child(page, Some(instance));
        tree.add_child(instance, Some(mask));
        tree.add_child(instance, Some(masked));
        {
            let object = tree.object_mut(masked).unwrap();
            object.alpha_mask_by = vec![
                AlphaMask { id: "m".to_string(), alpha_type: 0, crop: false },
                AlphaMask { id: "outer".to_string(), alpha_type: 0, crop: false },
            ];
            object.outline_mask_by = vec!["m".to_string()];
        }

        tree.make_mask_id_unique(instance, instance, "I__");

        let object = tree.get(masked).unwrap().object().unwrap();
        assert_eq!(object.alpha_mask_by[0].id, "I__m");
        assert_eq!(object.alpha_mask_by[1].id, "outer");
        assert_eq!(object.outline_mask_by, vec!["I__m"]);
    }

    #[test]
    fn test_update_with_referenced_style() {
        let (mut tree, [_, a, _, _]) = sample();
        let shared = ReferencedStyle {
            id: "referenced_style_1".to_string(),
            style: stencil_core::model::Style {
                fills: vec![Fill::solid(Color::new(0.0, 1.0, 0.0, 1.0))],
                ..Default::default()
            },
            context_settings: None,
            font_attr: Some(json!({ "size": 12 })),
        };

        tree.update(a, &shared);

        let Payload::Text(text) = tree.get(a).unwrap().payload() else {
            panic!("expected text");
        };
        assert_eq!(text.object.style.fills.len(), 1);
        assert_eq!(text.font_attr, vec![json!({ "size": 12 })]);
    }

    #[test]
    fn test_conveniences() {
        let (mut tree, [root, a, _, _]) = sample();
        tree.set_visible(a, false).unwrap();
        tree.update_bounds(a, Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        tree.update_matrix(a, [2.0, 0.0, 0.0, 2.0, 5.0, 5.0]).unwrap();
        tree.update_text_fields(a, json!({ "content": "hello" })).unwrap();

        let Payload::Text(text) = tree.get(a).unwrap().payload() else {
            panic!("expected text");
        };
        assert!(!text.object.visible);
        assert_eq!(text.object.bounds, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(text.object.matrix[4], 5.0);
        assert_eq!(text.content, "hello");
        assert!(tree.update_text_fields(root, json!({ "content": "x" })).is_err());
    }

    #[test]
    fn test_path_json_model_round_trips_sub_geometry() {
        let mut tree = ElementTree::new();
        let mut path = Path::new(Object::new("p"));
        path.shape = Some(Shape {
            subshapes: vec![Subshape {
                boolean_operation: 0,
                sub_geometry: Some(Box::new(SubGeometry::Rectangle(Rectangle::default()))),
            }],
            ..Default::default()
        });
        let root = tree.build_child(None, ContainerChild::Path(path));

        let mut json = tree.json_model(root).unwrap();
        assert_eq!(json["shape"]["subshapes"][0]["subGeometry"]["class"], "rectangle");

        json["shape"]["subshapes"][0]["subGeometry"]["cornerRadius"] = json!(4.0);
        tree.update_json_model(root, json).unwrap();

        let child = tree.children(root, false)[0];
        let Payload::Rectangle(rectangle) = tree.get(child).unwrap().payload() else {
            panic!("expected rectangle");
        };
        assert_eq!(rectangle.corner_radius, Some(4.0));
    }

    #[test]
    fn test_path_update_rejects_changed_geometry_class() {
        let mut tree = ElementTree::new();
        let mut path = Path::new(Object::new("p"));
        path.shape = Some(Shape {
            subshapes: vec![Subshape {
                boolean_operation: 0,
                sub_geometry: Some(Box::new(SubGeometry::Rectangle(Rectangle::default()))),
            }],
            ..Default::default()
        });
        let root = tree.build_child(None, ContainerChild::Path(path));
        let mut json = tree.json_model(root).unwrap();
        json["shape"]["subshapes"][0]["subGeometry"] = json!({ "class": "ellipse" });
        json["visible"] = json!(false);

        assert!(tree.update_json_model(root, json).is_err());
        assert!(tree.get(root).unwrap().object().unwrap().visible);
    }

    /// Path `p` whose single subshape is `geometry`.
    fn path_over(geometry: SubGeometry) -> (ElementTree, ElementId) {
        let mut tree = ElementTree::new();
        let mut path = Path::new(Object::new("p"));
        path.shape = Some(Shape {
            subshapes: vec![Subshape {
                boolean_operation: 0,
                sub_geometry: Some(Box::new(geometry)),
            }],
            ..Default::default()
        });
        let root = tree.build_child(None, ContainerChild::Path(path));
        (tree, root)
    }

    #[test]
    fn test_override_on_path_over_non_empty_group() {
        let mut inner = Group::new(Object::new("g"));
        inner.child_objects = vec![ContainerChild::Text(Text::new(Object::new("t"), "hi"))];
        let (mut tree, root) = path_over(SubGeometry::Group(inner));
        let path = parse_property_path("visible").unwrap();

        tree.apply_override(root, &path, &json!(false), &mut Vec::new(), false).unwrap();

        assert!(!tree.get(root).unwrap().object().unwrap().visible);
        let group = tree.children(root, false)[0];
        assert_eq!(ids(&tree, &tree.descendants(root)), vec!["g", "t"]);
        assert_eq!(tree.get(group).unwrap().kind(), ElementKind::Group);

        let json = tree.json_model(root).unwrap();
        assert_eq!(json["shape"]["subshapes"][0]["subGeometry"]["childObjects"], json!([]));
    }

    #[test]
    fn test_override_on_path_over_bound_instance() {
        let mut master = SymbolMaster::new(Object::new("M"));
        master.child_objects = vec![ContainerChild::Text(Text::new(Object::new("t"), "hi"))];
        let instance = SymbolInstance::new(Object::new("I"), "M");
        let (mut tree, root) = path_over(SubGeometry::SymbolInstance(instance));
        let child = tree.children(root, false)[0];
        tree.set_master(child, &master);
        let path = parse_property_path("visible").unwrap();

        tree.apply_override(root, &path, &json!(false), &mut Vec::new(), false).unwrap();

        assert!(!tree.get(root).unwrap().object().unwrap().visible);
        let Payload::SymbolInstance(state) = tree.get(child).unwrap().payload() else {
            panic!("expected instance");
        };
        assert!(state.is_bound());
        assert_eq!(ids(&tree, &tree.children(child, false)), vec!["t"]);
    }
}
