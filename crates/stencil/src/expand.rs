//! The symbol expansion pass.
//!
//! [`Expander`] turns a freshly built tree into a concrete one. Every symbol
//! instance is bound to a private copy of its master, nested instances are
//! expanded first, and the copied subtree is renamed so that its ids are
//! unique across the document:
//!
//! ```text
//! instance I1 ── master M ── instance I2 ── master N ── leaf x
//!
//! I1          I1
//! I2    ->    I1__I2
//! x           I1__I2__x
//! ```
//!
//! Once renamed, the instance's variables are bound and its overrides are
//! applied. Overrides that swap a nested instance's master run first,
//! shallowest key chain first; every other override follows in document
//! order. Finally the subtree is rescaled when the instance is sized
//! differently from its master.

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use stencil_core::{
    model::{OverrideValue, Reference, ReferencedStyle, SubGeometry, SymbolMaster},
    path::{PathSegment, PropertyPath},
};
use stencil_parser::parse_property_path;

use crate::{
    config::ExpandConfig,
    element::{Element, ElementId, ElementKind, ElementTree, KEY_SEPARATOR, Payload, original_id},
    variables,
};

/// Outcome of an expansion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandReport {
    expanded: usize,
    unresolved: Vec<String>,
    cycles: usize,
    overrides_applied: usize,
    overrides_skipped: usize,
    dirty_ids: Vec<String>,
}

impl ExpandReport {
    /// Number of instance expansions performed, re-expansions included.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Master ids that were referenced but not found, without duplicates.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Number of instances left unexpanded because their master was
    /// already being expanded further up.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn overrides_applied(&self) -> usize {
        self.overrides_applied
    }

    pub fn overrides_skipped(&self) -> usize {
        self.overrides_skipped
    }

    /// Ids of objects whose data changed through overrides or variables.
    pub fn dirty_ids(&self) -> &[String] {
        &self.dirty_ids
    }
}

/// Expands symbol instances against a set of known masters.
#[derive(Debug, Clone, Default)]
pub struct Expander {
    masters: IndexMap<String, SymbolMaster>,
    styles: IndexMap<String, ReferencedStyle>,
    config: ExpandConfig,
}

impl Expander {
    /// Create an expander that knows no masters yet.
    pub fn new(config: ExpandConfig) -> Self {
        Self {
            masters: IndexMap::new(),
            styles: IndexMap::new(),
            config,
        }
    }

    /// Collect the masters and shared styles of an unexpanded tree.
    ///
    /// Masters come from every symbol master node, in document order, and
    /// from the references of the document root. Shared styles come from
    /// the references only.
    pub fn from_tree(tree: &ElementTree, config: &ExpandConfig) -> Self {
        let mut expander = Self::new(config.clone());
        let Some(root) = tree.root() else {
            return expander;
        };

        for id in std::iter::once(root).chain(tree.descendants(root)) {
            if tree.get(id).is_some_and(|node| node.kind() == ElementKind::SymbolMaster) {
                if let Some(SubGeometry::SymbolMaster(master)) = tree.tree_to_model(id, false) {
                    expander.add_master(master);
                }
            }
        }

        if let Some(Payload::Document(model)) = tree.get(root).map(Element::payload) {
            for master in model.referenced_masters() {
                expander.add_master(master.clone());
            }
            for reference in model.references.iter().flatten() {
                if let Reference::ReferencedStyle(style) = reference {
                    expander.add_referenced_style(style.clone());
                }
            }
        }

        debug!(
            masters = expander.masters.len(),
            styles = expander.styles.len();
            "Collected masters"
        );
        expander
    }

    /// Register `master`, replacing any earlier master with the same id.
    pub fn add_master(&mut self, master: SymbolMaster) {
        self.masters.insert(master.object.id.clone(), master);
    }

    pub fn add_referenced_style(&mut self, style: ReferencedStyle) {
        self.styles.insert(style.id.clone(), style);
    }

    pub fn master(&self, id: &str) -> Option<&SymbolMaster> {
        self.masters.get(id)
    }

    pub fn masters(&self) -> impl Iterator<Item = &SymbolMaster> {
        self.masters.values()
    }

    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    /// Expand every instance of `tree` in document order.
    pub fn expand(&self, tree: &mut ElementTree) -> ExpandReport {
        let mut pass = Pass::new(self);
        if let Some(root) = tree.root() {
            pass.walk(tree, root, &mut Vec::new());
        }
        pass.report
    }

    /// Expand instance `id` again in place, against the master it names now.
    ///
    /// The instance keeps its current, already unique id; its children are
    /// rebuilt from the master and renamed below that id.
    pub fn expand_instance(&self, tree: &mut ElementTree, id: ElementId) -> ExpandReport {
        let mut pass = Pass::new(self);
        let Some(object_id) = tree.get(id).and_then(Element::id) else {
            return pass.report;
        };
        let mut stack: Vec<String> = object_id.split(KEY_SEPARATOR).map(str::to_string).collect();
        pass.expand_instance(tree, id, &mut stack, true);
        pass.report
    }
}

/// State of one expansion run.
struct Pass<'a> {
    expander: &'a Expander,
    /// Masters currently being expanded, outermost first.
    visiting: Vec<String>,
    report: ExpandReport,
}

impl<'a> Pass<'a> {
    fn new(expander: &'a Expander) -> Self {
        Self {
            expander,
            visiting: Vec::new(),
            report: ExpandReport::default(),
        }
    }

    fn walk(&mut self, tree: &mut ElementTree, id: ElementId, stack: &mut Vec<String>) {
        if tree.instance(id).is_some() {
            self.expand_instance(tree, id, stack, false);
            return;
        }
        for child in tree.children(id, false) {
            self.walk(tree, child, stack);
        }
    }

    /// Bind, rename, override and scale instance `id`.
    ///
    /// `stack` holds the ids of the enclosing instances. Unless `again` is
    /// set the instance's own id is pushed for the duration of the call;
    /// re-expansions already carry it.
    fn expand_instance(
        &mut self,
        tree: &mut ElementTree,
        id: ElementId,
        stack: &mut Vec<String>,
        again: bool,
    ) {
        let expander = self.expander;
        let Some(state) = tree.instance(id) else {
            return;
        };
        let master_id = state.master_id().to_string();
        let instance_id = state.model().object.id.clone();

        let Some(master) = expander.masters.get(&master_id) else {
            warn!(
                instance_id = instance_id.as_str(),
                master_id = master_id.as_str();
                "Unknown master, leaving instance unbound"
            );
            if !self.report.unresolved.contains(&master_id) {
                self.report.unresolved.push(master_id);
            }
            return;
        };
        if self.visiting.contains(&master_id) {
            warn!(
                instance_id = instance_id.as_str(),
                master_id = master_id.as_str();
                "Master instantiates itself, leaving instance unexpanded"
            );
            self.report.cycles += 1;
            return;
        }

        debug!(
            instance_id = instance_id.as_str(),
            master_id = master_id.as_str(),
            again = again;
            "Expanding instance"
        );
        tree.set_master(id, master);
        self.visiting.push(master_id.clone());
        if !again {
            stack.push(instance_id.clone());
        }

        for child in tree.children(id, false) {
            self.walk(tree, child, stack);
        }

        let joined = stack.join(KEY_SEPARATOR);
        let prefix = format!("{joined}{KEY_SEPARATOR}");
        if joined != instance_id {
            debug!(from = instance_id.as_str(), to = joined.as_str(); "Renaming instance");
        }
        if let Some(object) = tree.object_mut(id) {
            object.id = joined;
        }
        prefix_subtree(tree, id, &prefix);
        tree.make_mask_id_unique(id, id, &prefix);

        if expander.config.apply_variables() {
            variables::bind_variables(tree, id, &mut self.report.dirty_ids);
        }
        self.apply_overrides(tree, id, &master_id, stack);

        if !again {
            stack.pop();
        }
        if expander.config.scale_instances() {
            scale_from_master(tree, id, master);
        }
        self.visiting.pop();
        self.report.expanded += 1;
    }

    fn apply_overrides(
        &mut self,
        tree: &mut ElementTree,
        id: ElementId,
        master_id: &str,
        stack: &[String],
    ) {
        let overrides = tree
            .instance(id)
            .map(|state| state.model().override_values.clone())
            .unwrap_or_default();
        let (mut swaps, others): (Vec<OverrideValue>, Vec<OverrideValue>) =
            overrides.into_iter().partition(OverrideValue::is_master_swap);

        swaps.sort_by_key(|item| item.object_id_chain.len());
        for item in &swaps {
            self.swap_master(tree, id, master_id, stack, item);
        }
        for item in others.iter().filter(|item| !item.property_path.is_empty()) {
            self.apply_property(tree, id, master_id, stack, item);
        }
    }

    /// Point a nested instance at another master and expand it again.
    fn swap_master(
        &mut self,
        tree: &mut ElementTree,
        id: ElementId,
        master_id: &str,
        stack: &[String],
        item: &OverrideValue,
    ) {
        let Some(new_master) = item.value.as_str() else {
            self.skip(item, "master id override value is not a string");
            return;
        };
        let Some((target, mut scope)) = find_target(tree, id, master_id, stack, item) else {
            self.skip(item, "override target not found");
            return;
        };
        if tree.instance(target).is_none() {
            self.skip(item, "master id override target is not an instance");
            return;
        }

        debug!(
            target = target.to_string(),
            master_id = new_master;
            "Swapping master of nested instance"
        );
        for child in tree.update_master_id(target, new_master) {
            tree.remove_subtree(child);
        }
        if target != id {
            if let Some(state) = tree.instance_mut(target) {
                state.model_mut().override_values.clear();
            }
        }
        self.report.overrides_applied += 1;
        self.expand_instance(tree, target, &mut scope, true);
    }

    fn apply_property(
        &mut self,
        tree: &mut ElementTree,
        id: ElementId,
        master_id: &str,
        stack: &[String],
        item: &OverrideValue,
    ) {
        let Some((target, _)) = find_target(tree, id, master_id, stack, item) else {
            self.skip(item, "override target not found");
            return;
        };
        let path = match parse_property_path(&item.property_path) {
            Ok(path) => path,
            Err(err) => {
                warn!(path = item.property_path.as_str(), err:err; "Invalid override path");
                self.report.overrides_skipped += 1;
                return;
            }
        };

        if let Some(style_id) = self.referenced_style_id(&path, &item.value) {
            match self.expander.styles.get(style_id) {
                Some(style) => {
                    debug!(target = target.to_string(), style_id = style_id; "Applying shared style");
                    tree.update(target, style);
                    self.report.overrides_applied += 1;
                }
                None => self.skip(item, "unknown shared style"),
            }
            return;
        }

        match tree.apply_override(target, &path, &item.value, &mut self.report.dirty_ids, false) {
            Ok(()) => self.report.overrides_applied += 1,
            Err(err) => {
                warn!(
                    target = target.to_string(),
                    path = item.property_path.as_str(),
                    err:err;
                    "Skipping override"
                );
                self.report.overrides_skipped += 1;
            }
        }
    }

    /// The shared style an override names, if it is a style link.
    fn referenced_style_id<'v>(
        &self,
        path: &PropertyPath,
        value: &'v Value,
    ) -> Option<&'v str> {
        if !self.expander.config.resolve_referenced_styles() {
            return None;
        }
        if path.last().and_then(PathSegment::as_name) != Some("style") {
            return None;
        }
        value
            .as_str()
            .filter(|id| id.starts_with(ReferencedStyle::ID_PREFIX))
    }

    fn skip(&mut self, item: &OverrideValue, reason: &str) {
        warn!(
            chain = item.object_id_chain.join(KEY_SEPARATOR),
            path = item.property_path.as_str(),
            reason = reason;
            "Skipping override"
        );
        self.report.overrides_skipped += 1;
    }
}

/// Resolve the node an override addresses inside instance `id`.
///
/// Returns the node and the instance id stack to expand it with. A chain
/// naming only the instance's own master addresses the instance itself.
fn find_target(
    tree: &ElementTree,
    id: ElementId,
    master_id: &str,
    stack: &[String],
    item: &OverrideValue,
) -> Option<(ElementId, Vec<String>)> {
    let chain = &item.object_id_chain;
    if chain.is_empty() {
        return None;
    }
    if chain.len() == 1 && chain[0] == master_id {
        return Some((id, stack.to_vec()));
    }

    let mut scope = stack.to_vec();
    let target = tree.find_element_by_key(id, chain, Some(&mut scope))?;
    if let Some(object_id) = tree.get(target).and_then(Element::id) {
        scope.push(original_id(object_id).to_string());
    }
    Some((target, scope))
}

/// Prefix every id below `id`, leaving expanded nested instances alone.
fn prefix_subtree(tree: &mut ElementTree, id: ElementId, prefix: &str) {
    for child in tree.children(id, false) {
        if tree.instance(child).is_some_and(|state| state.is_bound()) {
            continue;
        }
        tree.add_key_prefix(child, prefix);
        prefix_subtree(tree, child, prefix);
    }
}

/// Scale the subtree of instance `id` by the ratio of its size to the
/// master's.
fn scale_from_master(tree: &mut ElementTree, id: ElementId, master: &SymbolMaster) {
    let Some(bounds) = tree.get(id).and_then(Element::object).map(|object| object.bounds) else {
        return;
    };
    let from = master.object.bounds;
    if from.width == bounds.width && from.height == bounds.height {
        return;
    }
    if from.width == 0.0 || from.height == 0.0 {
        debug!(master_id = master.object.id.as_str(); "Master has no area, not scaling");
        return;
    }

    let sx = bounds.width / from.width;
    let sy = bounds.height / from.height;
    debug!(node = id.to_string(), sx = sx, sy = sy; "Scaling instance children");

    for node in tree.descendants(id) {
        let Some(element) = tree.get_mut(node) else {
            continue;
        };
        match element.payload_mut() {
            Payload::Contour(contour) => {
                for point in &mut contour.points {
                    point.scale(sx, sy);
                }
            }
            payload => {
                let Some(object) = payload.object_mut() else {
                    continue;
                };
                object.bounds.scale(sx, sy);
                if let Some(frame) = object.frame.as_mut() {
                    frame.scale(sx, sy);
                }
                if let [_, _, _, _, tx, ty] = object.matrix.as_mut_slice() {
                    *tx *= sx;
                    *ty *= sy;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use stencil_core::model::{
        AlphaMask, Color, ContainerChild, Contour, DesignModel, Fill, Frame, Object, Path,
        PointAttr, Rect, Shape, Style, Subshape, SymbolInstance, Text,
    };

    use super::*;

    fn text(id: &str) -> ContainerChild {
        ContainerChild::Text(Text::new(Object::new(id), id))
    }

    fn master(id: &str, children: Vec<ContainerChild>) -> ContainerChild {
        let mut master = SymbolMaster::new(Object::new(id));
        master.child_objects = children;
        ContainerChild::SymbolMaster(master)
    }

    fn instance(id: &str, master_id: &str, overrides: Vec<OverrideValue>) -> ContainerChild {
        let mut instance = SymbolInstance::new(Object::new(id), master_id);
        instance.override_values = overrides;
        ContainerChild::SymbolInstance(instance)
    }

    fn document(children: Vec<ContainerChild>, references: Option<Vec<Reference>>) -> DesignModel {
        let mut frame = Frame::new(Object::new("page"));
        frame.child_objects = children;
        DesignModel {
            version: "1".to_string(),
            file_type: 0,
            file_name: None,
            frames: vec![frame],
            references,
            extra: Default::default(),
        }
    }

    fn expand(model: DesignModel) -> (ElementTree, ExpandReport) {
        let mut tree = ElementTree::from_document(model);
        let expander = Expander::from_tree(&tree, &ExpandConfig::default());
        let report = expander.expand(&mut tree);
        (tree, report)
    }

    fn find(tree: &ElementTree, key: &str) -> Option<ElementId> {
        tree.get_element_by_key(tree.root().unwrap(), key)
    }

    fn child_ids(tree: &ElementTree, id: ElementId) -> Vec<String> {
        tree.children(id, false)
            .into_iter()
            .filter_map(|child| tree.get(child)?.id().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_collects_masters_from_tree_and_references() {
        let mut referenced = SymbolMaster::new(Object::new("R"));
        referenced.child_objects = vec![text("r")];
        let model = document(
            vec![master("M", vec![text("a")])],
            Some(vec![Reference::SymbolMaster(referenced)]),
        );
        let tree = ElementTree::from_document(model);

        let expander = Expander::from_tree(&tree, &ExpandConfig::default());

        let ids: Vec<&str> = expander.masters().map(|m| m.object.id.as_str()).collect();
        assert_eq!(ids, vec!["M", "R"]);
        assert_eq!(expander.master("M").unwrap().child_objects.len(), 1);
    }

    #[test]
    fn test_unknown_master_is_left_unbound() {
        let (tree, report) = expand(document(vec![instance("I", "missing", vec![])], None));

        let id = find(&tree, "I").unwrap();
        assert!(!tree.instance(id).unwrap().is_bound());
        assert_eq!(report.unresolved().to_vec(), vec!["missing"]);
        assert_eq!(report.expanded(), 0);
    }

    #[test]
    fn test_nested_instances_are_renamed_by_stack() {
        let (tree, report) = expand(document(
            vec![
                master("N", vec![text("x")]),
                master("M", vec![instance("I2", "N", vec![])]),
                instance("I1", "M", vec![]),
            ],
            None,
        ));

        let outer = find(&tree, "I1").unwrap();
        assert_eq!(child_ids(&tree, outer), vec!["I1__I2"]);
        let inner = find(&tree, "I1__I2").unwrap();
        assert_eq!(child_ids(&tree, inner), vec!["I1__I2__x"]);
        assert_eq!(report.cycles(), 0);
    }

    #[test]
    fn test_self_instantiating_master_stops() {
        let (tree, report) = expand(document(
            vec![master("A", vec![instance("loop", "A", vec![])]), instance("I", "A", vec![])],
            None,
        ));

        let id = find(&tree, "I").unwrap();
        let nested = tree.children(id, false)[0];
        assert!(tree.instance(id).unwrap().is_bound());
        assert!(!tree.instance(nested).unwrap().is_bound());
        assert!(report.cycles() > 0);
    }

    #[test]
    fn test_master_swap_reexpands_nested_instance() {
        let swap = OverrideValue::new(vec!["n".to_string()], "masterId", json!("B"));
        let (tree, report) = expand(document(
            vec![
                master("A", vec![text("a")]),
                master("B", vec![text("b")]),
                master("M", vec![instance("n", "A", vec![])]),
                instance("I", "M", vec![swap]),
            ],
            None,
        ));

        let nested = find(&tree, "I__n").unwrap();
        assert_eq!(tree.instance(nested).unwrap().master_id(), "B");
        assert_eq!(child_ids(&tree, nested), vec!["I__n__b"]);
        assert!(find(&tree, "I__n__a").is_none());
        assert_eq!(report.overrides_applied(), 1);
    }

    #[test]
    fn test_override_naming_own_master_targets_instance() {
        let rename = OverrideValue::new(vec!["M".to_string()], "name", json!("Renamed"));
        let (tree, _) = expand(document(
            vec![master("M", vec![text("a")]), instance("I", "M", vec![rename])],
            None,
        ));

        let id = find(&tree, "I").unwrap();
        assert_eq!(tree.get(id).unwrap().object().unwrap().name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn test_shared_style_override() {
        let blue = Style {
            fills: vec![Fill::solid(Color::new(0.0, 0.0, 1.0, 1.0))],
            ..Default::default()
        };
        let shared = ReferencedStyle {
            id: "referenced_style_blue".to_string(),
            style: blue.clone(),
            context_settings: None,
            font_attr: None,
        };
        let link = OverrideValue::new(vec!["a".to_string()], "style", json!("referenced_style_blue"));
        let (tree, report) = expand(document(
            vec![master("M", vec![text("a")]), instance("I", "M", vec![link])],
            Some(vec![Reference::ReferencedStyle(shared)]),
        ));

        let id = find(&tree, "I__a").unwrap();
        assert_eq!(tree.get(id).unwrap().object().unwrap().style, blue);
        assert_eq!(report.overrides_skipped(), 0);
    }

    #[test]
    fn test_failed_override_is_skipped() {
        let bad = OverrideValue::new(vec!["a".to_string()], "style.fills.3.color", json!({}));
        let missing = OverrideValue::new(vec!["nope".to_string()], "visible", json!(false));
        let (tree, report) = expand(document(
            vec![master("M", vec![text("a")]), instance("I", "M", vec![bad, missing])],
            None,
        ));

        assert!(find(&tree, "I__a").is_some());
        assert_eq!(report.overrides_skipped(), 2);
        assert_eq!(report.expanded(), 1);
    }

    #[test]
    fn test_mask_references_follow_prefix_only_inside_instance() {
        let mut masked = Object::new("shape");
        masked.alpha_mask_by = vec![AlphaMask {
            id: "mask".to_string(),
            alpha_type: 0,
            crop: false,
        }];
        masked.outline_mask_by = vec!["mask".to_string(), "outside".to_string()];
        let (tree, _) = expand(document(
            vec![
                master(
                    "M",
                    vec![
                        ContainerChild::Path(Path::new(Object::new("mask"))),
                        ContainerChild::Path(Path::new(masked)),
                    ],
                ),
                text("outside"),
                instance("I", "M", vec![]),
            ],
            None,
        ));

        let id = find(&tree, "I__shape").unwrap();
        let object = tree.get(id).unwrap().object().unwrap();
        assert_eq!(object.alpha_mask_by[0].id, "I__mask");
        assert_eq!(object.outline_mask_by, vec!["I__mask", "outside"]);
    }

    #[test]
    fn test_children_scale_with_instance_size() {
        let mut child = Object::new("box");
        child.bounds = Rect::new(10.0, 10.0, 20.0, 20.0);
        child.frame = Some(Rect::new(10.0, 10.0, 20.0, 20.0));
        child.matrix = vec![1.0, 0.0, 0.0, 1.0, 10.0, 10.0];
        let mut path = Path::new(child);
        path.shape = Some(Shape {
            subshapes: vec![Subshape {
                boolean_operation: 0,
                sub_geometry: Some(Box::new(SubGeometry::Contour(Contour {
                    closed: true,
                    points: vec![PointAttr {
                        point: vec![20.0, 20.0],
                        curve_from: None,
                        curve_to: None,
                        radius: None,
                        corner_style: None,
                    }],
                }))),
            }],
            ..Default::default()
        });

        let mut model = SymbolMaster::new(Object::new("M"));
        model.object.bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        model.child_objects = vec![ContainerChild::Path(path)];
        let mut placed = SymbolInstance::new(Object::new("I"), "M");
        placed.object.bounds = Rect::new(0.0, 0.0, 200.0, 100.0);

        let (tree, _) = expand(document(
            vec![
                ContainerChild::SymbolMaster(model),
                ContainerChild::SymbolInstance(placed),
            ],
            None,
        ));

        let id = find(&tree, "I__box").unwrap();
        let object = tree.get(id).unwrap().object().unwrap();
        assert_approx_eq!(f64, object.bounds.x, 20.0);
        assert_approx_eq!(f64, object.bounds.width, 40.0);
        assert_approx_eq!(f64, object.bounds.height, 40.0);
        assert_approx_eq!(f64, object.matrix[4], 20.0);
        assert_approx_eq!(f64, object.matrix[5], 20.0);
        assert_eq!(object.frame, Some(object.bounds));

        let contour = tree.children(id, false)[0];
        let Payload::Contour(contour) = tree.get(contour).unwrap().payload() else {
            panic!("expected contour");
        };
        assert_approx_eq!(f64, contour.points[0].point[0], 40.0);
        assert_approx_eq!(f64, contour.points[0].point[1], 40.0);
    }

    #[test]
    fn test_scaling_can_be_disabled() {
        let mut child = Object::new("box");
        child.bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut model = SymbolMaster::new(Object::new("M"));
        model.object.bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        model.child_objects = vec![ContainerChild::Text(Text::new(child, ""))];
        let mut placed = SymbolInstance::new(Object::new("I"), "M");
        placed.object.bounds = Rect::new(0.0, 0.0, 30.0, 30.0);

        let mut tree = ElementTree::from_document(document(
            vec![
                ContainerChild::SymbolMaster(model),
                ContainerChild::SymbolInstance(placed),
            ],
            None,
        ));
        let config = ExpandConfig::new(false, true, true);
        Expander::from_tree(&tree, &config).expand(&mut tree);

        let id = find(&tree, "I__box").unwrap();
        assert_approx_eq!(f64, tree.get(id).unwrap().object().unwrap().bounds.width, 10.0);
    }

    #[test]
    fn test_expand_instance_again_keeps_id() {
        let (mut tree, _) = expand(document(
            vec![
                master("A", vec![text("a")]),
                master("B", vec![text("b")]),
                instance("I", "A", vec![]),
            ],
            None,
        ));
        let expander = Expander::from_tree(&tree, &ExpandConfig::default());
        let id = find(&tree, "I").unwrap();

        for child in tree.update_master_id(id, "B") {
            tree.remove_subtree(child);
        }
        let report = expander.expand_instance(&mut tree, id);

        assert_eq!(report.expanded(), 1);
        assert_eq!(tree.get(id).unwrap().id(), Some("I"));
        assert_eq!(child_ids(&tree, id), vec!["I__b"]);
    }
}
