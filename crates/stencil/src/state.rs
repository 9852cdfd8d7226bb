//! Presenting alternate states of symbol instances.
//!
//! An instance can show another master temporarily (hover, pressed, open)
//! and later return to the one it showed before. Each change re-expands the
//! instance in place with the [`Expander`] it was first expanded with.
//!
//! Presenting a state keeps the children that were on screen: they are moved
//! under a detached [`ElementKind::StateSnapshot`] node that the caller owns,
//! so events aimed at the old state can still be routed. Dropping it is the
//! caller's business ([`ElementTree::remove_subtree`]).
//!
//! [`ElementKind::StateSnapshot`]: crate::element::ElementKind::StateSnapshot

use log::{debug, info};

use crate::{
    element::{Element, ElementId, ElementTree, Payload},
    error::StencilError,
    expand::{ExpandReport, Expander},
};

/// Result of a state change.
#[derive(Debug, Clone)]
pub struct StateChange {
    instance: ElementId,
    master_id: String,
    snapshot: Option<ElementId>,
    expanded: ElementTree,
    report: ExpandReport,
}

impl StateChange {
    /// The instance that changed state.
    pub fn instance(&self) -> ElementId {
        self.instance
    }

    /// The master the instance shows now.
    pub fn master_id(&self) -> &str {
        &self.master_id
    }

    /// Detached node holding the children of the previous state, when a
    /// state was presented.
    pub fn snapshot(&self) -> Option<ElementId> {
        self.snapshot
    }

    /// A copy of the re-expanded instance subtree.
    pub fn expanded(&self) -> &ElementTree {
        &self.expanded
    }

    pub fn report(&self) -> &ExpandReport {
        &self.report
    }
}

/// Find the instance an event listener belongs to.
///
/// Walks up from the node named `descendant_key` to the first instance whose
/// id is `listener_id` or does not end with it.
pub fn find_instance(
    tree: &ElementTree,
    descendant_key: &str,
    listener_id: &str,
) -> Option<ElementId> {
    let root = tree.root()?;
    let mut current = tree.get_element_by_key(root, descendant_key);
    while let Some(id) = current {
        let node = tree.get(id)?;
        if tree.instance(id).is_some() {
            if let Some(object_id) = node.id() {
                if object_id == listener_id || !object_id.ends_with(listener_id) {
                    return Some(id);
                }
            }
        }
        current = node.parent();
    }
    None
}

/// Show master `master_id` in instance `instance`, remembering the current
/// one.
///
/// Returns `Ok(None)` when that master is already shown.
///
/// # Errors
///
/// Fails when `instance` is not a symbol instance or `master_id` names no
/// master known to `expander`. Nothing is changed in that case.
pub fn present_state(
    tree: &mut ElementTree,
    expander: &Expander,
    instance: ElementId,
    master_id: &str,
) -> Result<Option<StateChange>, StencilError> {
    let current = instance_master_id(tree, instance)?;
    if current == master_id {
        debug!(master_id = master_id; "State already presented");
        return Ok(None);
    }
    require_master(expander, master_id)?;

    tree.save_override_tree_if_needed(instance);
    let Some(model) = tree.instance(instance).map(|state| state.model().clone()) else {
        return Ok(None);
    };
    let Some(previous) = tree.present_state(instance, master_id) else {
        return Ok(None);
    };

    let snapshot = tree.insert(Payload::StateSnapshot(Box::new(model)));
    for child in previous {
        tree.add_child(snapshot, Some(child));
    }
    info!(from = current.as_str(), to = master_id; "Presented instance state");

    let mut change = reexpand(tree, expander, instance);
    change.snapshot = Some(snapshot);
    Ok(Some(change))
}

/// Return instance `instance` to the master it showed before the last
/// [`present_state`].
///
/// Returns `Ok(None)` when no state is presented.
///
/// # Errors
///
/// Fails when `instance` is not a symbol instance.
pub fn dismiss_state(
    tree: &mut ElementTree,
    expander: &Expander,
    instance: ElementId,
) -> Result<Option<StateChange>, StencilError> {
    instance_master_id(tree, instance)?;
    tree.save_override_tree_if_needed(instance);

    let Some(previous) = tree.dismiss_state(instance) else {
        debug!(instance = instance.to_string(); "No state to dismiss");
        return Ok(None);
    };
    info!(to = previous.as_str(); "Dismissed instance state");
    Ok(Some(reexpand(tree, expander, instance)))
}

/// Show master `master_id` in instance `instance`, forgetting every
/// presented state.
///
/// # Errors
///
/// Fails when `instance` is not a symbol instance or `master_id` names no
/// master known to `expander`. Nothing is changed in that case.
pub fn set_state(
    tree: &mut ElementTree,
    expander: &Expander,
    instance: ElementId,
    master_id: &str,
) -> Result<StateChange, StencilError> {
    instance_master_id(tree, instance)?;
    require_master(expander, master_id)?;

    tree.save_override_tree_if_needed(instance);
    tree.reset_state(instance);
    for child in tree.update_master_id(instance, master_id) {
        tree.remove_subtree(child);
    }
    info!(to = master_id; "Set instance state");
    Ok(reexpand(tree, expander, instance))
}

fn reexpand(tree: &mut ElementTree, expander: &Expander, instance: ElementId) -> StateChange {
    let report = expander.expand_instance(tree, instance);
    let master_id = tree
        .instance(instance)
        .map(|state| state.master_id().to_string())
        .unwrap_or_default();
    StateChange {
        instance,
        master_id,
        snapshot: None,
        expanded: tree.clone_tree(instance),
        report,
    }
}

fn instance_master_id(tree: &ElementTree, instance: ElementId) -> Result<String, StencilError> {
    tree.instance(instance)
        .map(|state| state.master_id().to_string())
        .ok_or_else(|| {
            let kind = tree
                .get(instance)
                .map_or("missing node".to_string(), |node| node.kind().to_string());
            let id = tree.get(instance).and_then(Element::id).unwrap_or_default();
            StencilError::Expand(format!("node {instance} `{id}` is not a symbol instance ({kind})"))
        })
}

fn require_master(expander: &Expander, master_id: &str) -> Result<(), StencilError> {
    match expander.master(master_id) {
        Some(_) => Ok(()),
        None => Err(StencilError::Expand(format!("unknown master `{master_id}`"))),
    }
}

#[cfg(test)]
mod tests {
    use stencil_core::model::{
        ContainerChild, DesignModel, Frame, Object, SymbolInstance, SymbolMaster, Text,
    };

    use super::*;
    use crate::{config::ExpandConfig, element::ElementKind};

    fn master(id: &str, child: &str) -> ContainerChild {
        let mut master = SymbolMaster::new(Object::new(id));
        master.child_objects = vec![ContainerChild::Text(Text::new(Object::new(child), child))];
        ContainerChild::SymbolMaster(master)
    }

    fn setup() -> (ElementTree, Expander, ElementId) {
        let mut frame = Frame::new(Object::new("page"));
        frame.child_objects = vec![
            master("idle", "label"),
            master("hover", "glow"),
            master("pressed", "shade"),
            ContainerChild::SymbolInstance(SymbolInstance::new(Object::new("button"), "idle")),
        ];
        let model = DesignModel {
            version: "1".to_string(),
            file_type: 0,
            file_name: None,
            frames: vec![frame],
            references: None,
            extra: Default::default(),
        };
        let mut tree = ElementTree::from_document(model);
        let expander = Expander::from_tree(&tree, &ExpandConfig::default());
        expander.expand(&mut tree);
        let button = tree.get_element_by_key(tree.root().unwrap(), "button").unwrap();
        (tree, expander, button)
    }

    fn child_ids(tree: &ElementTree, id: ElementId) -> Vec<String> {
        tree.children(id, false)
            .into_iter()
            .filter_map(|child| tree.get(child)?.id().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_present_keeps_old_children_in_snapshot() {
        let (mut tree, expander, button) = setup();

        let change = present_state(&mut tree, &expander, button, "hover")
            .unwrap()
            .unwrap();

        assert_eq!(change.master_id(), "hover");
        assert_eq!(child_ids(&tree, button), vec!["button__glow"]);
        let snapshot = change.snapshot().unwrap();
        assert_eq!(tree.get(snapshot).unwrap().kind(), ElementKind::StateSnapshot);
        assert_eq!(child_ids(&tree, snapshot), vec!["button__label"]);
        assert_eq!(change.expanded().len(), 2);
        assert_eq!(tree.instance(button).unwrap().state_stack(), ["idle".to_string()]);
    }

    #[test]
    fn test_present_then_dismiss_walks_back() {
        let (mut tree, expander, button) = setup();

        present_state(&mut tree, &expander, button, "hover").unwrap();
        present_state(&mut tree, &expander, button, "pressed").unwrap();
        assert_eq!(child_ids(&tree, button), vec!["button__shade"]);

        let change = dismiss_state(&mut tree, &expander, button).unwrap().unwrap();
        assert_eq!(change.master_id(), "hover");
        assert_eq!(child_ids(&tree, button), vec!["button__glow"]);

        dismiss_state(&mut tree, &expander, button).unwrap();
        assert_eq!(child_ids(&tree, button), vec!["button__label"]);

        assert!(dismiss_state(&mut tree, &expander, button).unwrap().is_none());
        assert_eq!(tree.instance(button).unwrap().master_id(), "idle");
    }

    #[test]
    fn test_present_current_master_is_noop() {
        let (mut tree, expander, button) = setup();

        assert!(present_state(&mut tree, &expander, button, "idle").unwrap().is_none());
        assert!(tree.instance(button).unwrap().baseline().is_none());
    }

    #[test]
    fn test_set_state_clears_history() {
        let (mut tree, expander, button) = setup();
        present_state(&mut tree, &expander, button, "hover").unwrap();

        let change = set_state(&mut tree, &expander, button, "pressed").unwrap();

        assert!(change.snapshot().is_none());
        assert!(tree.instance(button).unwrap().state_stack().is_empty());
        assert_eq!(child_ids(&tree, button), vec!["button__shade"]);
        assert!(!tree.should_keep_listeners(button));
    }

    #[test]
    fn test_baseline_is_taken_before_first_change() {
        let (mut tree, expander, button) = setup();

        present_state(&mut tree, &expander, button, "hover").unwrap();

        let baseline = tree.instance(button).unwrap().baseline().unwrap();
        let root = baseline.root().unwrap();
        assert_eq!(baseline.instance(root).unwrap().master_id(), "idle");
        assert!(tree.should_keep_listeners(button));
    }

    #[test]
    fn test_unknown_master_is_rejected() {
        let (mut tree, expander, button) = setup();

        let err = present_state(&mut tree, &expander, button, "nope").unwrap_err();

        assert!(matches!(err, StencilError::Expand(_)));
        assert_eq!(tree.instance(button).unwrap().master_id(), "idle");
        assert_eq!(child_ids(&tree, button), vec!["button__label"]);
    }

    #[test]
    fn test_non_instance_is_rejected() {
        let (mut tree, expander, _) = setup();
        let root = tree.root().unwrap();

        assert!(set_state(&mut tree, &expander, root, "hover").is_err());
        assert!(dismiss_state(&mut tree, &expander, root).is_err());
    }

    #[test]
    fn test_find_instance_from_descendant() {
        let (tree, _, button) = setup();

        assert_eq!(find_instance(&tree, "button__label", "button"), Some(button));
        assert_eq!(find_instance(&tree, "page", "button"), None);
        assert_eq!(find_instance(&tree, "missing", "button"), None);
    }
}
