//! Building the tree from model structures and materializing it back.
//!
//! Building consumes each container's child list into tree children, so a
//! built payload never holds children of its own. Materializing copies each
//! payload and refills its child list from the tree.

use std::mem;

use log::warn;

use stencil_core::model::{ContainerChild, DesignModel, Frame, Path, SubGeometry, SymbolMaster};

use super::{ElementId, ElementTree, Payload};

impl ElementTree {
    /// Build a tree from a whole document, with the document as root.
    pub fn from_document(model: DesignModel) -> Self {
        let mut tree = ElementTree::new();
        let root = tree.insert(Payload::Document(Box::new(model)));
        tree.build_subtree(root);
        tree.set_root(root);
        tree
    }

    /// Build `child` and its subtree, appending it to `parent` when given.
    pub fn build_child(&mut self, parent: Option<ElementId>, child: ContainerChild) -> ElementId {
        let id = self.insert(Payload::from_child(child));
        if let Some(parent) = parent {
            self.add_child(parent, Some(id));
        }
        self.build_subtree(id);
        id
    }

    /// Move the child list held in the payload of `id` into the tree.
    pub(crate) fn build_subtree(&mut self, id: ElementId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let children: Vec<SubGeometry> = match node.payload_mut() {
            Payload::Document(model) => mem::take(&mut model.frames)
                .into_iter()
                .map(SubGeometry::Frame)
                .collect(),
            Payload::Frame(frame) => take_children(&mut frame.child_objects),
            Payload::Group(group) => take_children(&mut group.child_objects),
            Payload::SymbolMaster(master) => take_children(&mut master.child_objects),
            Payload::Path(path) => path
                .shape
                .iter_mut()
                .flat_map(|shape| shape.subshapes.iter_mut())
                .filter_map(|subshape| subshape.sub_geometry.take())
                .map(|geometry| *geometry)
                .collect(),
            _ => Vec::new(),
        };

        for geometry in children {
            let child = self.insert(Payload::from_sub_geometry(geometry));
            self.add_child(id, Some(child));
            self.build_subtree(child);
        }
    }

    /// Mark every container in the subtree of `id` as storing newest-first.
    pub fn mark_first_on_top(&mut self, id: ElementId) {
        for node in std::iter::once(id).chain(self.descendants(id)) {
            let is_container = self.get(node).is_some_and(|n| n.kind().is_container());
            if is_container {
                self.set_first_on_top(node, true);
            }
        }
    }

    /// The node `id` alone as a model value.
    ///
    /// Containers come back with an empty child list; a path comes back
    /// without its sub-geometry.
    pub fn to_model(&self, id: ElementId) -> Option<SubGeometry> {
        self.get(id)?.payload().to_model()
    }

    /// The subtree rooted at `id` as a model value.
    ///
    /// Child lists are refilled from the tree, reversed for first-on-top
    /// containers when `reverse_if_first_on_top` is set. A bound instance
    /// comes back as a master-shaped value carrying the instance's own
    /// fields and the expanded children.
    pub fn tree_to_model(
        &self,
        id: ElementId,
        reverse_if_first_on_top: bool,
    ) -> Option<SubGeometry> {
        let node = self.get(id)?;
        let children = || self.child_models(id, reverse_if_first_on_top);

        let geometry = match node.payload() {
            Payload::Document(_) => return None,
            Payload::Frame(frame) => {
                let mut frame = (**frame).clone();
                frame.child_objects = children();
                SubGeometry::Frame(frame)
            }
            Payload::Group(group) => {
                let mut group = (**group).clone();
                group.child_objects = children();
                SubGeometry::Group(group)
            }
            Payload::SymbolMaster(master) => {
                let mut master = (**master).clone();
                master.child_objects = children();
                SubGeometry::SymbolMaster(master)
            }
            Payload::SymbolInstance(state) => match state.master() {
                Some(master) => SubGeometry::SymbolMaster(SymbolMaster {
                    object: state.model().object.clone(),
                    child_objects: children(),
                    radius: master.radius.clone(),
                }),
                None => SubGeometry::SymbolInstance(state.model().clone()),
            },
            Payload::StateSnapshot(model) => SubGeometry::SymbolMaster(SymbolMaster {
                object: model.object.clone(),
                child_objects: children(),
                radius: model.radius.clone(),
            }),
            Payload::Path(path) => {
                let mut path = (**path).clone();
                self.fill_sub_geometry(id, &mut path, reverse_if_first_on_top);
                SubGeometry::Path(path)
            }
            payload => payload.to_model()?,
        };
        Some(geometry)
    }

    /// The subtree rooted at `id` as a container child.
    pub fn tree_to_child(
        &self,
        id: ElementId,
        reverse_if_first_on_top: bool,
    ) -> Option<ContainerChild> {
        self.tree_to_model(id, reverse_if_first_on_top)?.into_child()
    }

    /// The whole tree as a document. `None` unless the root is a document.
    pub fn to_document(&self, reverse_if_first_on_top: bool) -> Option<DesignModel> {
        let root = self.root()?;
        let Payload::Document(model) = self.get(root)?.payload() else {
            return None;
        };
        let mut model = (**model).clone();
        model.frames = self
            .children(root, reverse_if_first_on_top)
            .into_iter()
            .filter_map(|child| match self.tree_to_model(child, reverse_if_first_on_top) {
                Some(SubGeometry::Frame(frame)) => Some(frame),
                Some(other) => {
                    let id = other.object().map_or("", |object| object.id.as_str());
                    warn!(id = id; "Dropping non-frame top-level node");
                    None
                }
                None => None,
            })
            .collect::<Vec<Frame>>();
        Some(model)
    }

    fn child_models(&self, id: ElementId, reverse_if_first_on_top: bool) -> Vec<ContainerChild> {
        self.children(id, reverse_if_first_on_top)
            .into_iter()
            .filter_map(|child| self.tree_to_child(child, reverse_if_first_on_top))
            .collect()
    }

    /// Put the models of the children of path `id` back into its subshapes.
    pub(crate) fn fill_sub_geometry(
        &self,
        id: ElementId,
        path: &mut Path,
        reverse_if_first_on_top: bool,
    ) {
        let Some(shape) = path.shape.as_mut() else {
            return;
        };
        let children = self.children(id, false);
        for (subshape, child) in shape.subshapes.iter_mut().zip(children) {
            subshape.sub_geometry = self
                .tree_to_model(child, reverse_if_first_on_top)
                .map(Box::new);
        }
    }
}

fn take_children(children: &mut Vec<ContainerChild>) -> Vec<SubGeometry> {
    mem::take(children).into_iter().map(SubGeometry::from).collect()
}
