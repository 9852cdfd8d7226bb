//! Model structures for design documents.
//!
//! These are the serde types a design document deserializes into. Variants
//! are distinguished by their `class` field:
//!
//! - [`ContainerChild`]: anything that can sit in a container's `childObjects`
//! - [`SubGeometry`]: anything that can sit in a path subshape
//! - [`Reference`]: shared definitions in [`DesignModel::references`]
//!
//! Every object carries an [`Object`] header with its identity, geometry and
//! style. Fields this crate does not model are kept verbatim in
//! [`Object::extra`] so that documents round-trip without loss.
//!
//! # Example
//!
//! ```
//! use stencil_core::model::ContainerChild;
//!
//! let json = r#"{ "class": "group", "id": "g1", "childObjects": [] }"#;
//! let child: ContainerChild = serde_json::from_str(json).unwrap();
//! assert_eq!(child.object().id, "g1");
//! assert_eq!(child.class_name(), "group");
//! ```

mod container;
mod document;
mod geometry;
mod object;
mod style;
mod symbol;
mod text;

pub use container::{ContainerChild, Frame, Group, SymbolMaster};
pub use document::{DesignModel, Reference, ReferencedStyle};
pub use geometry::{
    Contour, Ellipse, Path, PointAttr, Polygon, Rectangle, Shape, Star, SubGeometry, Subshape,
    VectorNetwork,
};
pub use object::{AlphaMask, GraphicsContextSettings, Object, Rect};
pub use style::{Blur, Border, Color, Fill, Shadow, Style};
pub use symbol::{OverrideValue, SymbolInstance, VariableAssign, VariableDefine, VariableRefer};
pub use text::{Image, Text};

/// Callbacks for a depth-first walk over a document's objects.
///
/// Every method has an empty default, so implementors only override what
/// they care about. The walk visits frames, container children, path
/// sub-geometry objects and masters stored in `references`.
pub trait Visitor {
    /// Called once for every object, before its children.
    fn visit_object(&mut self, _object: &Object) {}

    /// Called for every symbol instance, after [`Visitor::visit_object`].
    fn visit_instance(&mut self, _instance: &SymbolInstance) {}

    /// Called for every symbol master, after [`Visitor::visit_object`].
    fn visit_master(&mut self, _master: &SymbolMaster) {}
}

/// Walks one container child and everything below it.
pub fn walk_child(child: &ContainerChild, visitor: &mut impl Visitor) {
    visitor.visit_object(child.object());
    match child {
        ContainerChild::Frame(frame) => walk_children(&frame.child_objects, visitor),
        ContainerChild::Group(group) => walk_children(&group.child_objects, visitor),
        ContainerChild::SymbolMaster(master) => {
            visitor.visit_master(master);
            walk_children(&master.child_objects, visitor);
        }
        ContainerChild::SymbolInstance(instance) => visitor.visit_instance(instance),
        ContainerChild::Path(path) => walk_path(path, visitor),
        ContainerChild::Text(_) | ContainerChild::Image(_) => {}
    }
}

fn walk_children(children: &[ContainerChild], visitor: &mut impl Visitor) {
    for child in children {
        walk_child(child, visitor);
    }
}

fn walk_path(path: &Path, visitor: &mut impl Visitor) {
    let Some(shape) = &path.shape else {
        return;
    };
    for geometry in shape.subshapes.iter().filter_map(|s| s.sub_geometry.as_deref()) {
        if let Some(child) = geometry.clone().into_child() {
            walk_child(&child, visitor);
        }
    }
}

impl DesignModel {
    /// Walks every frame and every master in `references`.
    pub fn walk(&self, visitor: &mut impl Visitor) {
        for frame in &self.frames {
            visitor.visit_object(&frame.object);
            walk_children(&frame.child_objects, visitor);
        }
        for reference in self.references.iter().flatten() {
            if let Reference::SymbolMaster(master) = reference {
                visitor.visit_object(&master.object);
                visitor.visit_master(master);
                walk_children(&master.child_objects, visitor);
            }
        }
    }
}
