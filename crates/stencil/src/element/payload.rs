//! Typed node payloads.
//!
//! Every [`Element`](super::Element) holds exactly one [`Payload`]. The
//! variant fixes the node's [`ElementKind`] for its whole life; edits replace
//! the data inside a variant, never the variant itself.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use stencil_core::model::{
    ContainerChild, Contour, DesignModel, Ellipse, Frame, Group, Image, Object, Path, Polygon,
    Rectangle, Star, SubGeometry, SymbolInstance, SymbolMaster, Text, VectorNetwork,
};

use super::instance::SymbolInstanceState;
use crate::error::OverrideError;

/// The variant tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Document,
    Frame,
    Group,
    SymbolMaster,
    SymbolInstance,
    Text,
    Image,
    Path,
    Contour,
    Ellipse,
    Polygon,
    Rectangle,
    Star,
    VectorNetwork,
    StateSnapshot,
}

impl ElementKind {
    /// Returns `true` for kinds whose children come from a `childObjects` list.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Frame
                | Self::Group
                | Self::SymbolMaster
                | Self::SymbolInstance
                | Self::StateSnapshot
        )
    }

    fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Frame => "frame",
            Self::Group => "group",
            Self::SymbolMaster => "symbolMaster",
            Self::SymbolInstance => "symbolInstance",
            Self::Text => "text",
            Self::Image => "image",
            Self::Path => "path",
            Self::Contour => "contour",
            Self::Ellipse => "ellipse",
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::Star => "star",
            Self::VectorNetwork => "vectorNetwork",
            Self::StateSnapshot => "stateSnapshot",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&SubGeometry> for ElementKind {
    fn from(geometry: &SubGeometry) -> Self {
        match geometry {
            SubGeometry::Contour(_) => Self::Contour,
            SubGeometry::Ellipse(_) => Self::Ellipse,
            SubGeometry::Polygon(_) => Self::Polygon,
            SubGeometry::Rectangle(_) => Self::Rectangle,
            SubGeometry::Star(_) => Self::Star,
            SubGeometry::VectorNetwork(_) => Self::VectorNetwork,
            SubGeometry::Frame(_) => Self::Frame,
            SubGeometry::Group(_) => Self::Group,
            SubGeometry::Image(_) => Self::Image,
            SubGeometry::Path(_) => Self::Path,
            SubGeometry::SymbolInstance(_) => Self::SymbolInstance,
            SubGeometry::SymbolMaster(_) => Self::SymbolMaster,
            SubGeometry::Text(_) => Self::Text,
        }
    }
}

/// The model data carried by a node.
///
/// Container payloads keep an empty child list once their node is built;
/// the children live in the tree.
#[derive(Debug, Clone)]
pub enum Payload {
    Document(Box<DesignModel>),
    Frame(Box<Frame>),
    Group(Box<Group>),
    SymbolMaster(Box<SymbolMaster>),
    SymbolInstance(Box<SymbolInstanceState>),
    Text(Box<Text>),
    Image(Box<Image>),
    Path(Box<Path>),
    Contour(Contour),
    Ellipse(Ellipse),
    Polygon(Polygon),
    Rectangle(Rectangle),
    Star(Star),
    VectorNetwork(VectorNetwork),
    /// Children of an instance set aside while another state is presented.
    StateSnapshot(Box<SymbolInstance>),
}

impl Payload {
    pub fn kind(&self) -> ElementKind {
        match self {
            Payload::Document(_) => ElementKind::Document,
            Payload::Frame(_) => ElementKind::Frame,
            Payload::Group(_) => ElementKind::Group,
            Payload::SymbolMaster(_) => ElementKind::SymbolMaster,
            Payload::SymbolInstance(_) => ElementKind::SymbolInstance,
            Payload::Text(_) => ElementKind::Text,
            Payload::Image(_) => ElementKind::Image,
            Payload::Path(_) => ElementKind::Path,
            Payload::Contour(_) => ElementKind::Contour,
            Payload::Ellipse(_) => ElementKind::Ellipse,
            Payload::Polygon(_) => ElementKind::Polygon,
            Payload::Rectangle(_) => ElementKind::Rectangle,
            Payload::Star(_) => ElementKind::Star,
            Payload::VectorNetwork(_) => ElementKind::VectorNetwork,
            Payload::StateSnapshot(_) => ElementKind::StateSnapshot,
        }
    }

    /// The object header, or `None` for the document and pure geometry.
    pub fn object(&self) -> Option<&Object> {
        match self {
            Payload::Frame(v) => Some(&v.object),
            Payload::Group(v) => Some(&v.object),
            Payload::SymbolMaster(v) => Some(&v.object),
            Payload::SymbolInstance(v) => Some(&v.model().object),
            Payload::Text(v) => Some(&v.object),
            Payload::Image(v) => Some(&v.object),
            Payload::Path(v) => Some(&v.object),
            Payload::StateSnapshot(v) => Some(&v.object),
            Payload::Document(_)
            | Payload::Contour(_)
            | Payload::Ellipse(_)
            | Payload::Polygon(_)
            | Payload::Rectangle(_)
            | Payload::Star(_)
            | Payload::VectorNetwork(_) => None,
        }
    }

    pub fn object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Payload::Frame(v) => Some(&mut v.object),
            Payload::Group(v) => Some(&mut v.object),
            Payload::SymbolMaster(v) => Some(&mut v.object),
            Payload::SymbolInstance(v) => Some(&mut v.model_mut().object),
            Payload::Text(v) => Some(&mut v.object),
            Payload::Image(v) => Some(&mut v.object),
            Payload::Path(v) => Some(&mut v.object),
            Payload::StateSnapshot(v) => Some(&mut v.object),
            Payload::Document(_)
            | Payload::Contour(_)
            | Payload::Ellipse(_)
            | Payload::Polygon(_)
            | Payload::Rectangle(_)
            | Payload::Star(_)
            | Payload::VectorNetwork(_) => None,
        }
    }

    /// Wrap a container child, children included.
    ///
    /// The child list stays inside the payload until the tree consumes it.
    pub fn from_child(child: ContainerChild) -> Self {
        Self::from_sub_geometry(child.into())
    }

    pub fn from_sub_geometry(geometry: SubGeometry) -> Self {
        match geometry {
            SubGeometry::Contour(v) => Payload::Contour(v),
            SubGeometry::Ellipse(v) => Payload::Ellipse(v),
            SubGeometry::Polygon(v) => Payload::Polygon(v),
            SubGeometry::Rectangle(v) => Payload::Rectangle(v),
            SubGeometry::Star(v) => Payload::Star(v),
            SubGeometry::VectorNetwork(v) => Payload::VectorNetwork(v),
            SubGeometry::Frame(v) => Payload::Frame(Box::new(v)),
            SubGeometry::Group(v) => Payload::Group(Box::new(v)),
            SubGeometry::Image(v) => Payload::Image(Box::new(v)),
            SubGeometry::Path(v) => Payload::Path(Box::new(v)),
            SubGeometry::SymbolInstance(v) => {
                Payload::SymbolInstance(Box::new(SymbolInstanceState::new(v)))
            }
            SubGeometry::SymbolMaster(v) => Payload::SymbolMaster(Box::new(v)),
            SubGeometry::Text(v) => Payload::Text(Box::new(v)),
        }
    }

    /// This node alone as a model value, without any children.
    ///
    /// Returns `None` for the document root, which is not a sub-geometry.
    pub fn to_model(&self) -> Option<SubGeometry> {
        let geometry = match self {
            Payload::Document(_) => return None,
            Payload::Frame(v) => SubGeometry::Frame((**v).clone()),
            Payload::Group(v) => SubGeometry::Group((**v).clone()),
            Payload::SymbolMaster(v) => SubGeometry::SymbolMaster((**v).clone()),
            Payload::SymbolInstance(v) => SubGeometry::SymbolInstance(v.model().clone()),
            Payload::Text(v) => SubGeometry::Text((**v).clone()),
            Payload::Image(v) => SubGeometry::Image((**v).clone()),
            Payload::Path(v) => SubGeometry::Path((**v).clone()),
            Payload::Contour(v) => SubGeometry::Contour(v.clone()),
            Payload::Ellipse(v) => SubGeometry::Ellipse(v.clone()),
            Payload::Polygon(v) => SubGeometry::Polygon(v.clone()),
            Payload::Rectangle(v) => SubGeometry::Rectangle(v.clone()),
            Payload::Star(v) => SubGeometry::Star(v.clone()),
            Payload::VectorNetwork(v) => SubGeometry::VectorNetwork(v.clone()),
            Payload::StateSnapshot(v) => SubGeometry::SymbolInstance((**v).clone()),
        };
        Some(geometry)
    }

    /// The payload as JSON, without a `class` tag.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Payload::Document(v) => serde_json::to_value(v),
            Payload::Frame(v) => serde_json::to_value(v),
            Payload::Group(v) => serde_json::to_value(v),
            Payload::SymbolMaster(v) => serde_json::to_value(v),
            Payload::SymbolInstance(v) => serde_json::to_value(v.model()),
            Payload::Text(v) => serde_json::to_value(v),
            Payload::Image(v) => serde_json::to_value(v),
            Payload::Path(v) => serde_json::to_value(v),
            Payload::Contour(v) => serde_json::to_value(v),
            Payload::Ellipse(v) => serde_json::to_value(v),
            Payload::Polygon(v) => serde_json::to_value(v),
            Payload::Rectangle(v) => serde_json::to_value(v),
            Payload::Star(v) => serde_json::to_value(v),
            Payload::VectorNetwork(v) => serde_json::to_value(v),
            Payload::StateSnapshot(v) => serde_json::to_value(v),
        }
    }

    /// Replace the payload data with `json`, re-typed as this node's kind.
    ///
    /// Container payloads reject a non-empty child list: children are owned
    /// by the tree and cannot be swapped through a JSON edit. On error the
    /// payload is unchanged.
    pub fn update_from_json(&mut self, json: Value) -> Result<(), OverrideError> {
        let kind = self.kind();
        match self {
            Payload::Document(v) => {
                let model: DesignModel = retype(kind, json)?;
                if !model.frames.is_empty() {
                    return Err(child_objects_error(kind));
                }
                **v = model;
            }
            Payload::Frame(v) => {
                let model: Frame = retype(kind, json)?;
                if !model.child_objects.is_empty() {
                    return Err(child_objects_error(kind));
                }
                **v = model;
            }
            Payload::Group(v) => {
                let model: Group = retype(kind, json)?;
                if !model.child_objects.is_empty() {
                    return Err(child_objects_error(kind));
                }
                **v = model;
            }
            Payload::SymbolMaster(v) => {
                let model: SymbolMaster = retype(kind, json)?;
                if !model.child_objects.is_empty() {
                    return Err(child_objects_error(kind));
                }
                **v = model;
            }
            Payload::SymbolInstance(v) => *v.model_mut() = retype(kind, json)?,
            Payload::Text(v) => **v = retype(kind, json)?,
            Payload::Image(v) => **v = retype(kind, json)?,
            Payload::Path(v) => **v = retype(kind, json)?,
            Payload::Contour(v) => *v = retype(kind, json)?,
            Payload::Ellipse(v) => *v = retype(kind, json)?,
            Payload::Polygon(v) => *v = retype(kind, json)?,
            Payload::Rectangle(v) => *v = retype(kind, json)?,
            Payload::Star(v) => *v = retype(kind, json)?,
            Payload::VectorNetwork(v) => *v = retype(kind, json)?,
            Payload::StateSnapshot(v) => **v = retype(kind, json)?,
        }
        Ok(())
    }

    /// Check that `geometry` can replace this payload's data.
    ///
    /// The kind must match and container geometry must not carry children.
    pub(crate) fn accepts_sub_geometry(
        &self,
        geometry: &SubGeometry,
    ) -> Result<(), OverrideError> {
        let kind = self.kind();
        let incoming = ElementKind::from(geometry);
        if incoming != kind {
            return Err(OverrideError::incompatible(
                kind.name(),
                format!("sub-geometry class changed to `{incoming}`"),
            ));
        }
        let has_children = match geometry {
            SubGeometry::Frame(v) => !v.child_objects.is_empty(),
            SubGeometry::Group(v) => !v.child_objects.is_empty(),
            SubGeometry::SymbolMaster(v) => !v.child_objects.is_empty(),
            _ => false,
        };
        if has_children {
            return Err(child_objects_error(kind));
        }
        Ok(())
    }

    /// Replace the payload data with an edited sub-geometry of the same kind.
    ///
    /// Instances keep their bound master and state; only their model changes.
    pub(crate) fn update_from_sub_geometry(
        &mut self,
        geometry: SubGeometry,
    ) -> Result<(), OverrideError> {
        self.accepts_sub_geometry(&geometry)?;
        match (self, geometry) {
            (Payload::SymbolInstance(state), SubGeometry::SymbolInstance(model)) => {
                *state.model_mut() = model;
            }
            (payload, geometry) => *payload = Payload::from_sub_geometry(geometry),
        }
        Ok(())
    }
}

fn retype<T: DeserializeOwned>(kind: ElementKind, json: Value) -> Result<T, OverrideError> {
    serde_json::from_value(json).map_err(|source| OverrideError::Incompatible {
        kind: kind.name(),
        source,
    })
}

fn child_objects_error(kind: ElementKind) -> OverrideError {
    OverrideError::incompatible(
        kind.name(),
        "child objects are owned by the tree and cannot be replaced",
    )
}
