//! Path objects and the sub-geometry they are composed of.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    container::{ContainerChild, Frame, Group, SymbolMaster},
    object::Object,
    symbol::SymbolInstance,
    text::{Image, Text},
};

/// A vertex of a contour with optional Bézier handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAttr {
    pub point: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_from: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_to: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_style: Option<i32>,
}

impl PointAttr {
    /// Scales the point and its handles.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        for coords in [
            Some(&mut self.point),
            self.curve_from.as_mut(),
            self.curve_to.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            if let [x, y, ..] = coords.as_mut_slice() {
                *x *= sx;
                *y *= sy;
            }
        }
    }
}

/// A polyline or Bézier outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contour {
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub points: Vec<PointAttr>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    #[serde(default)]
    pub starting_angle: f64,
    #[serde(default)]
    pub ending_angle: f64,
    #[serde(default)]
    pub inner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    #[serde(default)]
    pub point_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    #[serde(default)]
    pub ratio: f64,
    #[serde(default)]
    pub point_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// A vector network. Vertices, segments and regions are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorNetwork {
    #[serde(default)]
    pub vertices: Vec<Value>,
    #[serde(default)]
    pub segments: Vec<Value>,
    #[serde(default)]
    pub regions: Vec<Value>,
}

/// The geometry inside a path subshape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "camelCase")]
pub enum SubGeometry {
    Contour(Contour),
    Ellipse(Ellipse),
    Polygon(Polygon),
    Rectangle(Rectangle),
    Star(Star),
    VectorNetwork(VectorNetwork),
    Frame(Frame),
    Group(Group),
    Image(Image),
    Path(Path),
    SymbolInstance(SymbolInstance),
    SymbolMaster(SymbolMaster),
    Text(Text),
}

impl SubGeometry {
    /// Converts to a container child; pure geometry yields `None`.
    pub fn into_child(self) -> Option<ContainerChild> {
        match self {
            SubGeometry::Frame(v) => Some(ContainerChild::Frame(v)),
            SubGeometry::Group(v) => Some(ContainerChild::Group(v)),
            SubGeometry::Image(v) => Some(ContainerChild::Image(v)),
            SubGeometry::Path(v) => Some(ContainerChild::Path(v)),
            SubGeometry::SymbolInstance(v) => Some(ContainerChild::SymbolInstance(v)),
            SubGeometry::SymbolMaster(v) => Some(ContainerChild::SymbolMaster(v)),
            SubGeometry::Text(v) => Some(ContainerChild::Text(v)),
            SubGeometry::Contour(_)
            | SubGeometry::Ellipse(_)
            | SubGeometry::Polygon(_)
            | SubGeometry::Rectangle(_)
            | SubGeometry::Star(_)
            | SubGeometry::VectorNetwork(_) => None,
        }
    }

    /// Returns the object header for object variants.
    pub fn object(&self) -> Option<&Object> {
        match self {
            SubGeometry::Frame(v) => Some(&v.object),
            SubGeometry::Group(v) => Some(&v.object),
            SubGeometry::Image(v) => Some(&v.object),
            SubGeometry::Path(v) => Some(&v.object),
            SubGeometry::SymbolInstance(v) => Some(&v.object),
            SubGeometry::SymbolMaster(v) => Some(&v.object),
            SubGeometry::Text(v) => Some(&v.object),
            _ => None,
        }
    }
}

impl From<ContainerChild> for SubGeometry {
    fn from(child: ContainerChild) -> Self {
        match child {
            ContainerChild::Frame(v) => SubGeometry::Frame(v),
            ContainerChild::Group(v) => SubGeometry::Group(v),
            ContainerChild::Image(v) => SubGeometry::Image(v),
            ContainerChild::Path(v) => SubGeometry::Path(v),
            ContainerChild::SymbolInstance(v) => SubGeometry::SymbolInstance(v),
            ContainerChild::SymbolMaster(v) => SubGeometry::SymbolMaster(v),
            ContainerChild::Text(v) => SubGeometry::Text(v),
        }
    }
}

/// One operand of a path's boolean composition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subshape {
    #[serde(default)]
    pub boolean_operation: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_geometry: Option<Box<SubGeometry>>,
}

/// The boolean composition of subshapes that makes up a path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default)]
    pub subshapes: Vec<Subshape>,
    #[serde(default)]
    pub winding_rule: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// A path object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    #[serde(flatten)]
    pub object: Object,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}

impl Path {
    /// Creates a path without geometry.
    pub fn new(object: Object) -> Self {
        Self {
            object,
            shape: None,
        }
    }
}
