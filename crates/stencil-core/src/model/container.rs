//! Container objects and the tagged union of container children.

use serde::{Deserialize, Serialize};

use super::{
    geometry::Path,
    object::Object,
    style::Color,
    symbol::SymbolInstance,
    text::{Image, Text},
};

/// A top-level or nested frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(flatten)]
    pub object: Object,
    #[serde(default)]
    pub child_objects: Vec<ContainerChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Vec<f64>>,
}

impl Frame {
    pub fn new(object: Object) -> Self {
        Self {
            object,
            child_objects: Vec::new(),
            background_color: None,
            radius: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(flatten)]
    pub object: Object,
    #[serde(default)]
    pub child_objects: Vec<ContainerChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_nest_mask_type: Option<bool>,
    /// Set on groups flattened from a vector network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_vector_network: Option<bool>,
}

impl Group {
    pub fn new(object: Object) -> Self {
        Self {
            object,
            child_objects: Vec::new(),
            group_nest_mask_type: None,
            is_vector_network: None,
        }
    }
}

/// A reusable subtree definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMaster {
    #[serde(flatten)]
    pub object: Object,
    #[serde(default)]
    pub child_objects: Vec<ContainerChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Vec<f64>>,
}

impl SymbolMaster {
    pub fn new(object: Object) -> Self {
        Self {
            object,
            child_objects: Vec::new(),
            radius: None,
        }
    }
}

/// Anything that can be listed in a container's `childObjects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "camelCase")]
pub enum ContainerChild {
    Frame(Frame),
    Group(Group),
    Image(Image),
    Path(Path),
    SymbolInstance(SymbolInstance),
    SymbolMaster(SymbolMaster),
    Text(Text),
}

impl ContainerChild {
    /// Returns the object header.
    pub fn object(&self) -> &Object {
        match self {
            ContainerChild::Frame(v) => &v.object,
            ContainerChild::Group(v) => &v.object,
            ContainerChild::Image(v) => &v.object,
            ContainerChild::Path(v) => &v.object,
            ContainerChild::SymbolInstance(v) => &v.object,
            ContainerChild::SymbolMaster(v) => &v.object,
            ContainerChild::Text(v) => &v.object,
        }
    }

    /// Returns the object header mutably.
    pub fn object_mut(&mut self) -> &mut Object {
        match self {
            ContainerChild::Frame(v) => &mut v.object,
            ContainerChild::Group(v) => &mut v.object,
            ContainerChild::Image(v) => &mut v.object,
            ContainerChild::Path(v) => &mut v.object,
            ContainerChild::SymbolInstance(v) => &mut v.object,
            ContainerChild::SymbolMaster(v) => &mut v.object,
            ContainerChild::Text(v) => &mut v.object,
        }
    }

    /// Returns the `class` tag this variant serializes with.
    pub fn class_name(&self) -> &'static str {
        match self {
            ContainerChild::Frame(_) => "frame",
            ContainerChild::Group(_) => "group",
            ContainerChild::Image(_) => "image",
            ContainerChild::Path(_) => "path",
            ContainerChild::SymbolInstance(_) => "symbolInstance",
            ContainerChild::SymbolMaster(_) => "symbolMaster",
            ContainerChild::Text(_) => "text",
        }
    }
}
