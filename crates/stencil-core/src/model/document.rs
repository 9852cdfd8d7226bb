//! The document root and its shared references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    container::{Frame, SymbolMaster},
    object::GraphicsContextSettings,
    style::Style,
};

/// A shared style that objects link to by id (`referenced_style_*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedStyle {
    pub id: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_settings: Option<GraphicsContextSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_attr: Option<Value>,
}

impl ReferencedStyle {
    /// Id prefix shared styles are named with.
    pub const ID_PREFIX: &'static str = "referenced_style_";
}

/// An entry of [`DesignModel::references`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "camelCase")]
pub enum Reference {
    ReferencedStyle(ReferencedStyle),
    SymbolMaster(SymbolMaster),
}

/// A complete design document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignModel {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub file_type: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesignModel {
    /// Returns the shared style with the given id.
    pub fn referenced_style(&self, id: &str) -> Option<&ReferencedStyle> {
        self.references.iter().flatten().find_map(|r| match r {
            Reference::ReferencedStyle(style) if style.id == id => Some(style),
            _ => None,
        })
    }

    /// Iterates masters stored in `references`.
    pub fn referenced_masters(&self) -> impl Iterator<Item = &SymbolMaster> {
        self.references.iter().flatten().filter_map(|r| match r {
            Reference::SymbolMaster(master) => Some(master),
            Reference::ReferencedStyle(_) => None,
        })
    }
}
