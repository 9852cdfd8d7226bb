//! Leaf objects: text runs and bitmap images.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::object::Object;

/// A text object. Font attributes are kept as raw JSON runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(flatten)]
    pub object: Object,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub font_attr: Vec<Value>,
    #[serde(default)]
    pub frame_mode: i32,
    #[serde(default)]
    pub horizontal_alignment: Vec<i32>,
    #[serde(default)]
    pub vertical_alignment: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_font_attr: Option<Value>,
}

impl Text {
    pub fn new(object: Object, content: impl Into<String>) -> Self {
        Self {
            object,
            content: content.into(),
            font_attr: Vec::new(),
            frame_mode: 0,
            horizontal_alignment: Vec::new(),
            vertical_alignment: 0,
            default_font_attr: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(flatten)]
    pub object: Object,
    #[serde(default)]
    pub image_file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_replaces_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filters: Option<Value>,
}

impl Image {
    pub fn new(object: Object, image_file_name: impl Into<String>) -> Self {
        Self {
            object,
            image_file_name: image_file_name.into(),
            fill_replaces_image: None,
            image_filters: None,
        }
    }
}
