//! The common object header shared by every document object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    style::Style,
    symbol::{VariableDefine, VariableRefer},
};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub constrain_proportions: bool,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            constrain_proportions: false,
        }
    }

    /// Scales origin and size by independent horizontal and vertical factors.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.x *= sx;
        self.y *= sy;
        self.width *= sx;
        self.height *= sy;
    }
}

/// A mask applied to an object, referenced by the mask object's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaMask {
    pub id: String,
    #[serde(default)]
    pub alpha_type: i32,
    #[serde(default)]
    pub crop: bool,
}

/// Opacity and blending configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsContextSettings {
    #[serde(default)]
    pub blend_mode: i32,
    #[serde(default)]
    pub isolate_blending: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub transparency_knockout_group: i32,
}

impl Default for GraphicsContextSettings {
    fn default() -> Self {
        Self {
            blend_mode: 0,
            isolate_blending: false,
            opacity: default_opacity(),
            transparency_knockout_group: 0,
        }
    }
}

/// Fields shared by every document object.
///
/// Unmodeled fields land in [`Object::extra`] and are written back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Stable key used by overrides when the id is not suitable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_key: Option<String>,

    #[serde(default)]
    pub bounds: Rect,

    /// Layout frame, kept in step with `bounds` when an instance is resized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Rect>,

    /// Affine transform `[a, b, c, d, tx, ty]`.
    #[serde(default = "identity_matrix")]
    pub matrix: Vec<f64>,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default)]
    pub is_locked: bool,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub context_settings: GraphicsContextSettings,

    #[serde(default)]
    pub alpha_mask_by: Vec<AlphaMask>,

    #[serde(default)]
    pub outline_mask_by: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_defs: Option<Vec<VariableDefine>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_refs: Option<Vec<VariableRefer>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Object {
    /// Creates an object header with the given id and default fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            override_key: None,
            bounds: Rect::default(),
            frame: None,
            matrix: identity_matrix(),
            visible: true,
            is_locked: false,
            style: Style::default(),
            context_settings: GraphicsContextSettings::default(),
            alpha_mask_by: Vec::new(),
            outline_mask_by: Vec::new(),
            variable_defs: None,
            variable_refs: None,
            extra: Map::new(),
        }
    }
}

fn identity_matrix() -> Vec<f64> {
    vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}
