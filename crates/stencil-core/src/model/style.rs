//! Fill, border and effect styles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::object::GraphicsContextSettings;

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    #[serde(default = "opaque")]
    pub alpha: f64,
}

impl Color {
    /// Creates a color from its components.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

fn opaque() -> f64 {
    1.0
}

fn enabled() -> bool {
    true
}

/// A single fill layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub fill_type: i32,
    #[serde(default)]
    pub context_settings: GraphicsContextSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fill {
    /// Creates an enabled solid fill.
    pub fn solid(color: Color) -> Self {
        Self {
            is_enabled: true,
            color: Some(color),
            fill_type: 0,
            context_settings: GraphicsContextSettings::default(),
            gradient: None,
            pattern: None,
            extra: Map::new(),
        }
    }
}

/// A single border layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub fill_type: i32,
    #[serde(default)]
    pub context_settings: GraphicsContextSettings,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub style: i32,
    #[serde(default)]
    pub dashed_pattern: Vec<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A blur effect. Only the toggle is modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blur {
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A drop or inner shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub inner: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The style of an object: ordered fill, border and effect layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub blurs: Vec<Blur>,
    #[serde(default)]
    pub borders: Vec<Border>,
    #[serde(default)]
    pub fills: Vec<Fill>,
    #[serde(default)]
    pub shadows: Vec<Shadow>,
}
