//! Symbol instances, their overrides and the variable declarations they bind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::object::Object;

/// A single property override carried by a symbol instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideValue {
    /// Key chain naming the target through nested instance scopes.
    #[serde(rename = "objectId", default)]
    pub object_id_chain: Vec<String>,
    /// Dotted property path, or `masterId` to swap a nested instance's master.
    #[serde(rename = "overrideName")]
    pub property_path: String,
    /// The new value; `null` deletes the addressed field.
    #[serde(rename = "overrideValue", default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_on_layout: Option<bool>,
}

impl OverrideValue {
    /// Property path naming a master swap instead of a field edit.
    pub const MASTER_ID: &'static str = "masterId";

    pub fn new(chain: Vec<String>, property_path: impl Into<String>, value: Value) -> Self {
        Self {
            object_id_chain: chain,
            property_path: property_path.into(),
            value,
            effect_on_layout: None,
        }
    }

    /// Returns `true` if this override swaps a master.
    pub fn is_master_swap(&self) -> bool {
        self.property_path == Self::MASTER_ID
    }
}

/// A variable declared by a master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefine {
    pub id: String,
    #[serde(default)]
    pub var_type: i32,
    #[serde(default)]
    pub value: Value,
}

/// Binds one of an object's own fields to a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRefer {
    pub id: String,
    pub object_field: String,
}

/// An instance-level reassignment of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAssign {
    pub id: String,
    #[serde(default)]
    pub value: Value,
}

/// A placement of a master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInstance {
    #[serde(flatten)]
    pub object: Object,
    pub master_id: String,
    #[serde(default)]
    pub override_values: Vec<OverrideValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_assignments: Option<Vec<VariableAssign>>,
}

impl SymbolInstance {
    pub fn new(object: Object, master_id: impl Into<String>) -> Self {
        Self {
            object,
            master_id: master_id.into(),
            override_values: Vec::new(),
            radius: None,
            variable_assignments: None,
        }
    }
}
