//! Object specifications as authored in a document.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use crate::json_kind;

/// Key that marks a mapping as an object specification.
pub const CLAZZ_KEY: &str = "clazz";

/// One node of a document describing an instance to build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectSpec {
    /// Registered class name used to look up the constructor.
    pub clazz: String,
    /// Pool name; when absent the builder assigns one from the node's position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Positional (sequence) or keyword (mapping) constructor arguments.
    #[serde(default = "empty_args")]
    pub args: JsonValue,
    /// Entry method invoked after the whole graph is built. Marks a core object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

fn empty_args() -> JsonValue {
    JsonValue::Array(Vec::new())
}

/// Structural problems in a single object specification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("object specification must be a map, got {found}")]
    NotMapping { found: &'static str },

    #[error("object specification must have key 'clazz', got keys {keys:?}")]
    MissingClazz { keys: Vec<String> },

    #[error("'{field}' of an object specification must be a string, got {found}")]
    FieldNotString { field: &'static str, found: &'static str },
}

impl ObjectSpec {
    /// Returns true when `value` is a mapping carrying a `clazz` key.
    pub fn is_object_spec(value: &JsonValue) -> bool {
        value.as_object().is_some_and(|map| map.contains_key(CLAZZ_KEY))
    }

    /// Reads a specification out of a raw document node.
    ///
    /// Unknown keys are ignored; `args` is kept raw so the builder can resolve it.
    pub fn from_json(value: &JsonValue) -> Result<Self, SpecError> {
        let map = value.as_object().ok_or(SpecError::NotMapping { found: json_kind(value) })?;
        let clazz = match map.get(CLAZZ_KEY) {
            Some(JsonValue::String(clazz)) => clazz.clone(),
            Some(other) => {
                return Err(SpecError::FieldNotString {
                    field: CLAZZ_KEY,
                    found: json_kind(other),
                });
            }
            None => {
                return Err(SpecError::MissingClazz {
                    keys: map.keys().cloned().collect(),
                });
            }
        };

        Ok(ObjectSpec {
            clazz,
            name: optional_string(map, "name")?,
            args: map.get("args").cloned().unwrap_or_else(empty_args),
            method: optional_string(map, "method")?,
        })
    }
}

fn optional_string(map: &JsonMap<String, JsonValue>, field: &'static str) -> Result<Option<String>, SpecError> {
    match map.get(field) {
        None => Ok(None),
        Some(JsonValue::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(SpecError::FieldNotString {
            field,
            found: json_kind(other),
        }),
    }
}

/// Optional `task` section of a document controlling the run workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSettings {
    /// Directory under which the per-run workspace is created.
    pub saved_path: String,
    /// Task name, used as the middle path segment of the workspace.
    #[serde(default)]
    pub name: String,
}
