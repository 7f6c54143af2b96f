//! Example document generation from declared parameter metadata.
//!
//! `gen` and `show -v` print a ready-to-edit object specification for a class.
//! Parameters with a default are filled with it; required parameters get a
//! placeholder the author is expected to replace.

use serde_json::{Map as JsonMap, Value as JsonValue, json};

use crate::{ClassEntry, ClassRegistry};

/// Placeholder written for parameters without a default.
pub const TODO_PLACEHOLDER: &str = "Todo Here!";

/// Generated document plus the requested names that are not registered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleDocument {
    pub document: JsonValue,
    pub unknown: Vec<String>,
}

impl ClassEntry {
    /// Example object specification for this class.
    pub fn example_spec(&self) -> JsonValue {
        let mut args = JsonMap::new();
        for param in self.params() {
            let value = param
                .default
                .clone()
                .unwrap_or_else(|| JsonValue::String(TODO_PLACEHOLDER.to_string()));
            args.insert(param.name.clone(), value);
        }
        json!({
            "clazz": self.name(),
            "rust_type": self.type_name(),
            "args": args,
        })
    }
}

impl ClassRegistry {
    /// Builds `{"objects": [...]}` with one example per known name, in request order.
    ///
    /// Repeated names produce repeated entries.
    pub fn example_document<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> ExampleDocument {
        let mut objects = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            match self.resolve(name) {
                Ok(entry) => objects.push(entry.example_spec()),
                Err(_) => unknown.push(name.to_string()),
            }
        }
        ExampleDocument {
            document: json!({ "objects": objects }),
            unknown,
        }
    }
}
