//! Runtime values flowing through constructor arguments and expression results.
//!
//! Documents are parsed into `serde_json::Value` trees. Once the builder resolves
//! references and nested objects, arguments become [`Value`]s, which can also
//! hold live component instances.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::component::Instance;

/// A resolved argument or expression value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integral number that fits in an `i64`.
    Integer(i64),
    /// Any other number.
    Float(f64),
    /// String literal that was neither a reference nor an expression.
    String(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Mapping that preserves authoring order.
    Map(IndexMap<String, Value>),
    /// Shared handle to a constructed component.
    Object(Instance),
}

impl Value {
    /// Converts a document value into a runtime value without any resolution.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Bool(*flag),
            JsonValue::Number(number) => match number.as_i64() {
                Some(integer) => Value::Integer(integer),
                None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(text) => Value::String(text.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Map(map.iter().map(|(key, item)| (key.clone(), Value::from_json(item))).collect()),
        }
    }

    /// Converts back into JSON. Instances are rendered as `<type name>` strings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(flag) => JsonValue::Bool(*flag),
            Value::Integer(integer) => JsonValue::from(*integer),
            Value::Float(float) => serde_json::Number::from_f64(*float)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(text) => JsonValue::String(text.clone()),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => JsonValue::Object(map.iter().map(|(key, item)| (key.clone(), item.to_json())).collect()),
            Value::Object(instance) => JsonValue::String(format!("<{}>", instance.type_name())),
        }
    }

    /// Short human-readable label of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(integer) => Some(*integer as f64),
            Value::Float(float) => Some(*float),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::Integer(left), Value::Float(right)) | (Value::Float(right), Value::Integer(left)) => (*left as f64) == *right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::List(left), Value::List(right)) => left == right,
            (Value::Map(left), Value::Map(right)) => left == right,
            // identity, not structure
            (Value::Object(left), Value::Object(right)) => left.ptr_eq(right),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => formatter.write_str("null"),
            Value::Bool(flag) => write!(formatter, "{flag}"),
            Value::Integer(integer) => write!(formatter, "{integer}"),
            Value::Float(float) => write!(formatter, "{float}"),
            Value::String(text) => formatter.write_str(text),
            Value::List(items) => {
                formatter.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{item}")?;
                }
                formatter.write_str("]")
            }
            Value::Map(map) => {
                formatter.write_str("{")?;
                for (index, (key, item)) in map.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key}: {item}")?;
                }
                formatter.write_str("}")
            }
            Value::Object(instance) => write!(formatter, "<{}>", instance.type_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Object(value)
    }
}

/// Label of a document value's JSON kind, used in validation messages.
pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_integers_and_order() {
        let value = Value::from_json(&json!({"b": 1, "a": [2.5, "x", null]}));
        let map = value.as_map().expect("map");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map["b"], Value::Integer(1));
        assert_eq!(
            map["a"],
            Value::List(vec![Value::Float(2.5), Value::from("x"), Value::Null])
        );
    }

    #[test]
    fn display_renders_nested_collections() {
        let value = Value::from_json(&json!({"status": "raw", "history": ["a->b"]}));
        assert_eq!(value.to_string(), "{status: raw, history: [a->b]}");
    }

    #[test]
    fn integer_and_float_compare_numerically() {
        assert_eq!(Value::Integer(2), Value::Float(2.0));
        assert_ne!(Value::Integer(2), Value::from("2"));
    }
}
