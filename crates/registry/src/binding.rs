//! Binding resolved arguments to a class's declared parameters.
//!
//! Documents pass constructor arguments either positionally (`args` is a
//! sequence) or by keyword (`args` is a mapping). Binding lines them up with the
//! entry's [`ParamSpec`] list, fills in defaults, and rejects surplus, unknown,
//! or missing arguments before the constructor ever runs.

use std::fmt;

use anyhow::{Result, anyhow};
use graphwright_types::{Instance, Value};
use indexmap::IndexMap;
use thiserror::Error;

use crate::ParamSpec;

/// Resolved arguments for a single construction.
#[derive(Debug, Clone)]
pub enum Arguments {
    Positional(Vec<Value>),
    Keyword(IndexMap<String, Value>),
}

impl Arguments {
    pub fn len(&self) -> usize {
        match self {
            Arguments::Positional(values) => values.len(),
            Arguments::Keyword(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arguments::Positional(values) => write!(formatter, "{}", Value::List(values.clone())),
            Arguments::Keyword(values) => write!(formatter, "{}", Value::Map(values.clone())),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("{class} takes {expected} positional argument(s) but {found} were given")]
    TooManyPositional { class: String, expected: usize, found: usize },

    #[error("{class} got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword { class: String, keyword: String },

    #[error("{class} is missing required argument(s): {missing:?}")]
    Missing { class: String, missing: Vec<String> },
}

/// Arguments bound to parameter names, handed to a constructor.
#[derive(Debug, Clone)]
pub struct BoundArgs {
    class: String,
    values: IndexMap<String, Value>,
}

impl BoundArgs {
    pub(crate) fn bind(class: &str, params: &[ParamSpec], arguments: Arguments) -> Result<Self, BindError> {
        let mut values = IndexMap::new();
        match arguments {
            Arguments::Positional(positional) => {
                if positional.len() > params.len() {
                    return Err(BindError::TooManyPositional {
                        class: class.to_string(),
                        expected: params.len(),
                        found: positional.len(),
                    });
                }
                for (param, value) in params.iter().zip(positional) {
                    values.insert(param.name.clone(), value);
                }
            }
            Arguments::Keyword(keyword) => {
                for (key, value) in keyword {
                    if !params.iter().any(|param| param.name == key) {
                        return Err(BindError::UnexpectedKeyword {
                            class: class.to_string(),
                            keyword: key,
                        });
                    }
                    values.insert(key, value);
                }
            }
        }

        let mut missing = Vec::new();
        let mut ordered = IndexMap::with_capacity(params.len());
        for param in params {
            if let Some(value) = values.swap_remove(&param.name) {
                ordered.insert(param.name.clone(), value);
            } else if let Some(default) = &param.default {
                ordered.insert(param.name.clone(), Value::from_json(default));
            } else {
                missing.push(param.name.clone());
            }
        }
        if !missing.is_empty() {
            return Err(BindError::Missing {
                class: class.to_string(),
                missing,
            });
        }

        Ok(Self {
            class: class.to_string(),
            values: ordered,
        })
    }

    /// Class name the arguments were bound for.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Removes and returns the value bound to `name`.
    pub fn take(&mut self, name: &str) -> Result<Value> {
        self.values
            .shift_remove(name)
            .ok_or_else(|| anyhow!("{}: no argument bound to '{}'", self.class, name))
    }

    pub fn string(&mut self, name: &str) -> Result<String> {
        match self.take(name)? {
            Value::String(text) => Ok(text),
            other => Err(self.mismatch(name, "a string", &other)),
        }
    }

    /// Like [`BoundArgs::string`] but `null` maps to `None`.
    pub fn optional_string(&mut self, name: &str) -> Result<Option<String>> {
        match self.take(name)? {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text)),
            other => Err(self.mismatch(name, "a string or null", &other)),
        }
    }

    pub fn bool(&mut self, name: &str) -> Result<bool> {
        match self.take(name)? {
            Value::Bool(flag) => Ok(flag),
            other => Err(self.mismatch(name, "a bool", &other)),
        }
    }

    pub fn instance(&mut self, name: &str) -> Result<Instance> {
        match self.take(name)? {
            Value::Object(instance) => Ok(instance),
            other => Err(self.mismatch(name, "an object", &other)),
        }
    }

    pub fn list(&mut self, name: &str) -> Result<Vec<Value>> {
        match self.take(name)? {
            Value::List(items) => Ok(items),
            other => Err(self.mismatch(name, "a list", &other)),
        }
    }

    /// A list whose every element is a constructed object.
    pub fn instances(&mut self, name: &str) -> Result<Vec<Instance>> {
        let items = self.list(name)?;
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(instance) => Ok(instance),
                other => Err(anyhow!(
                    "{}: element {} of '{}' must be an object, got {}",
                    self.class,
                    index,
                    name,
                    other.kind()
                )),
            })
            .collect()
    }

    fn mismatch(&self, name: &str, expected: &str, found: &Value) -> anyhow::Error {
        anyhow!("{}: argument '{}' must be {}, got {}", self.class, name, expected, found.kind())
    }
}
