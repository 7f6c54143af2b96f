use std::{
    any::{TypeId, type_name},
    fmt,
    sync::Arc,
};

use anyhow::Result;
use graphwright_types::{Component, Instance};
use serde_json::Value as JsonValue;

use crate::{Arguments, BoundArgs};

/// Builds an instance from bound arguments.
pub type Constructor = Arc<dyn Fn(BoundArgs) -> Result<Instance> + Send + Sync>;

/// Declared constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name, matched against keyword arguments.
    pub name: String,
    /// Value used when the argument is omitted. `None` means required.
    pub default: Option<JsonValue>,
    /// Human-readable description shown by `show -v`.
    pub description: Option<String>,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: impl Into<JsonValue>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A registered constructible type.
#[derive(Clone)]
pub struct ClassEntry {
    pub(crate) name: String,
    type_id: TypeId,
    type_name: &'static str,
    summary: Option<String>,
    params: Vec<ParamSpec>,
    constructor: Constructor,
}

impl ClassEntry {
    /// Creates an entry whose constructor produces a `C`.
    ///
    /// The component type is the entry's identity in the registry: the same `C`
    /// cannot be registered under two names.
    pub fn new<C, F>(name: impl Into<String>, constructor: F) -> Self
    where
        C: Component,
        F: Fn(BoundArgs) -> Result<C> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            summary: None,
            params: Vec::new(),
            constructor: Arc::new(move |args: BoundArgs| constructor(args).map(Instance::new)),
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn description(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Binds `arguments` to the declared parameters and runs the constructor.
    pub fn construct(&self, arguments: Arguments) -> Result<Instance> {
        let bound = BoundArgs::bind(&self.name, &self.params, arguments)?;
        (self.constructor)(bound)
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClassEntry")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
