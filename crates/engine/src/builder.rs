//! Builds the object graph described by a [`Document`].
//!
//! Top-level specifications are processed from the last to the first, so an
//! object can only reference (`${name}`) objects declared *after* it. Nested
//! specifications found inside `args` are built depth first, in place, and are
//! not added to the pool. Entries carrying a `method` become core objects and
//! are reported in document order.

use graphwright_registry::{Arguments, ClassRegistry};
use graphwright_types::{CLAZZ_KEY, Instance, ObjectSpec, Value, json_kind};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::{debug, info, trace};

use crate::{EngineError, document::Document, expression, placeholder, pool::ObjectPool};

/// A top-level object with an entry method.
#[derive(Debug, Clone)]
pub struct CoreObject {
    pub name: String,
    pub class: String,
    pub instance: Instance,
    pub method: String,
}

/// Result of a successful build: the populated pool and the core objects.
#[derive(Debug)]
pub struct Assembly {
    pub(crate) pool: ObjectPool,
    pub(crate) core_objects: Vec<CoreObject>,
}

impl Assembly {
    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    /// Core objects in document order.
    pub fn core_objects(&self) -> &[CoreObject] {
        &self.core_objects
    }

    /// Pooled instance named `name`.
    pub fn get(&self, name: &str) -> Result<Instance, EngineError> {
        self.pool.get(name)
    }
}

/// Builds every object of `document` with the classes of `registry`.
///
/// A failure drops everything built so far.
pub fn create(registry: &ClassRegistry, document: &Document) -> Result<Assembly, EngineError> {
    GraphBuilder::new(registry).build(document)
}

struct GraphBuilder<'a> {
    registry: &'a ClassRegistry,
    pool: ObjectPool,
}

impl<'a> GraphBuilder<'a> {
    fn new(registry: &'a ClassRegistry) -> Self {
        Self {
            registry,
            pool: ObjectPool::new(),
        }
    }

    fn build(mut self, document: &Document) -> Result<Assembly, EngineError> {
        let mut core_objects = Vec::new();

        // Unnamed objects are numbered in build order: `objects_0` is the last declared.
        for (position, spec) in document.objects().iter().rev().enumerate() {
            let name = spec.name.clone().unwrap_or_else(|| format!("objects_{position}"));
            let instance = self.construct(&name, spec)?;

            if let Some(method) = &spec.method {
                core_objects.push(CoreObject {
                    name: name.clone(),
                    class: spec.clazz.clone(),
                    instance: instance.clone(),
                    method: method.clone(),
                });
            }

            let stored = ObjectSpec {
                name: Some(name.clone()),
                ..spec.clone()
            };
            self.pool.put(name, instance, stored)?;
        }
        core_objects.reverse();

        info!(
            objects = self.pool.len(),
            core_objects = core_objects.len(),
            "assembled object graph"
        );
        Ok(Assembly {
            pool: self.pool,
            core_objects,
        })
    }

    fn construct(&self, name: &str, spec: &ObjectSpec) -> Result<Instance, EngineError> {
        let entry = self.registry.resolve(&spec.clazz).map_err(|_| EngineError::ClassNotFound {
            name: name.to_string(),
            class: spec.clazz.clone(),
        })?;

        let arguments = match &spec.args {
            JsonValue::Array(items) => Arguments::Positional(
                items
                    .iter()
                    .enumerate()
                    .map(|(position, item)| self.resolve_value(&format!("{name}.{position}"), item))
                    .collect::<Result<_, _>>()?,
            ),
            JsonValue::Object(map) => Arguments::Keyword(self.resolve_map(name, map)?),
            other => {
                return Err(EngineError::ArgsType {
                    name: name.to_string(),
                    found: json_kind(other),
                });
            }
        };

        let rendered = arguments.to_string();
        let instance = entry.construct(arguments).map_err(|source| EngineError::Construction {
            name: name.to_string(),
            class: spec.clazz.clone(),
            arguments: rendered.clone(),
            source,
        })?;
        debug!(object = %name, class = %spec.clazz, arguments = %rendered, "constructed object");
        Ok(instance)
    }

    fn resolve_map(&self, path: &str, map: &serde_json::Map<String, JsonValue>) -> Result<IndexMap<String, Value>, EngineError> {
        let mut resolved = IndexMap::with_capacity(map.len());
        for (key, item) in map {
            resolved.insert(key.clone(), self.resolve_value(&format!("{path}.{key}"), item)?);
        }
        Ok(resolved)
    }

    /// Resolves one argument node; `path` names the node for nested objects and diagnostics.
    fn resolve_value(&self, path: &str, value: &JsonValue) -> Result<Value, EngineError> {
        match value {
            JsonValue::Object(map) if map.contains_key(CLAZZ_KEY) => {
                let spec = ObjectSpec::from_json(value).map_err(|source| EngineError::InvalidSpec {
                    path: path.to_string(),
                    source,
                })?;
                let name = spec.name.clone().unwrap_or_else(|| path.to_string());
                trace!(object = %name, class = %spec.clazz, "building nested object");
                self.construct(&name, &spec).map(Value::Object)
            }
            JsonValue::Object(map) => self.resolve_map(path, map).map(Value::Map),
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(position, item)| self.resolve_value(&format!("{path}.{position}"), item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            JsonValue::String(raw) if expression::is_expression(raw) => expression::evaluate(raw, &self.pool),
            JsonValue::String(raw) => placeholder::resolve(raw, &self.pool),
            scalar => Ok(Value::from_json(scalar)),
        }
    }
}
