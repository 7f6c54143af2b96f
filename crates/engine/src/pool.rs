//! Name ↔ instance table for one build cycle.
//!
//! The pool backs `${name}` resolution while the graph is built and keeps each
//! instance's originating [`ObjectSpec`] in a side table for dispatch and
//! diagnostics. Pools are never shared between builds; names are not namespaced
//! by run.

use std::collections::HashMap;

use graphwright_types::{Instance, ObjectSpec};
use indexmap::IndexMap;

use crate::EngineError;

#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub instance: Instance,
    pub spec: ObjectSpec,
}

#[derive(Debug, Default)]
pub struct ObjectPool {
    entries: IndexMap<String, PoolEntry>,
    names_by_instance: HashMap<usize, String>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `instance` under `name`.
    ///
    /// Fails when the name is taken or when the same instance is already pooled
    /// under another name.
    pub fn put(&mut self, name: impl Into<String>, instance: Instance, spec: ObjectSpec) -> Result<(), EngineError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(EngineError::ObjectNameCollision { name });
        }
        if let Some(existing) = self.names_by_instance.get(&instance.id()) {
            return Err(EngineError::InstanceAlreadyPooled {
                name,
                existing: existing.clone(),
            });
        }

        self.names_by_instance.insert(instance.id(), name.clone());
        self.entries.insert(name, PoolEntry { instance, spec });
        Ok(())
    }

    /// Returns a shared handle to the instance named `name`.
    pub fn get(&self, name: &str) -> Result<Instance, EngineError> {
        self.entries
            .get(name)
            .map(|entry| entry.instance.clone())
            .ok_or_else(|| EngineError::ReferenceNotFound { token: name.to_string() })
    }

    /// Originating specification of the instance named `name`.
    pub fn spec(&self, name: &str) -> Option<&ObjectSpec> {
        self.entries.get(name).map(|entry| &entry.spec)
    }

    /// Pool name of `instance`, if it is pooled.
    pub fn name_of(&self, instance: &Instance) -> Option<&str> {
        self.names_by_instance.get(&instance.id()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Pooled names in insertion (build) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &PoolEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
