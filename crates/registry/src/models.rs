use std::{any::TypeId, collections::HashMap};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::ClassEntry;

/// Errors raised while registering or resolving classes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already bound to another type.
    #[error("register name '{name}' already used by class {existing_type}")]
    NameTaken { name: String, existing_type: &'static str },

    /// The type is already bound under another name.
    #[error("class '{type_name}' already registered with name '{existing_name}'")]
    TypeTaken { type_name: &'static str, existing_name: String },

    #[error("clazz '{name}' not registered")]
    ClassNotFound { name: String },
}

/// Bijective name ↔ type table of constructible classes.
///
/// The registry is created by the caller, populated before any build, and then
/// shared read-only by every build cycle.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    entries: IndexMap<String, ClassEntry>,
    names_by_type: HashMap<TypeId, String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under its name.
    ///
    /// Fails without modifying the registry when either the name or the entry's
    /// type is already bound.
    pub fn register(&mut self, entry: ClassEntry) -> Result<(), RegistryError> {
        if let Some(existing) = self.entries.get(entry.name()) {
            return Err(RegistryError::NameTaken {
                name: entry.name().to_string(),
                existing_type: existing.type_name(),
            });
        }
        if let Some(existing_name) = self.names_by_type.get(&entry.type_id()) {
            return Err(RegistryError::TypeTaken {
                type_name: entry.type_name(),
                existing_name: existing_name.clone(),
            });
        }

        debug!(name = %entry.name(), type_name = entry.type_name(), "class registered");
        self.names_by_type.insert(entry.type_id(), entry.name().to_string());
        self.entries.insert(entry.name().to_string(), entry);
        Ok(())
    }

    /// Registers every entry as `<prefix>.<name>`, stopping at the first failure.
    pub fn register_namespace(
        &mut self,
        prefix: &str,
        entries: impl IntoIterator<Item = ClassEntry>,
    ) -> Result<(), RegistryError> {
        for mut entry in entries {
            entry.name = format!("{prefix}.{}", entry.name);
            self.register(entry)?;
        }
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&ClassEntry, RegistryError> {
        self.entries
            .get(name)
            .ok_or_else(|| RegistryError::ClassNotFound { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered classes keyed by name, in registration order.
    pub fn entries(&self) -> &IndexMap<String, ClassEntry> {
        &self.entries
    }

    /// Name registered for the component type `C`, if any.
    pub fn name_of<C: 'static>(&self) -> Option<&str> {
        self.names_by_type.get(&TypeId::of::<C>()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
