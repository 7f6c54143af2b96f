//! Registry crate for the classes a document can instantiate.
//!
//! Callers populate a [`ClassRegistry`] with [`ClassEntry`]s before building any
//! document. Each entry pairs a unique name with one component type, its declared
//! parameters, and a constructor.

pub mod binding;
pub mod entry;
pub mod example;
pub mod models;
pub mod search;

pub use binding::{Arguments, BindError, BoundArgs};
pub use entry::{ClassEntry, Constructor, ParamSpec};
pub use example::{ExampleDocument, TODO_PLACEHOLDER};
pub use models::{ClassRegistry, RegistryError};
