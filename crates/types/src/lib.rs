//! Shared type definitions for the Graphwright workspace.
//!
//! The registry, engine, and CLI all speak in terms of the types defined here:
//! runtime [`Value`]s, constructed [`Instance`]s of [`Component`]s, and authored
//! [`ObjectSpec`]s.

pub mod component;
pub mod spec;
pub mod value;

pub use component::{Component, Instance, InvokeError};
pub use spec::{CLAZZ_KEY, ObjectSpec, SpecError, TaskSettings};
pub use value::{Value, json_kind};
