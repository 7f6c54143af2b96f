//! # Graphwright Engine
//!
//! The engine turns a declarative document into a live object graph and runs it.
//!
//! ## Key Features
//!
//! - **Document Loading**: JSON or YAML documents, validated before anything is built
//! - **Graph Building**: reverse-order construction with depth-first nested objects
//! - **References**: `${name}` tokens resolve to already-built pooled instances
//! - **Expressions**: `@@ ... @@` snippets compute argument values from pooled instances
//! - **Dispatch**: entry methods of core objects run in document order
//!
//! ## Usage
//!
//! ```rust
//! use graphwright_engine::{Document, DispatchOutcome, create};
//! use graphwright_registry::{ClassEntry, ClassRegistry, ParamSpec};
//! use graphwright_types::Component;
//!
//! struct Greeter {
//!     message: String,
//! }
//! impl Component for Greeter {}
//!
//! let mut registry = ClassRegistry::new();
//! registry.register(
//!     ClassEntry::new("Greeter", |mut args| Ok(Greeter { message: args.string("message")? }))
//!         .param(ParamSpec::required("message")),
//! )?;
//!
//! let document = Document::from_value(serde_json::json!([
//!     {"clazz": "Greeter", "name": "hello", "args": ["hello"]}
//! ]))?;
//! let assembly = create(&registry, &document)?;
//! assert_eq!(assembly.dispatch()?, DispatchOutcome::NothingToRun);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod expression;
pub mod placeholder;
pub mod pool;

pub use builder::{Assembly, CoreObject, create};
pub use dispatch::DispatchOutcome;
pub use document::{Document, DocumentFormat};
pub use error::{DocumentError, EngineError, ExpressionError, ORDERING_HINT};
pub use pool::{ObjectPool, PoolEntry};
