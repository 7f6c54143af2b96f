//! Error taxonomy of a build-and-dispatch cycle.
//!
//! Every variant is fatal to the current cycle. Variants carry the object name,
//! class name, token, or snippet needed to diagnose a document without re-running it.

use std::path::PathBuf;

use graphwright_types::{InvokeError, SpecError};
use thiserror::Error;

/// Guidance attached to unresolved references.
pub const ORDERING_HINT: &str = "this may be caused by a typo in the document or by the object order: \
     objects are built from the last to the first, so a referenced object must be declared after the objects that use it";

/// Errors raised while loading and validating a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid {format} document: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("document is a map, but no 'objects' found")]
    MissingObjects,

    #[error("'objects' expected to be a list, got {found}")]
    ObjectsNotList { found: &'static str },

    #[error("document top level must be a map or a list, got {found}")]
    UnsupportedTopLevel { found: &'static str },

    #[error("element {index} in 'objects' list expected to be a map, got {found}")]
    ElementNotMapping { index: usize, found: &'static str },

    #[error("element {index} in 'objects' list expected to have key 'clazz', got keys {keys:?}")]
    MissingClazz { index: usize, keys: Vec<String> },

    #[error("element {index} in 'objects' list: 'clazz' expected to be a string, got {found}")]
    ClazzNotString { index: usize, found: &'static str },

    #[error("element {index} in 'objects' list: 'clazz' must not be empty")]
    EmptyClazz { index: usize },

    #[error("element {index} in 'objects' list: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: SpecError,
    },

    #[error("top element names expected not to repeat, {names:?} repeated")]
    DuplicateNames { names: Vec<String> },

    #[error("invalid 'task' section: {message}")]
    InvalidTask { message: String },
}

/// Failures of the embedded `@@ ... @@` expression sub-language.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("only one '@@ ... @@' snippet is allowed per value, found {count} in '{value}'")]
    MultipleSnippets { value: String, count: usize },

    #[error("cannot parse snippet '{snippet}': {reason}")]
    Parse { snippet: String, reason: String },

    #[error("evaluating snippet '{snippet}' failed: {reason}")]
    Evaluation { snippet: String, reason: String },

    #[error("snippet '{snippet}' never binds the result 'ret' (it binds '{target}')")]
    ResultUnbound { snippet: String, target: String },
}

/// Errors raised while building an object graph or dispatching core objects.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("object '{name}': clazz '{class}' not registered")]
    ClassNotFound { name: String, class: String },

    #[error("object name '{name}' is already used in the object pool")]
    ObjectNameCollision { name: String },

    #[error("object '{name}' is already stored in the object pool as '{existing}'")]
    InstanceAlreadyPooled { name: String, existing: String },

    #[error("reference '${{{token}}}' not found in the object pool; {hint}", hint = ORDERING_HINT)]
    ReferenceNotFound { token: String },

    #[error("args of '{name}' expected to be a list or a map, got {found}")]
    ArgsType { name: String, found: &'static str },

    #[error("nested object '{path}' is malformed: {source}")]
    InvalidSpec {
        path: String,
        #[source]
        source: SpecError,
    },

    #[error("constructing '{name}' (clazz '{class}') with args {arguments} failed: {source}")]
    Construction {
        name: String,
        class: String,
        arguments: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error("object '{name}' (clazz '{class}') does not have method '{method}'")]
    MethodNotFound { name: String, class: String, method: String },

    #[error("running '{name}.{method}' failed: {source}")]
    Invocation {
        name: String,
        method: String,
        #[source]
        source: InvokeError,
    },
}
