//! `${name}` reference tokens.
//!
//! Only the first token of a string is considered, and a match replaces the
//! *whole* string with the pooled instance: `"prefix ${x} suffix"` resolves to the
//! instance named `x`, and the surrounding text is discarded.

use graphwright_types::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::{EngineError, pool::ObjectPool};

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{(.+?)\}").expect("reference pattern compiles"));

/// Name inside the first `${...}` token of `raw`, if any.
pub fn first_reference(raw: &str) -> Option<&str> {
    REFERENCE_PATTERN
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Resolves a leaf string: the referenced instance when it holds a token, else the string itself.
pub fn resolve(raw: &str, pool: &ObjectPool) -> Result<Value, EngineError> {
    match first_reference(raw) {
        Some(name) => {
            trace!(token = %name, "resolving reference");
            pool.get(name).map(Value::Object)
        }
        None => Ok(Value::String(raw.to_string())),
    }
}
