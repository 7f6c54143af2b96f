//! `@@ ... @@` expression snippets.
//!
//! A string holding one snippet is replaced by the value the snippet computes.
//! Snippets are written in a small expression language:
//!
//! - `${name}` reads a pooled instance
//! - string, number, boolean, `null`, list and map literals
//! - `.field`, `.method(args)` and `[index]` postfix access
//! - `+` adds numbers and concatenates strings or lists
//! - the builtin functions `str`, `len`, `int` and `float`
//!
//! The snippet may bind its value explicitly with `ret = <expr>`; binding any
//! other name leaves the result unbound and is an error. Text outside the
//! markers is discarded.

mod interpreter;
mod lexer;
mod parser;

use graphwright_types::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{EngineError, ExpressionError, pool::ObjectPool};

pub const MARKER: &str = "@@";

/// Name a snippet binds its value to.
pub const RESULT_IDENTIFIER: &str = "ret";

pub(crate) const BUILTIN_FUNCTIONS: &[&str] = &["str", "len", "int", "float"];

static SNIPPET_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)@@(.*?)@@").expect("snippet pattern compiles"));

/// True when `raw` carries at least one complete `@@ ... @@` pair.
pub fn is_expression(raw: &str) -> bool {
    raw.matches(MARKER).count() >= 2
}

/// The single snippet body of `raw`.
pub fn extract_snippet(raw: &str) -> Result<&str, ExpressionError> {
    let snippets: Vec<&str> = SNIPPET_PATTERN
        .captures_iter(raw)
        .filter_map(|captures| captures.get(1))
        .map(|body| body.as_str())
        .collect();
    match snippets.as_slice() {
        [snippet] => Ok(*snippet),
        _ => Err(ExpressionError::MultipleSnippets {
            value: raw.to_string(),
            count: snippets.len(),
        }),
    }
}

/// Evaluates the snippet held by `raw` against `pool`.
pub fn evaluate(raw: &str, pool: &ObjectPool) -> Result<Value, EngineError> {
    let source = extract_snippet(raw)?;
    let snippet = lexer::tokenize(source)
        .and_then(parser::parse)
        .map_err(|reason| ExpressionError::Parse {
            snippet: source.to_string(),
            reason,
        })?;

    let mut references = Vec::new();
    snippet.expr.references(&mut references);
    for name in references {
        pool.get(name)?;
    }

    let value = interpreter::Interpreter::new(pool, source).evaluate(&snippet.expr)?;
    if snippet.target != RESULT_IDENTIFIER {
        return Err(ExpressionError::ResultUnbound {
            snippet: source.to_string(),
            target: snippet.target,
        }
        .into());
    }
    debug!(snippet = %source.trim(), kind = value.kind(), "evaluated expression");
    Ok(value)
}
