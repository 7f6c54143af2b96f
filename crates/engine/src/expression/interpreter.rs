//! Evaluation of parsed snippets against the live object pool.

use graphwright_types::Value;
use indexmap::IndexMap;

use super::parser::Expr;
use crate::{EngineError, ExpressionError, pool::ObjectPool};

pub(crate) struct Interpreter<'a> {
    pool: &'a ObjectPool,
    snippet: &'a str,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(pool: &'a ObjectPool, snippet: &'a str) -> Self {
        Self { pool, snippet }
    }

    pub(crate) fn evaluate(&self, expr: &Expr) -> Result<Value, EngineError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Reference(name) => self.pool.get(name).map(Value::Object),
            Expr::List(items) => items
                .iter()
                .map(|item| self.evaluate(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Map(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, item) in entries {
                    map.insert(key.clone(), self.evaluate(item)?);
                }
                Ok(Value::Map(map))
            }
            Expr::Field { target, name } => {
                let target = self.evaluate(target)?;
                self.field(target, name)
            }
            Expr::MethodCall { target, method, args } => {
                let target = self.evaluate(target)?;
                let args = self.evaluate_all(args)?;
                self.call(target, method, args)
            }
            Expr::Index { target, index } => {
                let target = self.evaluate(target)?;
                let index = self.evaluate(index)?;
                self.index(target, index)
            }
            Expr::Builtin { function, args } => {
                let args = self.evaluate_all(args)?;
                self.builtin(function, args)
            }
            Expr::Add(left, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.add(left, right)
            }
        }
    }

    fn evaluate_all(&self, exprs: &[Expr]) -> Result<Vec<Value>, EngineError> {
        exprs.iter().map(|expr| self.evaluate(expr)).collect()
    }

    fn fail(&self, reason: impl Into<String>) -> EngineError {
        ExpressionError::Evaluation {
            snippet: self.snippet.to_string(),
            reason: reason.into(),
        }
        .into()
    }

    fn field(&self, target: Value, name: &str) -> Result<Value, EngineError> {
        match target {
            Value::Object(instance) => instance
                .field(name)
                .map_err(|error| self.fail(format!("{}: {error}", instance.type_name()))),
            Value::Map(mut map) => map
                .swap_remove(name)
                .ok_or_else(|| self.fail(format!("map has no key '{name}'"))),
            other => Err(self.fail(format!("{} has no field '{name}'", other.kind()))),
        }
    }

    fn call(&self, target: Value, method: &str, args: Vec<Value>) -> Result<Value, EngineError> {
        let unsupported = |kind: &str| self.fail(format!("{kind} has no method '{method}'"));
        match (target, method) {
            (Value::Object(instance), _) => instance
                .invoke(method, args)
                .map_err(|error| self.fail(format!("{}.{method}(): {error:#}", instance.type_name()))),
            (Value::String(text), "upper") => self.no_args(method, &args).map(|_| Value::String(text.to_uppercase())),
            (Value::String(text), "lower") => self.no_args(method, &args).map(|_| Value::String(text.to_lowercase())),
            (Value::String(text), "strip") => self.no_args(method, &args).map(|_| Value::String(text.trim().to_string())),
            (value @ (Value::String(_) | Value::List(_) | Value::Map(_)), "len") => {
                self.no_args(method, &args)?;
                self.builtin("len", vec![value])
            }
            (Value::Map(map), "keys") => {
                self.no_args(method, &args)?;
                Ok(Value::List(map.keys().cloned().map(Value::String).collect()))
            }
            (Value::Map(mut map), "get") => {
                let mut args = args.into_iter();
                let (Some(key), default, None) = (args.next(), args.next(), args.next()) else {
                    return Err(self.fail("get() takes a key and an optional default"));
                };
                let Value::String(key) = key else {
                    return Err(self.fail(format!("get() key must be a string, got {}", key.kind())));
                };
                Ok(map.swap_remove(&key).or(default).unwrap_or(Value::Null))
            }
            (other, _) => Err(unsupported(other.kind())),
        }
    }

    fn no_args(&self, method: &str, args: &[Value]) -> Result<(), EngineError> {
        if args.is_empty() {
            Ok(())
        } else {
            Err(self.fail(format!("{method}() takes no arguments, got {}", args.len())))
        }
    }

    fn index(&self, target: Value, index: Value) -> Result<Value, EngineError> {
        match (target, index) {
            (Value::List(mut items), Value::Integer(position)) => {
                let length = items.len() as i64;
                let resolved = if position < 0 { length + position } else { position };
                if (0..length).contains(&resolved) {
                    Ok(items.swap_remove(resolved as usize))
                } else {
                    Err(self.fail(format!("index {position} out of range for list of length {length}")))
                }
            }
            (Value::Map(mut map), Value::String(key)) => map
                .swap_remove(&key)
                .ok_or_else(|| self.fail(format!("map has no key '{key}'"))),
            (target, index) => Err(self.fail(format!("cannot index {} with {}", target.kind(), index.kind()))),
        }
    }

    fn builtin(&self, function: &str, args: Vec<Value>) -> Result<Value, EngineError> {
        let [value] = <[Value; 1]>::try_from(args)
            .map_err(|args| self.fail(format!("{function}() takes exactly one argument, got {}", args.len())))?;
        match function {
            "str" => Ok(Value::String(value.to_string())),
            "len" => match &value {
                Value::String(text) => Ok(Value::Integer(text.chars().count() as i64)),
                Value::List(items) => Ok(Value::Integer(items.len() as i64)),
                Value::Map(map) => Ok(Value::Integer(map.len() as i64)),
                other => Err(self.fail(format!("len() of {} is undefined", other.kind()))),
            },
            "int" => match value {
                Value::Integer(integer) => Ok(Value::Integer(integer)),
                Value::Float(float) => Ok(Value::Integer(float.trunc() as i64)),
                Value::Bool(flag) => Ok(Value::Integer(i64::from(flag))),
                Value::String(text) => text
                    .trim()
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|error| self.fail(format!("int('{text}'): {error}"))),
                other => Err(self.fail(format!("int() of {} is undefined", other.kind()))),
            },
            "float" => match value {
                Value::Integer(integer) => Ok(Value::Float(integer as f64)),
                Value::Float(float) => Ok(Value::Float(float)),
                Value::String(text) => text
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|error| self.fail(format!("float('{text}'): {error}"))),
                other => Err(self.fail(format!("float() of {} is undefined", other.kind()))),
            },
            other => Err(self.fail(format!("unknown function '{other}'"))),
        }
    }

    fn add(&self, left: Value, right: Value) -> Result<Value, EngineError> {
        match (left, right) {
            (Value::Integer(left), Value::Integer(right)) => left
                .checked_add(right)
                .map(Value::Integer)
                .ok_or_else(|| self.fail("integer overflow")),
            (Value::Integer(left), Value::Float(right)) => Ok(Value::Float(left as f64 + right)),
            (Value::Float(left), Value::Integer(right)) => Ok(Value::Float(left + right as f64)),
            (Value::Float(left), Value::Float(right)) => Ok(Value::Float(left + right)),
            (Value::String(left), Value::String(right)) => Ok(Value::String(left + &right)),
            (Value::List(mut left), Value::List(right)) => {
                left.extend(right);
                Ok(Value::List(left))
            }
            (left, right) => Err(self.fail(format!("cannot add {} and {}", left.kind(), right.kind()))),
        }
    }
}
