//! Constructed objects and the dynamic surface the engine uses to talk to them.
//!
//! Registered types implement [`Component`]. The builder wraps every constructed
//! component in an [`Instance`], a cheap shared handle: a component referenced from
//! several places through `${name}` tokens is the same instance everywhere.

use std::{any::Any, cell::RefCell, fmt, rc::Rc};

use thiserror::Error;

use crate::Value;

/// Behaviour every registered type exposes to the engine.
///
/// `invoke` backs entry-method dispatch and method calls inside expression
/// snippets; `field` backs `.field` access in snippets. Both default to
/// "unknown" so simple types only implement what they need. A type that
/// overrides `invoke` lists the names it answers in `methods`.
pub trait Component: Any {
    /// Methods `invoke` accepts.
    fn methods(&self) -> &'static [&'static str] {
        &[]
    }

    /// Invokes `method` with already-resolved arguments.
    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        let _ = args;
        Err(InvokeError::unknown_method(method))
    }

    /// Reads a named field.
    fn field(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }
}

/// Errors raised while calling into a component.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("no method named '{method}'")]
    UnknownMethod { method: String },

    #[error("no field named '{field}'")]
    UnknownField { field: String },

    #[error("'{method}' expects {expected} argument(s), got {found}")]
    Arity { method: String, expected: usize, found: usize },

    #[error("'{method}' argument {position} must be {expected}, got {found}")]
    ArgumentType {
        method: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// The instance is already borrowed further up the call stack.
    #[error("instance of {type_name} is already in use by an outer call")]
    Reentrant { type_name: &'static str },

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl InvokeError {
    pub fn unknown_method(method: &str) -> Self {
        InvokeError::UnknownMethod {
            method: method.to_string(),
        }
    }

    /// Checks the argument count of a method call.
    pub fn expect_arity(method: &str, args: &[Value], expected: usize) -> Result<(), InvokeError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(InvokeError::Arity {
                method: method.to_string(),
                expected,
                found: args.len(),
            })
        }
    }
}

/// Shared handle to a constructed component.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<RefCell<dyn Component>>,
    type_name: &'static str,
}

impl Instance {
    pub fn new<C: Component>(component: C) -> Self {
        Self {
            inner: Rc::new(RefCell::new(component)),
            type_name: std::any::type_name::<C>(),
        }
    }

    /// Rust type name of the wrapped component.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Stable identity of the underlying allocation for the lifetime of the handle.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.inner).cast::<()>() as usize
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        let mut component = self
            .inner
            .try_borrow_mut()
            .map_err(|_| InvokeError::Reentrant { type_name: self.type_name })?;
        component.invoke(method, args)
    }

    /// Whether the component declares `method`, checked without calling it.
    pub fn has_method(&self, method: &str) -> Result<bool, InvokeError> {
        let component = self
            .inner
            .try_borrow()
            .map_err(|_| InvokeError::Reentrant { type_name: self.type_name })?;
        Ok(component.methods().contains(&method))
    }

    pub fn field(&self, name: &str) -> Result<Value, InvokeError> {
        let component = self
            .inner
            .try_borrow()
            .map_err(|_| InvokeError::Reentrant { type_name: self.type_name })?;
        component
            .field(name)
            .ok_or_else(|| InvokeError::UnknownField { field: name.to_string() })
    }

    /// Runs `read` against the concrete component when it is a `C`.
    pub fn with<C: Component, R>(&self, read: impl FnOnce(&C) -> R) -> Option<R> {
        let component = self.inner.try_borrow().ok()?;
        let any: &dyn Any = &*component;
        any.downcast_ref::<C>().map(read)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Instance({}@{:#x})", self.type_name, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: i64,
    }

    impl Component for Counter {
        fn methods(&self) -> &'static [&'static str] {
            &["bump"]
        }

        fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
            match method {
                "bump" => {
                    InvokeError::expect_arity(method, &args, 0)?;
                    self.count += 1;
                    Ok(Value::Integer(self.count))
                }
                _ => Err(InvokeError::unknown_method(method)),
            }
        }

        fn field(&self, name: &str) -> Option<Value> {
            (name == "count").then_some(Value::Integer(self.count))
        }
    }

    #[test]
    fn clones_share_the_same_component() {
        let first = Instance::new(Counter { count: 0 });
        let second = first.clone();
        first.invoke("bump", Vec::new()).expect("bump");
        assert_eq!(second.field("count").expect("count"), Value::Integer(1));
        assert!(first.ptr_eq(&second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn unknown_members_are_reported() {
        let instance = Instance::new(Counter { count: 0 });
        assert!(matches!(
            instance.invoke("missing", Vec::new()),
            Err(InvokeError::UnknownMethod { .. })
        ));
        assert!(matches!(instance.field("missing"), Err(InvokeError::UnknownField { .. })));
        assert!(instance.has_method("bump").expect("declared"));
        assert!(!instance.has_method("missing").expect("undeclared"));
        assert!(matches!(
            instance.invoke("bump", vec![Value::Null]),
            Err(InvokeError::Arity { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn downcast_reads_concrete_state() {
        let instance = Instance::new(Counter { count: 7 });
        assert_eq!(instance.with(|counter: &Counter| counter.count), Some(7));
        assert!(instance.type_name().ends_with("Counter"));
    }
}
