//! Running the entry methods of core objects.

use tracing::{info, warn};

use crate::{EngineError, builder::Assembly};

/// What a dispatch pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No top-level object declares a `method`.
    NothingToRun,
    Completed { invoked: usize },
}

impl Assembly {
    /// Invokes every core object's method with no arguments, in document order.
    ///
    /// The first failure aborts the remaining calls.
    pub fn dispatch(&self) -> Result<DispatchOutcome, EngineError> {
        if self.core_objects.is_empty() {
            warn!("no top-level object declares a 'method'; nothing to run");
            return Ok(DispatchOutcome::NothingToRun);
        }

        for core in &self.core_objects {
            let invocation = |source| EngineError::Invocation {
                name: core.name.clone(),
                method: core.method.clone(),
                source,
            };
            if !core.instance.has_method(&core.method).map_err(invocation)? {
                return Err(EngineError::MethodNotFound {
                    name: core.name.clone(),
                    class: core.class.clone(),
                    method: core.method.clone(),
                });
            }
            info!(object = %core.name, class = %core.class, method = %core.method, "running core object");
            core.instance.invoke(&core.method, Vec::new()).map_err(invocation)?;
        }

        Ok(DispatchOutcome::Completed {
            invoked: self.core_objects.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use graphwright_registry::{ClassEntry, ClassRegistry, ParamSpec};
    use graphwright_types::{Component, Instance, InvokeError, Value};
    use serde_json::{Value as JsonValue, json};

    use super::*;
    use crate::{Document, create};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        label: String,
        journal: Journal,
    }

    impl Component for Recorder {
        fn methods(&self) -> &'static [&'static str] {
            &["run", "fail"]
        }

        fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
            InvokeError::expect_arity(method, &args, 0)?;
            match method {
                "run" => {
                    self.journal.lock().expect("journal").push(format!("{}.run", self.label));
                    Ok(Value::Null)
                }
                "fail" => Err(anyhow::anyhow!("{} refused", self.label).into()),
                _ => Err(InvokeError::unknown_method(method)),
            }
        }
    }

    /// Forwards `run` to its target, which may not answer it.
    struct Relay {
        target: Instance,
        journal: Journal,
    }

    impl Component for Relay {
        fn methods(&self) -> &'static [&'static str] {
            &["run"]
        }

        fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
            match method {
                "run" => {
                    self.journal.lock().expect("journal").push("relay.run".into());
                    self.target.invoke(method, args)
                }
                _ => Err(InvokeError::unknown_method(method)),
            }
        }
    }

    struct Silent;
    impl Component for Silent {}

    fn registry(journal: &Journal) -> ClassRegistry {
        let journal = journal.clone();
        let mut registry = ClassRegistry::new();
        let recorder_journal = journal.clone();
        registry
            .register(
                ClassEntry::new("Recorder", move |mut args| {
                    Ok(Recorder {
                        label: args.string("label")?,
                        journal: recorder_journal.clone(),
                    })
                })
                .param(ParamSpec::required("label")),
            )
            .expect("register");
        let relay_journal = journal.clone();
        registry
            .register(
                ClassEntry::new("Relay", move |mut args| {
                    Ok(Relay {
                        target: args.instance("target")?,
                        journal: relay_journal.clone(),
                    })
                })
                .param(ParamSpec::required("target")),
            )
            .expect("register");
        registry
            .register(ClassEntry::new("Silent", |_| Ok(Silent)))
            .expect("register");
        registry
    }

    fn assemble(journal: &Journal, objects: JsonValue) -> crate::Assembly {
        create(&registry(journal), &Document::from_value(objects).expect("document")).expect("build")
    }

    #[test]
    fn runs_core_objects_in_document_order() {
        let journal = Journal::default();
        let assembly = assemble(
            &journal,
            json!([
                {"clazz": "Recorder", "name": "a", "args": ["a"], "method": "run"},
                {"clazz": "Recorder", "name": "b", "args": ["b"], "method": "run"}
            ]),
        );
        assert_eq!(assembly.dispatch().expect("dispatch"), DispatchOutcome::Completed { invoked: 2 });
        assert_eq!(*journal.lock().expect("journal"), vec!["a.run", "b.run"]);
    }

    #[test]
    fn nothing_to_run_is_not_an_error() {
        let journal = Journal::default();
        let assembly = assemble(&journal, json!([{"clazz": "Recorder", "args": ["idle"]}]));
        assert_eq!(assembly.dispatch().expect("dispatch"), DispatchOutcome::NothingToRun);
        assert!(journal.lock().expect("journal").is_empty());
    }

    #[test]
    fn unknown_method_names_object_and_class() {
        let journal = Journal::default();
        let assembly = assemble(
            &journal,
            json!([{"clazz": "Recorder", "name": "a", "args": ["a"], "method": "launch"}]),
        );
        let error = assembly.dispatch().expect_err("unknown method");
        assert!(matches!(
            error,
            EngineError::MethodNotFound { ref name, ref class, ref method }
                if name == "a" && class == "Recorder" && method == "launch"
        ));
    }

    #[test]
    fn failure_aborts_remaining_calls() {
        let journal = Journal::default();
        let assembly = assemble(
            &journal,
            json!([
                {"clazz": "Recorder", "name": "a", "args": ["a"], "method": "fail"},
                {"clazz": "Recorder", "name": "b", "args": ["b"], "method": "run"}
            ]),
        );
        let error = assembly.dispatch().expect_err("failure");
        assert!(matches!(error, EngineError::Invocation { ref name, .. } if name == "a"));
        assert!(error.to_string().contains("a refused"), "{error}");
        assert!(journal.lock().expect("journal").is_empty());
    }

    #[test]
    fn missing_method_is_detected_before_the_call() {
        let journal = Journal::default();
        let assembly = assemble(
            &journal,
            json!([
                {"clazz": "Recorder", "name": "a", "args": ["a"], "method": "run"},
                {"clazz": "Silent", "name": "quiet", "method": "run"}
            ]),
        );
        let error = assembly.dispatch().expect_err("Silent has no run");
        assert!(matches!(error, EngineError::MethodNotFound { ref name, .. } if name == "quiet"));
        assert_eq!(*journal.lock().expect("journal"), vec!["a.run"]);
    }

    #[test]
    fn unknown_method_inside_a_call_is_an_invocation_failure() {
        let journal = Journal::default();
        let assembly = assemble(
            &journal,
            json!([
                {"clazz": "Relay", "name": "relay", "args": ["${quiet}"], "method": "run"},
                {"clazz": "Silent", "name": "quiet"}
            ]),
        );
        let error = assembly.dispatch().expect_err("target has no run");
        assert!(matches!(
            error,
            EngineError::Invocation { ref name, source: InvokeError::UnknownMethod { .. }, .. } if name == "relay"
        ));
        assert_eq!(*journal.lock().expect("journal"), vec!["relay.run"]);
    }
}
