//! A processing chain: a `Pipeline` threads a state map through `Converter`s.
//!
//! Each converter checks the incoming `status`, rewrites it and appends a
//! `before->after` line to `history`.

use anyhow::anyhow;
use graphwright_registry::{ClassEntry, ParamSpec};
use graphwright_types::{Component, Instance, InvokeError, Value};
use serde_json::Value as JsonValue;
use tracing::debug;

pub struct Pipeline {
    raw: Value,
    processors: Vec<Instance>,
    done: bool,
    result: Option<Value>,
}

impl Pipeline {
    fn process(&mut self) -> Result<Value, InvokeError> {
        let mut current = self.raw.clone();
        for (index, processor) in self.processors.iter().enumerate() {
            current = processor
                .invoke("process", vec![current])
                .map_err(|error| anyhow!("processor {index} ({}) failed: {error}", processor.type_name()))?;
        }
        self.done = true;
        self.result = Some(current.clone());
        println!("{current}");
        Ok(current)
    }
}

impl Component for Pipeline {
    fn methods(&self) -> &'static [&'static str] {
        &["process"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        match method {
            "process" => {
                InvokeError::expect_arity(method, &args, 0)?;
                self.process()
            }
            _ => Err(InvokeError::unknown_method(method)),
        }
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "raw" => Some(self.raw.clone()),
            "processors" => Some(Value::List(self.processors.iter().cloned().map(Value::Object).collect())),
            "done" => Some(Value::Bool(self.done)),
            "result" => Some(self.result.clone().unwrap_or(Value::Null)),
            _ => None,
        }
    }
}

pub struct Converter {
    src: Option<String>,
    dst: String,
    append: bool,
}

impl Converter {
    fn process(&self, inputs: Value) -> Result<Value, InvokeError> {
        let Value::Map(mut inputs) = inputs else {
            return Err(InvokeError::ArgumentType {
                method: "process".into(),
                position: 0,
                expected: "map",
                found: inputs.kind(),
            });
        };

        let before = match inputs.get("status") {
            Some(Value::String(status)) => status.clone(),
            Some(other) => return Err(anyhow!("'status' must be a string, got {}", other.kind()).into()),
            None => return Err(anyhow!("inputs have no 'status'").into()),
        };
        if let Some(src) = &self.src
            && src != &before
        {
            return Err(anyhow!("expected status '{src}', got '{before}'").into());
        }

        let after = if self.append {
            format!("{before}{}", self.dst)
        } else {
            self.dst.clone()
        };
        debug!(before = %before, after = %after, "converted");
        inputs.insert("status".into(), Value::String(after.clone()));
        match inputs.get_mut("history") {
            Some(Value::List(history)) => history.push(Value::String(format!("{before}->{after}"))),
            _ => return Err(anyhow!("inputs have no 'history' list").into()),
        }
        Ok(Value::Map(inputs))
    }
}

impl Component for Converter {
    fn methods(&self) -> &'static [&'static str] {
        &["process"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        match method {
            "process" => {
                InvokeError::expect_arity(method, &args, 1)?;
                let inputs = args.into_iter().next().unwrap_or(Value::Null);
                self.process(inputs)
            }
            _ => Err(InvokeError::unknown_method(method)),
        }
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "src" => Some(self.src.clone().map(Value::String).unwrap_or(Value::Null)),
            "dst" => Some(Value::String(self.dst.clone())),
            "append" => Some(Value::Bool(self.append)),
            _ => None,
        }
    }
}

pub fn entries() -> Vec<ClassEntry> {
    vec![
        ClassEntry::new("Pipeline", |mut args| {
            Ok(Pipeline {
                raw: args.take("raw")?,
                processors: args.instances("processors")?,
                done: false,
                result: None,
            })
        })
        .param(ParamSpec::required("raw").describe("initial state map with 'status' and 'history'"))
        .param(ParamSpec::required("processors").describe("converters applied in order"))
        .summary("Runs `raw` through every processor on `process`."),
        ClassEntry::new("Converter", |mut args| {
            Ok(Converter {
                src: args.optional_string("src")?,
                dst: args.string("dst")?,
                append: args.bool("append")?,
            })
        })
        .param(ParamSpec::required("src").describe("expected incoming status; null accepts any"))
        .param(ParamSpec::required("dst"))
        .param(ParamSpec::optional("append", JsonValue::Bool(true)))
        .summary("Appends `dst` to the status, or replaces it when `append` is false."),
    ]
}
