use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use graphwright_engine::{DispatchOutcome, Document, DocumentError, EngineError, create};
use graphwright_registry::{ClassEntry, ClassRegistry, ParamSpec};
use graphwright_types::{Component, Instance, InvokeError, Value};
use serde_json::{Value as JsonValue, json};

struct Pipeline {
    raw: Value,
    processors: Vec<Instance>,
    result: Option<Value>,
}

impl Component for Pipeline {
    fn methods(&self) -> &'static [&'static str] {
        &["process"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        match method {
            "process" => {
                InvokeError::expect_arity(method, &args, 0)?;
                let mut current = self.raw.clone();
                for processor in &self.processors {
                    current = processor.invoke("process", vec![current])?;
                }
                self.result = Some(current.clone());
                Ok(current)
            }
            _ => Err(InvokeError::unknown_method(method)),
        }
    }
}

struct Converter {
    src: Option<String>,
    dst: String,
    append: bool,
}

impl Component for Converter {
    fn methods(&self) -> &'static [&'static str] {
        &["process"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        if method != "process" {
            return Err(InvokeError::unknown_method(method));
        }
        InvokeError::expect_arity(method, &args, 1)?;
        let Some(Value::Map(mut inputs)) = args.into_iter().next() else {
            return Err(anyhow::anyhow!("process expects a map").into());
        };

        let before = inputs.get("status").and_then(Value::as_str).unwrap_or_default().to_string();
        if let Some(src) = &self.src
            && src != &before
        {
            return Err(anyhow::anyhow!("expected status '{src}', got '{before}'").into());
        }
        let after = if self.append { format!("{before}{}", self.dst) } else { self.dst.clone() };
        inputs.insert("status".into(), Value::String(after.clone()));
        if let Some(Value::List(history)) = inputs.get_mut("history") {
            history.push(Value::String(format!("{before}->{after}")));
        }
        Ok(Value::Map(inputs))
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "dst" => Some(Value::String(self.dst.clone())),
            _ => None,
        }
    }
}

fn registry(constructed: Arc<AtomicUsize>) -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    let pipeline_count = constructed.clone();
    registry
        .register(
            ClassEntry::new("Pipeline", move |mut args| {
                pipeline_count.fetch_add(1, Ordering::SeqCst);
                Ok(Pipeline {
                    raw: args.take("raw")?,
                    processors: args.instances("processors")?,
                    result: None,
                })
            })
            .param(ParamSpec::required("raw"))
            .param(ParamSpec::required("processors")),
        )
        .expect("register Pipeline");
    registry
        .register(
            ClassEntry::new("Converter", move |mut args| {
                constructed.fetch_add(1, Ordering::SeqCst);
                Ok(Converter {
                    src: args.optional_string("src")?,
                    dst: args.string("dst")?,
                    append: args.bool("append")?,
                })
            })
            .param(ParamSpec::required("src"))
            .param(ParamSpec::required("dst"))
            .param(ParamSpec::optional("append", true)),
        )
        .expect("register Converter");
    registry
}

fn mooncake_document() -> JsonValue {
    json!({
        "objects": [
            {
                "clazz": "Pipeline",
                "name": "MoonCakeFactory",
                "method": "process",
                "args": {
                    "raw": {"status": "raw", "history": []},
                    "processors": [
                        "${flour}",
                        "${milk}",
                        "${salt}",
                        {"clazz": "Converter", "args": [null, "mixer", false]},
                        "${egg}",
                        "${cool}",
                        "${hot}",
                        "${shape}"
                    ]
                }
            },
            {"clazz": "Converter", "name": "flour", "args": ["raw", "_flour"]},
            {"clazz": "Converter", "name": "milk", "args": {"src": "raw_flour", "dst": "_milk"}},
            {"clazz": "Converter", "name": "salt", "args": ["raw_flour_milk", "_salt"]},
            {"clazz": "Converter", "name": "egg", "args": ["mixer", "_egg"]},
            {"clazz": "Converter", "name": "cool", "args": ["mixer_egg", "_cool"]},
            {"clazz": "Converter", "name": "hot", "args": ["mixer_egg_cool", "_hot"]},
            {"clazz": "Converter", "name": "shape", "args": ["mixer_egg_cool_hot", "MoonCake", false]}
        ]
    })
}

#[test]
fn mooncake_pipeline_records_every_transition() {
    let directory = tempfile::tempdir().expect("tempdir");
    let path = directory.path().join("mooncake.yaml");
    let yaml = serde_yaml::to_string(&mooncake_document()).expect("yaml");
    std::fs::write(&path, yaml).expect("write document");

    let document = Document::from_path(&path).expect("document");
    let assembly = create(&registry(Arc::default()), &document).expect("build");
    assert_eq!(assembly.core_objects().len(), 1);
    assert_eq!(assembly.dispatch().expect("dispatch"), DispatchOutcome::Completed { invoked: 1 });

    let result = assembly
        .get("MoonCakeFactory")
        .expect("factory")
        .with(|pipeline: &Pipeline| pipeline.result.clone())
        .flatten()
        .expect("pipeline result");
    let result = result.as_map().expect("map result");
    assert_eq!(result.get("status"), Some(&Value::from("MoonCake")));
    let history: Vec<String> = result
        .get("history")
        .and_then(Value::as_list)
        .expect("history")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        history,
        vec![
            "raw->raw_flour",
            "raw_flour->raw_flour_milk",
            "raw_flour_milk->raw_flour_milk_salt",
            "raw_flour_milk_salt->mixer",
            "mixer->mixer_egg",
            "mixer_egg->mixer_egg_cool",
            "mixer_egg_cool->mixer_egg_cool_hot",
            "mixer_egg_cool_hot->MoonCake",
        ]
    );
}

#[test]
fn shared_references_point_at_one_instance() {
    let document = Document::from_value(json!([
        {"clazz": "Pipeline", "name": "twice", "args": [{}, ["${step}", "${step}"]]},
        {"clazz": "Converter", "name": "step", "args": [null, "x"]}
    ]))
    .expect("document");
    let assembly = create(&registry(Arc::default()), &document).expect("build");
    let processors = assembly
        .get("twice")
        .expect("twice")
        .with(|pipeline: &Pipeline| pipeline.processors.clone())
        .expect("pipeline");
    assert!(processors[0].ptr_eq(&processors[1]));
    assert!(processors[0].ptr_eq(&assembly.get("step").expect("step")));
}

#[test]
fn duplicate_names_fail_at_validation() {
    let error = Document::from_value(json!([
        {"clazz": "Converter", "name": "twin", "args": [null, "a"]},
        {"clazz": "Converter", "name": "twin", "args": [null, "b"]}
    ]))
    .expect_err("duplicate names");
    assert!(matches!(error, DocumentError::DuplicateNames { ref names } if names == &vec!["twin".to_string()]));
}

#[test]
fn whole_value_substitution_discards_surrounding_text() {
    let document = Document::from_value(json!([
        {"clazz": "Pipeline", "name": "p", "args": [{}, ["prefix ${x} suffix"]]},
        {"clazz": "Converter", "name": "x", "args": [null, "x"]}
    ]))
    .expect("document");
    let assembly = create(&registry(Arc::default()), &document).expect("build");
    let processors = assembly
        .get("p")
        .expect("p")
        .with(|pipeline: &Pipeline| pipeline.processors.clone())
        .expect("pipeline");
    assert!(processors[0].ptr_eq(&assembly.get("x").expect("x")));
}

#[test]
fn expression_arguments_are_computed_from_the_pool() {
    let document = Document::from_value(json!([
        {"clazz": "Converter", "name": "derived", "args": [null, "@@ ${base}.dst + '_derived' @@"]},
        {"clazz": "Converter", "name": "base", "args": [null, "base"]}
    ]))
    .expect("document");
    let assembly = create(&registry(Arc::default()), &document).expect("build");
    let dst = assembly
        .get("derived")
        .expect("derived")
        .with(|converter: &Converter| converter.dst.clone())
        .expect("converter");
    assert_eq!(dst, "base_derived");
}

#[test]
fn forward_reference_is_reported_with_ordering_guidance() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let document = Document::from_value(json!([
        {"clazz": "Converter", "name": "base", "args": [null, "base"]},
        {"clazz": "Pipeline", "name": "p", "args": [{}, ["${base}"]]}
    ]))
    .expect("document");
    let error = create(&registry(constructed.clone()), &document).expect_err("forward reference");
    let message = error.to_string();
    assert!(matches!(error, EngineError::ReferenceNotFound { ref token } if token == "base"));
    assert!(message.contains("declared after"), "{message}");
    assert_eq!(constructed.load(Ordering::SeqCst), 0);
}
