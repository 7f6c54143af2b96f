//! The quick-start type.

use graphwright_registry::{ClassEntry, ParamSpec};
use graphwright_types::{Component, InvokeError, Value};

pub struct SayMsg {
    msg: Value,
}

impl Component for SayMsg {
    fn methods(&self) -> &'static [&'static str] {
        &["say_msg"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        match method {
            "say_msg" => {
                InvokeError::expect_arity(method, &args, 0)?;
                let line = format!("Hey here! {}", self.msg);
                println!("{line}");
                Ok(Value::String(line))
            }
            _ => Err(InvokeError::unknown_method(method)),
        }
    }

    fn field(&self, name: &str) -> Option<Value> {
        (name == "msg").then(|| self.msg.clone())
    }
}

pub fn entries() -> Vec<ClassEntry> {
    vec![
        ClassEntry::new("SayMsgClass", |mut args| Ok(SayMsg { msg: args.take("msg")? }))
            .param(ParamSpec::required("msg"))
            .summary("Prints its message on `say_msg`."),
    ]
}
