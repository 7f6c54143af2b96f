//! Students and the teacher that calls the roll.

use anyhow::anyhow;
use graphwright_registry::{ClassEntry, ParamSpec};
use graphwright_types::{Component, Instance, InvokeError, Value};
use serde_json::{Value as JsonValue, json};

pub struct Student {
    name: String,
    student_id: Value,
    phone: Value,
    age: i64,
    school_name: String,
    class_number: i64,
}

impl Student {
    fn describe(&self) -> String {
        format!(
            "{}, {}, {}, {},{},{}",
            self.name, self.student_id, self.phone, self.age, self.school_name, self.class_number
        )
    }
}

impl Component for Student {
    fn methods(&self) -> &'static [&'static str] {
        &["call_self", "set_id"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        match method {
            "call_self" => {
                InvokeError::expect_arity(method, &args, 0)?;
                let line = self.describe();
                println!("{line}");
                Ok(Value::String(line))
            }
            "set_id" => {
                InvokeError::expect_arity(method, &args, 1)?;
                self.student_id = args.into_iter().next().unwrap_or(Value::Null);
                Ok(Value::Null)
            }
            _ => Err(InvokeError::unknown_method(method)),
        }
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::String(self.name.clone())),
            "student_id" => Some(self.student_id.clone()),
            "phone" => Some(self.phone.clone()),
            "age" => Some(Value::Integer(self.age)),
            "school_name" => Some(Value::String(self.school_name.clone())),
            "class_number" => Some(Value::Integer(self.class_number)),
            _ => None,
        }
    }
}

pub struct Teacher {
    students: Vec<Instance>,
}

impl Component for Teacher {
    fn methods(&self) -> &'static [&'static str] {
        &["call_name", "call_self"]
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        match method {
            "call_name" => {
                InvokeError::expect_arity(method, &args, 0)?;
                let mut names = Vec::with_capacity(self.students.len());
                for student in &self.students {
                    let name = student.field("name")?;
                    println!("{name}");
                    names.push(name);
                }
                Ok(Value::List(names))
            }
            "call_self" => {
                InvokeError::expect_arity(method, &args, 0)?;
                self.students
                    .iter()
                    .map(|student| student.invoke("call_self", Vec::new()))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            _ => Err(InvokeError::unknown_method(method)),
        }
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "students" => Some(Value::List(self.students.iter().cloned().map(Value::Object).collect())),
            _ => None,
        }
    }
}

fn integer(value: Value, name: &str) -> anyhow::Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| anyhow!("Student: argument '{name}' must be an integer, got {}", value.kind()))
}

pub fn entries() -> Vec<ClassEntry> {
    vec![
        ClassEntry::new("Student", |mut args| {
            Ok(Student {
                name: args.string("name")?,
                student_id: args.take("student_id")?,
                phone: args.take("phone")?,
                age: integer(args.take("age")?, "age")?,
                school_name: args.string("school_name")?,
                class_number: integer(args.take("class_number")?, "class_number")?,
            })
        })
        .param(ParamSpec::required("name"))
        .param(ParamSpec::optional("student_id", JsonValue::Null))
        .param(ParamSpec::optional("phone", JsonValue::Null))
        .param(ParamSpec::optional("age", json!(18)))
        .param(ParamSpec::optional("school_name", "Hope Primary School"))
        .param(ParamSpec::optional("class_number", json!(2)))
        .summary("A student record; `call_self` prints it."),
        ClassEntry::new("Teacher", |mut args| {
            Ok(Teacher {
                students: args.instances("students")?,
            })
        })
        .param(ParamSpec::required("students").describe("list of Student objects"))
        .summary("Calls the roll of its students with `call_name`."),
    ]
}
