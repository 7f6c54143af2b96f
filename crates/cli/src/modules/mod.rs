//! Types registered by the binary so documents can be run without recompiling.

use graphwright_registry::{ClassRegistry, RegistryError};

pub mod classroom;
pub mod greeting;
pub mod pipeline;

/// A registry holding every built-in type.
pub fn builtin_registry() -> Result<ClassRegistry, RegistryError> {
    let mut registry = ClassRegistry::new();
    for entry in pipeline::entries()
        .into_iter()
        .chain(classroom::entries())
        .chain(greeting::entries())
    {
        registry.register(entry)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_registered_in_order() {
        let registry = builtin_registry().expect("registry");
        let names: Vec<_> = registry.entries().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Pipeline", "Converter", "Student", "Teacher", "SayMsgClass"]);
    }
}
