//! `graphwright gen <classes..> [-o output]`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use graphwright_registry::{ClassRegistry, ExampleDocument};

/// Writes an example document for `names` to `output`.
///
/// Unknown names are reported and skipped; repeated names produce repeated objects.
pub fn generate(registry: &ClassRegistry, names: &[String], output: &Path) -> Result<ExampleDocument> {
    let generated = registry.example_document(names.iter().map(String::as_str));
    for name in &generated.unknown {
        println!("can't find {name} in registry, won't dump it to json.");
    }

    let content = serde_json::to_string_pretty(&generated.document)?;
    fs::write(output, content).with_context(|| format!("failed to write {}", output.display()))?;
    println!("saved gen json to {}", output.display());
    Ok(generated)
}
