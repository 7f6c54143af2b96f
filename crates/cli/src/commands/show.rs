//! `graphwright show <filter> [-v]`.

use std::io::Write;

use anyhow::Result;
use graphwright_registry::ClassRegistry;

const RULE: &str = "====================";

/// Prints the registered classes whose name contains `filter`.
///
/// With `verbose`, each match is printed as an example specification followed by its summary.
pub fn show(registry: &ClassRegistry, filter: &str, verbose: bool, out: &mut impl Write) -> Result<()> {
    if !verbose {
        writeln!(out, "=============name:clazz=============")?;
    }
    for entry in registry.matching(filter) {
        if verbose {
            writeln!(out, "below is an example config of this clazz.")?;
            writeln!(out, "{RULE}")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&entry.example_spec())?)?;
            writeln!(out, "{RULE}")?;
            writeln!(out, "below is this clazz's doc")?;
            writeln!(out, "{RULE}")?;
            writeln!(out, "{}", entry.description().unwrap_or("(no description)"))?;
            for param in entry.params() {
                match &param.description {
                    Some(description) => writeln!(out, "  {}: {description}", param.name)?,
                    None => writeln!(out, "  {}", param.name)?,
                }
            }
            writeln!(out, "{RULE}")?;
        } else {
            writeln!(out, "{}  :  {}", entry.name(), entry.type_name())?;
        }
    }
    Ok(())
}
