//! `graphwright run <document>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use graphwright_engine::{DispatchOutcome, Document, create};
use graphwright_registry::ClassRegistry;
use graphwright_util::{copy_if_not_exists, create_workfolder};
use tracing::info;

use crate::logging::RUN_LOG_FILE;

pub const NOTHING_TO_RUN: &str =
    "No object with 'method' config in json. Nothing to run. Try set 'method' attr to top objects.";

#[derive(Debug)]
pub struct RunReport {
    /// Workspace created for this run, when the document has a `task` section.
    pub work_dir: Option<PathBuf>,
    pub outcome: DispatchOutcome,
}

/// Loads `document_path`, prepares the run workspace, builds the graph and dispatches it.
///
/// `init_logging` receives the workspace log file (if any) before anything is built.
pub fn run(
    registry: &ClassRegistry,
    document_path: &Path,
    init_logging: impl FnOnce(Option<&Path>) -> Result<()>,
) -> Result<RunReport> {
    let document = Document::from_path(document_path)?;

    let work_dir = match document.task()? {
        Some(task) => Some(
            create_workfolder(&task.saved_path, &task.name)
                .with_context(|| format!("failed to create the workspace for task '{}'", task.name))?,
        ),
        None => None,
    };
    let log_file = work_dir.as_deref().map(|dir| dir.join(RUN_LOG_FILE));
    init_logging(log_file.as_deref())?;

    if let Some(dir) = &work_dir {
        let copied = copy_if_not_exists(document_path, dir)?;
        info!(work_dir = %dir.display(), document = %copied.display(), "prepared workspace");
    }

    let assembly = create(registry, &document)?;
    let outcome = assembly.dispatch()?;
    if outcome == DispatchOutcome::NothingToRun {
        println!("{NOTHING_TO_RUN}");
    }
    Ok(RunReport { work_dir, outcome })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::modules::builtin_registry;

    fn no_logging(_: Option<&Path>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn task_section_creates_workspace_with_document_copy() {
        let root = tempfile::tempdir().expect("tempdir");
        let runs = root.path().join("runs");
        let document_path = root.path().join("hello.json");
        let document = json!({
            "task": {"saved_path": runs.to_str().expect("utf-8"), "name": "hello"},
            "objects": [{"clazz": "SayMsgClass", "args": ["Hello World!"], "method": "say_msg"}]
        });
        fs::write(&document_path, serde_json::to_string_pretty(&document).expect("json")).expect("write");

        let mut requested_log = None;
        let report = run(&builtin_registry().expect("registry"), &document_path, |log_file| {
            requested_log = log_file.map(Path::to_path_buf);
            Ok(())
        })
        .expect("run");

        assert_eq!(report.outcome, DispatchOutcome::Completed { invoked: 1 });
        let work_dir = report.work_dir.expect("workspace");
        assert!(work_dir.starts_with(runs.join("hello")));
        assert!(work_dir.join("hello.json").is_file());
        assert_eq!(requested_log, Some(work_dir.join(RUN_LOG_FILE)));
    }

    #[test]
    fn document_without_methods_has_nothing_to_run() {
        let root = tempfile::tempdir().expect("tempdir");
        let document_path = root.path().join("idle.yaml");
        fs::write(&document_path, "objects:\n  - clazz: SayMsgClass\n    args: [quiet]\n").expect("write");

        let report = run(&builtin_registry().expect("registry"), &document_path, no_logging).expect("run");
        assert_eq!(report.outcome, DispatchOutcome::NothingToRun);
        assert!(report.work_dir.is_none());
    }

    #[test]
    fn unknown_class_fails_the_run() {
        let root = tempfile::tempdir().expect("tempdir");
        let document_path = root.path().join("broken.json");
        fs::write(&document_path, r#"[{"clazz": "Missing", "name": "m", "method": "go"}]"#).expect("write");

        let error = run(&builtin_registry().expect("registry"), &document_path, no_logging).expect_err("unknown class");
        assert!(error.to_string().contains("clazz 'Missing' not registered"), "{error}");
    }
}
