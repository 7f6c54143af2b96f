use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log file written inside a run workspace.
pub const RUN_LOG_FILE: &str = "run.log";

/// Installs the global subscriber: stderr always, plus `log_file` when given.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Later calls are no-ops.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(true))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
    Ok(())
}
