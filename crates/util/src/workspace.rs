//! Per-run workspaces.
//!
//! A run that asks for a workspace gets a fresh `<saved_path>/<task>/<timestamp>/`
//! directory. The document that drove the run is copied into it so every
//! workspace records how it was produced.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::debug;

use crate::absolute_path;

/// `strftime` pattern of the timestamp directory.
pub const WORKFOLDER_TIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Filesystem failures while preparing a workspace.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("create dir failed: '{}' already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("copy file failed: source file {} does not exist", .path.display())]
    SourceMissing { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("copy file failed: {} already exists", .path.display())]
    TargetExists { path: PathBuf },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `path` and its parents, failing when it already exists.
pub fn create_dir_if_missing_strict(path: &Path) -> Result<(), FsError> {
    if path.exists() {
        return Err(FsError::AlreadyExists { path: path.to_path_buf() });
    }
    fs::create_dir_all(path).map_err(|source| FsError::Io {
        action: "failed to create directory",
        path: path.to_path_buf(),
        source,
    })
}

/// Creates `<saved_path>/<task_name>/<now>/` and returns its absolute path.
pub fn create_workfolder(saved_path: &str, task_name: &str) -> Result<PathBuf, FsError> {
    create_workfolder_at(saved_path, task_name, Local::now())
}

/// [`create_workfolder`] with an explicit timestamp.
pub fn create_workfolder_at(saved_path: &str, task_name: &str, now: DateTime<Local>) -> Result<PathBuf, FsError> {
    let root = absolute_path(saved_path).map_err(|source| FsError::Io {
        action: "failed to resolve",
        path: PathBuf::from(saved_path),
        source,
    })?;

    let mut work_dir = root;
    if !task_name.is_empty() {
        work_dir.push(task_name);
    }
    work_dir.push(now.format(WORKFOLDER_TIME_FORMAT).to_string());

    create_dir_if_missing_strict(&work_dir)?;
    debug!(path = %work_dir.display(), "created workfolder");
    Ok(work_dir)
}

/// Copies `file` into `dst_dir` under its own file name, never overwriting.
///
/// Returns the path of the copy.
pub fn copy_if_not_exists(file: &Path, dst_dir: &Path) -> Result<PathBuf, FsError> {
    if !file.is_file() {
        return Err(FsError::SourceMissing { path: file.to_path_buf() });
    }
    if !dst_dir.is_dir() {
        return Err(FsError::NotADirectory {
            path: dst_dir.to_path_buf(),
        });
    }
    let Some(file_name) = file.file_name() else {
        return Err(FsError::SourceMissing { path: file.to_path_buf() });
    };

    let target = dst_dir.join(file_name);
    if target.exists() {
        return Err(FsError::TargetExists { path: target });
    }
    fs::copy(file, &target).map_err(|source| FsError::Io {
        action: "failed to copy to",
        path: target.clone(),
        source,
    })?;
    Ok(target)
}
