use std::path::{Path, PathBuf};

use dirs_next::home_dir;

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde are returned unchanged (after trimming).
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Tilde-expands `path` and anchors it at the current directory when relative.
pub fn absolute_path(path: &str) -> std::io::Result<PathBuf> {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        std::path::absolute(Path::new(&expanded))
    }
}
