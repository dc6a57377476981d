//! Filename helpers shared by the file-backed modules

use crate::core::error::{LogError, Result};
use std::path::{Path, PathBuf};

/// Split a path into `(stem_with_dirs, extension_with_dot_or_empty)`.
///
/// Only the last `.` in the leaf counts, and a leading-dot-only leaf
/// ("hidden" file) has no extension:
///
/// - `logs/app.txt` → `("logs/app", ".txt")`
/// - `archive.tar.gz` → `("archive.tar", ".gz")`
/// - `.hidden` → `(".hidden", "")`
/// - `plain` → `("plain", "")`
pub fn split_file_extension(path: &Path) -> (PathBuf, String) {
    let leaf = match path.file_name().and_then(|name| name.to_str()) {
        Some(leaf) => leaf,
        None => return (path.to_path_buf(), String::new()),
    };

    match leaf.rfind('.') {
        Some(dot) if dot > 0 => {
            let mut stem = path.to_path_buf();
            stem.set_file_name(&leaf[..dot]);
            (stem, leaf[dot..].to_string())
        }
        _ => (path.to_path_buf(), String::new()),
    }
}

/// Create the missing intermediate directories for `path`; no-op for names
/// without a parent.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(parent)
        .map_err(|e| LogError::io_operation("creating directory", parent.display().to_string(), e))
}
