//! Sprite output naming and writing.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::OutputWriteError;
use crate::icon::DEFAULT_NAMESPACE;

/// Prefix shared by every sprite file.
pub const OUTPUT_PREFIX: &str = "icons-";

/// Output name of the default namespace.
pub const DEFAULT_OUTPUT_NAME: &str = "icons-sprite";

/// Sprite file extension.
pub const OUTPUT_EXTENSION: &str = "svg";

/// Output name for `namespace`.
///
/// Nested namespaces map `:` to `.` (`a:b` -> `icons-a.b`) to stay portable;
/// normalized names never contain dots, so the mapping is reversible.
pub fn output_name(namespace: &str) -> String {
    if namespace == DEFAULT_NAMESPACE {
        DEFAULT_OUTPUT_NAME.to_string()
    } else {
        format!("{OUTPUT_PREFIX}{}", namespace.replace(':', "."))
    }
}

/// Namespace served by a sprite file stem, inverse of [`output_name`].
pub fn namespace_for_output(stem: &str) -> Option<String> {
    if stem == DEFAULT_OUTPUT_NAME {
        return Some(DEFAULT_NAMESPACE.to_string());
    }
    let rest = stem.strip_prefix(OUTPUT_PREFIX)?;
    (!rest.is_empty()).then(|| rest.replace('.', ":"))
}

/// File path of the sprite for `namespace` inside `output_dir`.
pub fn output_path(output_dir: &Path, namespace: &str) -> PathBuf {
    output_dir.join(format!("{}.{OUTPUT_EXTENSION}", output_name(namespace)))
}

/// Whether a write changed anything on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Write `content` to `path`, creating parent directories.
///
/// Skips the write when the file already holds identical content.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteStatus, OutputWriteError> {
    if let Ok(existing) = fs::read(path)
        && existing == content.as_bytes()
    {
        return Ok(WriteStatus::Unchanged);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| OutputWriteError(parent.to_path_buf(), e))?;
    }
    fs::write(path, content).map_err(|e| OutputWriteError(path.to_path_buf(), e))?;
    Ok(WriteStatus::Written)
}

/// Remove sprite files in `output_dir` that are not in `keep`.
///
/// Only files that look like sprites (`icons-*.svg`) are touched.
pub fn remove_stale(output_dir: &Path, keep: &[PathBuf]) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(output_dir) else {
        return Vec::new();
    };

    let mut removed = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || keep.contains(&path) || !is_sprite_file(&path) {
            continue;
        }
        if fs::remove_file(&path).is_ok() {
            removed.push(path);
        }
    }
    removed
}

fn is_sprite_file(path: &Path) -> bool {
    let ext_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == OUTPUT_EXTENSION);
    let stem_matches = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| namespace_for_output(s).is_some());
    ext_matches && stem_matches
}
