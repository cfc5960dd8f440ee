//! Icon source tree scanning (pure, no side effects).
//!
//! ```text
//! icons/
//! ├── home.svg              -> home
//! ├── readme.md             -> (ignored)
//! └── Social Media/
//!     ├── facebook.svg      -> social-media:facebook
//!     └── brands/
//!         └── GitHub.svg    -> social-media:brands:git-hub
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::entry::{IconEntry, RESERVED_NAMESPACES, SEPARATOR};
use super::name::{InvalidNameError, normalize};

/// A top-level folder normalizes to a namespace the build keeps for itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("folder `{}` maps to reserved namespace `{namespace}`, rename it", .folder.display())]
pub struct ReservedNamespaceError {
    pub folder: PathBuf,
    pub namespace: String,
}

/// Result of one scan pass.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Entries in depth-first discovery order.
    pub entries: Vec<IconEntry>,
    /// Files or folders whose names could not be normalized.
    pub invalid: Vec<InvalidNameError>,
    /// Top-level folders that were skipped for using a reserved namespace.
    pub reserved: Vec<ReservedNamespaceError>,
    /// Source root does not exist.
    pub root_missing: bool,
}

/// Scan `root` for icon files with one of `extensions`.
///
/// Extensions are compared case-insensitively and given without the dot.
/// A missing root is not an error: the outcome is empty with `root_missing` set.
pub fn scan(root: &Path, extensions: &[String]) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    if !root.is_dir() {
        outcome.root_missing = true;
        return outcome;
    }

    scan_recursive(&mut outcome, root, root, "", extensions);
    outcome
}

/// Recursive helper, `namespace` is the normalized chain of parent folders.
fn scan_recursive(
    outcome: &mut ScanOutcome,
    dir: &Path,
    root: &Path,
    namespace: &str,
    extensions: &[String],
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        crate::debug!("scan"; "unreadable directory: {}", dir.display());
        return;
    };

    // Sorted, so output and "first wins" do not depend on the filesystem
    let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_hidden_or_temp(file_name) {
            continue;
        }

        if path.is_dir() {
            match normalize(file_name) {
                Ok(segment)
                    if namespace.is_empty() && RESERVED_NAMESPACES.contains(&segment.as_str()) =>
                {
                    outcome.reserved.push(ReservedNamespaceError {
                        folder: path.clone(),
                        namespace: segment,
                    });
                }
                Ok(segment) => {
                    let child = qualify(namespace, &segment);
                    scan_recursive(outcome, &path, root, &child, extensions);
                }
                Err(e) => outcome.invalid.push(e),
            }
            continue;
        }

        if !has_extension(&path, extensions) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        match normalize(stem) {
            Ok(leaf) => outcome.entries.push(IconEntry::new(
                original_name(&path, root),
                qualify(namespace, &leaf),
                path.clone(),
            )),
            Err(e) => outcome.invalid.push(e),
        }
    }
}

/// Join a namespace chain and a segment with `:`.
fn qualify(namespace: &str, segment: &str) -> String {
    if namespace.is_empty() {
        segment.to_string()
    } else {
        format!("{namespace}{SEPARATOR}{segment}")
    }
}

/// Relative path without extension, using `/` separators.
fn original_name(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path).with_extension("");
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Dotfiles and editor artifacts.
fn is_hidden_or_temp(name: &str) -> bool {
    name.starts_with('.') || name.ends_with('~')
}
