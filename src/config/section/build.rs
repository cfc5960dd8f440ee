//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! source = "icons"                  # Icon tree (relative to project root)
//! output = "public/icons"           # Sprite output directory
//! types = "src/icon-names.ts"       # Generated icon name listing
//! manifest = "public/icons/manifest.json"  # Optional JSON manifest
//! extensions = ["svg"]              # Icon file extensions, case-insensitive
//! optimize = false                  # Lossless usvg round trip per icon
//! duplicates = "strict"             # strict | lenient
//! clean = false                     # Remove stale sprites after a build
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::icon::DuplicatePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub types: PathBuf,
    pub manifest: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub optimize: bool,
    pub duplicates: DuplicatePolicy,
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "icons".into(),
            output: "public/icons".into(),
            types: "src/icon-names.ts".into(),
            manifest: None,
            extensions: vec!["svg".into()],
            optimize: false,
            duplicates: DuplicatePolicy::Strict,
            clean: false,
        }
    }
}

impl BuildConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                FieldPath::new("build.extensions"),
                "no icon file extensions configured",
                "use extensions = [\"svg\"]",
            );
        }
        if self
            .extensions
            .iter()
            .any(|ext| ext.trim().trim_start_matches('.').is_empty())
        {
            diag.error(FieldPath::new("build.extensions"), "empty extension in list");
        }
        if !self.source.exists() {
            diag.warn(
                FieldPath::new("build.source"),
                format!("directory `{}` not found", self.source.display()),
            );
        }
    }

    /// Configured extensions without a leading dot, lowercased.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }
}
