//! `[loader]` section configuration.
//!
//! ```toml
//! [loader]
//! base_url = "http://127.0.0.1:5278/icons"  # Where sprites are fetched from
//! version = "1.0.0"                         # Persisted sprites from another version are refetched
//! session = ".icon-sprite/session.json"     # Persisted cache tier
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub base_url: String,
    pub version: String,
    pub session: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5278/icons".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            session: ".icon-sprite/session.json".into(),
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.version.trim().is_empty() {
            diag.error(FieldPath::new("loader.version"), "version stamp must not be empty");
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            diag.error_with_hint(
                FieldPath::new("loader.base_url"),
                format!("`{}` is not an http(s) URL", self.base_url),
                "use base_url = \"http://127.0.0.1:5278/icons\"",
            );
        }
    }
}
