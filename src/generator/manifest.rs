//! JSON manifest of the generated sprites.
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "namespaces": [
//!     { "namespace": "social", "file": "icons-social.svg", "icons": ["facebook"], "fingerprint": "1a2b3c4d" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::sprite::CombinedDocument;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Loader version stamp the sprites were built for.
    pub version: String,
    pub namespaces: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub namespace: String,
    /// Sprite file name relative to the output directory.
    pub file: String,
    pub icons: Vec<String>,
    /// Content hash, changes whenever the sprite does.
    pub fingerprint: String,
}

impl Manifest {
    pub fn new(version: impl Into<String>, documents: &[CombinedDocument]) -> Self {
        let namespaces = documents
            .iter()
            .map(|doc| ManifestEntry {
                namespace: doc.namespace.clone(),
                file: format!("{}.{}", doc.output_name, crate::sprite::output::OUTPUT_EXTENSION),
                icons: doc.icon_ids.clone(),
                fingerprint: crate::utils::hash::fingerprint(&doc.bytes),
            })
            .collect();
        Self {
            version: version.into(),
            namespaces,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self).map(|mut s| {
            s.push('\n');
            s
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(namespace: &str, bytes: &str, ids: &[&str]) -> CombinedDocument {
        CombinedDocument {
            namespace: namespace.to_string(),
            bytes: bytes.to_string(),
            output_name: crate::sprite::output_name(namespace),
            icon_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_manifest_entries() {
        let manifest = Manifest::new(
            "1.0.0",
            &[doc("default", "<svg/>", &["home"]), doc("social", "<svg></svg>", &["fb"])],
        );
        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.namespaces[0].file, "icons-sprite.svg");
        assert_eq!(manifest.namespaces[1].file, "icons-social.svg");
        assert_eq!(manifest.namespaces[1].icons, ["fb"]);
        assert_eq!(manifest.namespaces[0].fingerprint.len(), 8);
        assert_ne!(manifest.namespaces[0].fingerprint, manifest.namespaces[1].fingerprint);
    }

    #[test]
    fn test_manifest_json() {
        let manifest = Manifest::new("1.0.0", &[doc("default", "<svg/>", &["home"])]);
        let json = manifest.to_json().unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
        assert!(json.contains("\"namespace\": \"default\""));
    }
}
