//! One build pass: scan, resolve, assemble and write.
//!
//! ```text
//! scan ─► resolve duplicates ─► group ─► assemble (all in memory)
//!                                            │
//!            sprites ◄── type listing ◄── manifest ◄── stale cleanup
//! ```
//!
//! Duplicate names under the strict policy, and top-level folders using a
//! reserved namespace, abort before anything is written.
//! A sprite that cannot be written fails only its namespace; the pass goes
//! on and the failure is reported.

pub mod watch;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::SpriteConfig;
use crate::generator::{Manifest, types};
use crate::icon::{self, DEFAULT_NAMESPACE, NamespaceGroup, split_name};
use crate::sprite::{
    self, AssembleOptions, CombinedDocument, OutputWriteError, WriteStatus, output_path,
};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// The session already drives a watcher.
#[derive(Debug, Error)]
#[error("a watcher is already registered for this build session")]
pub struct WatcherAlreadyRegistered;

/// Outcome of one written sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSummary {
    pub namespace: String,
    pub path: PathBuf,
    pub icons: usize,
    pub status: WriteStatus,
}

/// Everything one pass did, including problems that did not abort it.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub sprites: Vec<SpriteSummary>,
    /// Qualified icon names in the type listing, in scan order.
    pub names: Vec<String>,
    /// Files or folders skipped for unusable names.
    pub invalid_names: usize,
    /// Icons left out of their sprite.
    pub skipped_icons: usize,
    /// Duplicates dropped under the lenient policy.
    pub discarded: usize,
    pub write_errors: Vec<OutputWriteError>,
    pub removed: Vec<PathBuf>,
    pub source_missing: bool,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.write_errors.is_empty()
    }

    /// Whether any file on disk changed.
    pub fn changed(&self) -> bool {
        !self.removed.is_empty() || self.sprites.iter().any(|s| s.status == WriteStatus::Written)
    }

    pub fn namespace_count(&self) -> usize {
        self.sprites.len()
    }
}

/// Explicit build context: configuration plus the watcher registration flag.
#[derive(Debug)]
pub struct BuildSession {
    config: SpriteConfig,
    watcher_registered: AtomicBool,
}

impl BuildSession {
    pub fn new(config: SpriteConfig) -> Self {
        Self {
            config,
            watcher_registered: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SpriteConfig {
        &self.config
    }

    /// Claim the session for a watcher. Only the first call succeeds.
    pub fn register_watcher(&self) -> Result<(), WatcherAlreadyRegistered> {
        self.watcher_registered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| WatcherAlreadyRegistered)
    }

    pub fn is_watching(&self) -> bool {
        self.watcher_registered.load(Ordering::SeqCst)
    }

    /// Run one full build pass.
    ///
    /// Returns `Err` only for conditions that stop the pass before output:
    /// a reserved top-level folder, or duplicate names under the strict policy.
    pub fn run(&self) -> Result<BuildReport> {
        let build = &self.config.build;
        let mut report = BuildReport::default();

        // Scan
        let scanned = icon::scan(&build.source, &build.extensions);
        if scanned.root_missing {
            report.source_missing = true;
            log!(
                "warn";
                "icon directory `{}` not found, writing an empty sprite",
                self.config.root_relative(&build.source)
            );
        }
        for invalid in &scanned.invalid {
            log!("warn"; "{}", invalid);
        }
        report.invalid_names = scanned.invalid.len();
        if let Some(first) = scanned.reserved.first() {
            for reserved in &scanned.reserved {
                log!("error"; "{}", reserved);
            }
            return Err(first.clone().into());
        }

        // Resolve duplicates, strict aborts here
        let resolved = icon::resolve(scanned.entries, build.duplicates)?;
        for collision in &resolved.discarded {
            let Some((kept, dropped)) = collision.originals.split_first() else {
                continue;
            };
            for original in dropped {
                log!(
                    "warn";
                    "duplicate `{}` in namespace `{}`: keeping {}, ignoring {}",
                    collision.icon_id, collision.namespace, kept, original
                );
                report.discarded += 1;
            }
        }
        let mut discovered = Vec::with_capacity(resolved.entries.len());
        for entry in &resolved.entries {
            log!("icon"; "{}", entry.normalized_name);
            discovered.push(entry.normalized_name.clone());
        }

        // Group and assemble everything before touching the disk
        let mut groups = icon::group(resolved.entries);
        if groups.is_empty() {
            groups.push(NamespaceGroup::new(DEFAULT_NAMESPACE));
        }
        let options = AssembleOptions {
            optimize: build.optimize,
        };
        let documents: Vec<CombinedDocument> = groups
            .iter()
            .map(|group| {
                let assembled = sprite::assemble(group, options);
                for skipped in &assembled.skipped {
                    log!("warn"; "{}", format_error_chain(skipped));
                }
                for fallback in &assembled.unoptimized {
                    debug!("sprite"; "{}", fallback);
                }
                report.skipped_icons += assembled.skipped.len();
                assembled.document
            })
            .collect();

        // Sprites
        let mut kept_paths = Vec::with_capacity(documents.len());
        for doc in &documents {
            let path = output_path(&build.output, &doc.namespace);
            match sprite::write_if_changed(&path, &doc.bytes) {
                Ok(status) => {
                    let note = match status {
                        WriteStatus::Written => "",
                        WriteStatus::Unchanged => ", unchanged",
                    };
                    log!(
                        "sprite";
                        "{} ({}{})",
                        doc.output_name,
                        plural_count(doc.icon_ids.len(), "icon"),
                        note
                    );
                    report.sprites.push(SpriteSummary {
                        namespace: doc.namespace.clone(),
                        path: path.clone(),
                        icons: doc.icon_ids.len(),
                        status,
                    });
                }
                Err(e) => {
                    log!("error"; "{}", format_error_chain(&e));
                    report.write_errors.push(e);
                }
            }
            kept_paths.push(path);
        }

        // Type listing, from what actually went into the sprites
        report.names = listed_names(discovered, &documents);
        let listing = types::generate(&report.names);
        match sprite::write_if_changed(&build.types, &listing) {
            Ok(_) => debug!("types"; "{}", self.config.root_relative(&build.types)),
            Err(e) => {
                log!("error"; "{}", format_error_chain(&e));
                report.write_errors.push(e);
            }
        }

        // Manifest
        if let Some(manifest_path) = &build.manifest {
            let json = Manifest::new(&self.config.loader.version, &documents)
                .to_json()
                .context("failed to encode manifest")?;
            if let Err(e) = sprite::write_if_changed(manifest_path, &json) {
                log!("error"; "{}", format_error_chain(&e));
                report.write_errors.push(e);
            }
        }

        // Stale sprites, only after a clean pass
        if build.clean && report.is_success() {
            report.removed = sprite::remove_stale(&build.output, &kept_paths);
            for removed in &report.removed {
                log!("sprite"; "removed {}", self.config.root_relative(removed));
            }
        }

        log!(
            "build";
            "{} in {}",
            plural_count(report.names.len(), "icon"),
            plural_count(report.namespace_count(), "namespace")
        );
        Ok(report)
    }
}

/// Names from `discovered` (scan order) that made it into a sprite.
///
/// Normalized names are already qualified: `home`, `social:facebook`.
fn listed_names(discovered: Vec<String>, documents: &[CombinedDocument]) -> Vec<String> {
    let assembled: FxHashSet<(&str, &str)> = documents
        .iter()
        .flat_map(|doc| doc.icon_ids.iter().map(|id| (doc.namespace.as_str(), id.as_str())))
        .collect();
    discovered
        .into_iter()
        .filter(|name| assembled.contains(&split_name(name)))
        .collect()
}

/// `error: cause: cause`, for errors logged instead of returned.
fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::DuplicateNameError;
    use crate::icon::DuplicatePolicy;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const ICON: &str =
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M1 1h22"/></svg>"#;

    fn write_icon(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, ICON).unwrap();
    }

    fn session(dir: &TempDir, policy: DuplicatePolicy) -> BuildSession {
        let root = dir.path();
        let mut config = SpriteConfig::default();
        config.root = root.to_path_buf();
        config.build.source = root.join("icons");
        config.build.output = root.join("public/icons");
        config.build.types = root.join("src/icon-names.ts");
        config.build.duplicates = policy;
        BuildSession::new(config)
    }

    fn read(dir: &TempDir, relative: &str) -> String {
        fs::read_to_string(dir.path().join(relative)).unwrap()
    }

    #[test]
    fn test_default_and_namespaced_sprites() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "home.svg");
        write_icon(&icons, "social/facebook.svg");
        write_icon(&icons, "social/twitter.svg");

        let report = session(&dir, DuplicatePolicy::Strict).run().unwrap();
        assert!(report.is_success());
        assert_eq!(report.namespace_count(), 2);

        let default = read(&dir, "public/icons/icons-sprite.svg");
        assert!(default.contains(r#"<symbol id="home""#));

        let social = read(&dir, "public/icons/icons-social.svg");
        assert!(social.contains(r#"<symbol id="facebook""#));
        assert!(social.contains(r#"<symbol id="twitter""#));
        assert!(!social.contains(r#"id="home""#));

        let mut names = report.names.clone();
        names.sort();
        assert_eq!(names, ["home", "social:facebook", "social:twitter"]);

        let listing = read(&dir, "src/icon-names.ts");
        for name in ["\"home\"", "\"social:facebook\"", "\"social:twitter\""] {
            assert!(listing.contains(name));
        }
    }

    #[test]
    fn test_strict_duplicates_write_nothing() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "sunMoon.svg");
        write_icon(&icons, "sun-moon.svg");

        let err = session(&dir, DuplicatePolicy::Strict).run().unwrap_err();
        let duplicate = err.downcast_ref::<DuplicateNameError>().unwrap();
        assert_eq!(duplicate.collisions.len(), 1);
        assert_eq!(duplicate.collisions[0].icon_id, "sun-moon");

        assert!(!dir.path().join("public").exists());
        assert!(!dir.path().join("src/icon-names.ts").exists());
    }

    #[test]
    fn test_lenient_duplicates_keep_first() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "sunMoon.svg");
        write_icon(&icons, "sun_moon.svg");

        let report = session(&dir, DuplicatePolicy::Lenient).run().unwrap();
        assert_eq!(report.discarded, 1);
        assert_eq!(report.names, ["sun-moon"]);
        let sprite = read(&dir, "public/icons/icons-sprite.svg");
        assert_eq!(sprite.matches(r#"id="sun-moon""#).count(), 1);
    }

    #[test]
    fn test_same_id_in_different_namespaces() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "plus.svg");
        write_icon(&icons, "sidebar/plus.svg");

        let report = session(&dir, DuplicatePolicy::Strict).run().unwrap();
        let mut names = report.names.clone();
        names.sort();
        assert_eq!(names, ["plus", "sidebar:plus"]);
        assert!(read(&dir, "public/icons/icons-sprite.svg").contains(r#"id="plus""#));
        assert!(read(&dir, "public/icons/icons-sidebar.svg").contains(r#"id="plus""#));
    }

    #[test]
    fn test_missing_source_writes_empty_sprite() {
        let dir = TempDir::new().unwrap();
        let report = session(&dir, DuplicatePolicy::Strict).run().unwrap();

        assert!(report.source_missing);
        assert!(report.is_success());
        let sprite = read(&dir, "public/icons/icons-sprite.svg");
        assert!(sprite.starts_with("<svg"));
        assert!(!sprite.contains("<symbol"));
        assert!(read(&dir, "src/icon-names.ts").contains("never"));
    }

    #[test]
    fn test_rebuild_is_unchanged() {
        let dir = TempDir::new().unwrap();
        write_icon(&dir.path().join("icons"), "home.svg");
        let session = session(&dir, DuplicatePolicy::Strict);

        assert!(session.run().unwrap().changed());
        let second = session.run().unwrap();
        assert!(!second.changed());
        assert_eq!(second.sprites[0].status, WriteStatus::Unchanged);
    }

    #[test]
    fn test_write_error_fails_only_its_namespace() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "home.svg");
        write_icon(&icons, "social/facebook.svg");
        // A directory where the social sprite should go
        fs::create_dir_all(dir.path().join("public/icons/icons-social.svg")).unwrap();

        let report = session(&dir, DuplicatePolicy::Strict).run().unwrap();
        assert!(!report.is_success());
        assert_eq!(report.write_errors.len(), 1);
        assert_eq!(report.sprites.len(), 1);
        assert!(read(&dir, "public/icons/icons-sprite.svg").contains(r#"id="home""#));
    }

    #[test]
    fn test_manifest_and_clean() {
        let dir = TempDir::new().unwrap();
        write_icon(&dir.path().join("icons"), "home.svg");
        let stale = dir.path().join("public/icons/icons-old.svg");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "<svg/>").unwrap();

        let mut session = session(&dir, DuplicatePolicy::Strict);
        session.config.build.clean = true;
        session.config.build.manifest = Some(dir.path().join("public/icons/manifest.json"));

        let report = session.run().unwrap();
        assert_eq!(report.removed, [stale.clone()]);
        assert!(!stale.exists());

        let manifest: Manifest =
            serde_json::from_str(&read(&dir, "public/icons/manifest.json")).unwrap();
        assert_eq!(manifest.namespaces.len(), 1);
        assert_eq!(manifest.namespaces[0].file, "icons-sprite.svg");
        assert_eq!(manifest.namespaces[0].icons, ["home"]);
    }

    #[test]
    fn test_register_watcher_once() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, DuplicatePolicy::Strict);
        assert!(!session.is_watching());
        assert!(session.register_watcher().is_ok());
        assert!(session.register_watcher().is_err());
        assert!(session.is_watching());
    }

    #[test]
    fn test_names_follow_scan_order() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "a.svg");
        write_icon(&icons, "b/x.svg");
        write_icon(&icons, "c.svg");

        let report = session(&dir, DuplicatePolicy::Strict).run().unwrap();
        assert_eq!(report.names, ["a", "b:x", "c"]);
    }

    #[test]
    fn test_listed_names_drop_skipped_icons() {
        let docs = [
            CombinedDocument {
                namespace: "default".into(),
                bytes: String::new(),
                output_name: "icons-sprite".into(),
                icon_ids: vec!["home".into()],
            },
            CombinedDocument {
                namespace: "a:b".into(),
                bytes: String::new(),
                output_name: "icons-a.b".into(),
                icon_ids: vec!["c".into()],
            },
        ];
        let discovered = ["a:b:c", "broken", "home"].map(String::from).to_vec();
        assert_eq!(listed_names(discovered, &docs), ["a:b:c", "home"]);
    }

    #[test]
    fn test_sprite_folder_is_reserved() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "home.svg");
        write_icon(&icons, "sprite/star.svg");

        let err = session(&dir, DuplicatePolicy::Strict).run().unwrap_err();
        let reserved = err.downcast_ref::<icon::ReservedNamespaceError>().unwrap();
        assert_eq!(reserved.namespace, "sprite");
        assert!(!dir.path().join("public").exists());
        assert!(!dir.path().join("src/icon-names.ts").exists());
    }

    #[test]
    fn test_default_folder_is_reserved() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        write_icon(&icons, "plus.svg");
        write_icon(&icons, "Default/plus.svg");

        let err = session(&dir, DuplicatePolicy::Strict).run().unwrap_err();
        assert!(err.downcast_ref::<DuplicateNameError>().is_none());
        let reserved = err.downcast_ref::<icon::ReservedNamespaceError>().unwrap();
        assert_eq!(reserved.namespace, "default");
        assert!(err.to_string().contains("reserved namespace `default`"));
        assert!(!dir.path().join("public").exists());
    }
}
