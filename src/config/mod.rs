//! Configuration for `icon-sprite.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/     # [build], [serve], [loader]
//! ├── error        # ConfigError, ConfigDiagnostics
//! ├── field        # FieldPath
//! └── mod.rs       # SpriteConfig (this file)
//! ```
//!
//! Paths in the file are relative to the directory holding it. CLI options
//! override file values.

mod error;
mod field;
pub mod section;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
pub use section::{BuildConfig, LoaderConfig, ServeConfig};

use crate::{
    cli::{BuildArgs, Cli, Commands, ResolveArgs},
    icon::DuplicatePolicy,
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "icon-sprite.toml";

// ============================================================================
// root configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Absolute path of the loaded config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root, the directory of the config file
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

impl SpriteConfig {
    /// Load, apply CLI overrides, resolve paths and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let mut config = Self::open(cli.config.as_deref(), &cwd)?;
        config.apply_cli(cli);
        config.normalize_paths();
        config.validate()?;
        Ok(config)
    }

    /// Read the config file, or fall back to defaults rooted at `cwd`.
    ///
    /// An explicitly given path must exist. Without one, `icon-sprite.toml` is
    /// searched from `cwd` upward.
    fn open(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(cwd, Path::new(CONFIG_FILE)),
        };

        let Some(path) = path else {
            crate::debug!("config"; "no {} found, using defaults", CONFIG_FILE);
            return Ok(Self {
                root: cwd.to_path_buf(),
                ..Self::default()
            });
        };

        let mut config = Self::from_path(&path)?;
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.config_path = path;
        Ok(config)
    }

    /// Load from file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("invalid config `{}`", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> String {
        crate::utils::path::display_relative(path.as_ref(), &self.root)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.source, cli.source.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        match &cli.command {
            Commands::Build { build_args, .. } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
                watch,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            Commands::Resolve { args } => self.apply_resolve_args(args),
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.optimize, args.optimize.as_ref());
        if args.clean {
            self.build.clean = true;
        }
        if args.lenient {
            self.build.duplicates = DuplicatePolicy::Lenient;
        }
    }

    fn apply_resolve_args(&mut self, args: &ResolveArgs) {
        Self::update_option(&mut self.loader.base_url, args.base_url.as_ref());
        Self::update_option(&mut self.loader.session, args.session.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    fn normalize_paths(&mut self) {
        use crate::utils::path::normalize_path;

        let root = normalize_path(&self.root);
        self.build.source = normalize_path(&root.join(&self.build.source));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.build.types = normalize_path(&root.join(&self.build.types));
        if let Some(manifest) = self.build.manifest.take() {
            self.build.manifest = Some(normalize_path(&root.join(manifest)));
        }
        self.loader.session = normalize_path(&root.join(&self.loader.session));
        self.build.extensions = self.build.normalized_extensions();
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.serve.validate(&mut diag);
        self.loader.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

/// Find `name` in `start` or any of its ancestors.
fn find_config_file(start: &Path, name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse a config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SpriteConfig {
    let (parsed, ignored) = SpriteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["icon-sprite"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_invalid_toml() {
        assert!(SpriteConfig::parse_with_ignored("[build\nsource = \"icons\"").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\nsource = \"svg\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = SpriteConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.build.source, PathBuf::from("svg"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_open_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = SpriteConfig::open(None, dir.path()).unwrap();
        assert_eq!(config.root, dir.path());
        assert!(config.config_path.as_os_str().is_empty());
        assert_eq!(config.serve.port, 5278);
    }

    #[test]
    fn test_open_explicit_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = SpriteConfig::open(Some(Path::new("custom.toml")), dir.path()).unwrap_err();
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn test_open_searches_upward() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[serve]\nport = 7000\n").unwrap();
        let nested = dir.path().join("src/components");
        fs::create_dir_all(&nested).unwrap();

        let config = SpriteConfig::open(None, &nested).unwrap();
        assert_eq!(config.serve.port, 7000);
        assert_eq!(config.root, dir.path());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = test_parse_config("[build]\noptimize = false\nsource = \"a\"");
        config.apply_cli(&cli(&["-s", "b", "build", "--lenient", "--optimize", "--clean"]));
        assert_eq!(config.build.source, PathBuf::from("b"));
        assert!(config.build.optimize);
        assert!(config.build.clean);
        assert_eq!(config.build.duplicates, DuplicatePolicy::Lenient);
    }

    #[test]
    fn test_serve_overrides() {
        let mut config = test_parse_config("[serve]\nwatch = true");
        config.apply_cli(&cli(&["serve", "-p", "9000", "--watch", "false"]));
        assert_eq!(config.serve.port, 9000);
        assert!(!config.serve.watch);
    }

    #[test]
    fn test_resolve_overrides() {
        let mut config = SpriteConfig::default();
        config.apply_cli(&cli(&["resolve", "home", "--base-url", "https://cdn.test/i"]));
        assert_eq!(config.loader.base_url, "https://cdn.test/i");
    }

    #[test]
    fn test_normalize_paths() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config(
            "[build]\nsource = \"icons\"\nmanifest = \"out/manifest.json\"\nextensions = [\".SVG\"]",
        );
        config.root = dir.path().to_path_buf();
        config.normalize_paths();

        let root = crate::utils::path::normalize_path(dir.path());
        assert_eq!(config.build.source, root.join("icons"));
        assert_eq!(config.build.manifest, Some(root.join("out/manifest.json")));
        assert_eq!(config.build.extensions, ["svg"]);
        assert!(config.loader.session.starts_with(&root));
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = test_parse_config("[build]\nextensions = []\n[serve]\nroute = \"icons\"");
        let err = config.validate().unwrap_err();
        let diag = err.downcast_ref::<ConfigError>().unwrap();
        let ConfigError::Diagnostics(diag) = diag else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 2);
    }
}
