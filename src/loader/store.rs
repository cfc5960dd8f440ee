//! Persisted cache tier.
//!
//! A [`SessionStore`] is a string key/value store shared with other code, so
//! the loader only ever touches keys it created (`icon-sprite:<namespace>`).
//! [`FileSession`] keeps the store in a JSON file and survives restarts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Prefix of every key the loader writes.
pub const KEY_PREFIX: &str = "icon-sprite:";

pub fn session_key(namespace: &str) -> String {
    format!("{KEY_PREFIX}{namespace}")
}

/// Value stored under a session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSprite {
    /// Version stamp the content was fetched under.
    pub version: String,
    pub content: String,
}

/// String key/value storage backing the persisted tier.
pub trait SessionStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySession {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// JSON file store, rewritten on every change.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    entries: Mutex<FxHashMap<String, String>>,
}

impl FileSession {
    /// Open `path`, starting empty when it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                crate::log!("warn"; "ignoring corrupt session `{}`: {}", path.display(), e);
                FxHashMap::default()
            }),
            Err(_) => FxHashMap::default(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &FxHashMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)
    }
}

impl SessionStore for FileSession {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_key() {
        assert_eq!(session_key("social"), "icon-sprite:social");
        assert_eq!(session_key("a:b"), "icon-sprite:a:b");
    }

    #[test]
    fn test_memory_session() {
        let store = MemorySession::new();
        store.set("k", "v".into()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state/session.json");

        let store = FileSession::open(&path);
        store.set("icon-sprite:default", "{}".into()).unwrap();
        store.set("other:key", "kept".into()).unwrap();
        drop(store);

        let reopened = FileSession::open(&path);
        assert_eq!(reopened.get("icon-sprite:default").as_deref(), Some("{}"));
        reopened.remove("icon-sprite:default").unwrap();

        let again = FileSession::open(&path);
        assert!(again.get("icon-sprite:default").is_none());
        assert_eq!(again.get("other:key").as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_session_corrupt_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let store = FileSession::open(&path);
        assert!(store.get("anything").is_none());
    }
}
