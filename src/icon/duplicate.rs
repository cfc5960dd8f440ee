//! Duplicate detection after normalization.
//!
//! Two files collide when they land on the same `(namespace, icon_id)`:
//! `SunMoon.svg` and `sun_moon.svg` both become `sun-moon`. Icons with the
//! same id in different namespaces never collide.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entry::IconEntry;

/// What to do when names collide.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Abort the build and report every collision (default).
    #[default]
    Strict,
    /// Keep the first entry in scan order, warn about the rest.
    Lenient,
}

/// One `(namespace, icon_id)` claimed by several files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub namespace: String,
    pub icon_id: String,
    /// Original names in scan order; the first one is kept under lenient policy.
    pub originals: Vec<String>,
}

/// Names collide inside a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct DuplicateNameError {
    pub collisions: Vec<Collision>,
}

impl fmt::Display for DuplicateNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicate icon name{} after normalization:",
            self.collisions.len(),
            crate::utils::plural::plural_s(self.collisions.len())
        )?;
        for c in &self.collisions {
            write!(f, "\n  namespace: {}\n  name:      {}\n  files:", c.namespace, c.icon_id)?;
            for original in &c.originals {
                write!(f, "\n    - {original}")?;
            }
        }
        Ok(())
    }
}

/// Outcome of resolution.
#[derive(Debug, Default)]
pub struct Resolved {
    /// Surviving entries, in scan order.
    pub entries: Vec<IconEntry>,
    /// Collisions dropped under lenient policy (empty under strict).
    pub discarded: Vec<Collision>,
}

/// Detect collisions and apply `policy`.
pub fn resolve(
    entries: Vec<IconEntry>,
    policy: DuplicatePolicy,
) -> Result<Resolved, DuplicateNameError> {
    let collisions = find_collisions(&entries);

    if collisions.is_empty() {
        return Ok(Resolved {
            entries,
            discarded: Vec::new(),
        });
    }

    match policy {
        DuplicatePolicy::Strict => Err(DuplicateNameError { collisions }),
        DuplicatePolicy::Lenient => {
            let mut seen = FxHashSet::default();
            let entries = entries
                .into_iter()
                .filter(|e| seen.insert((e.namespace().to_string(), e.icon_id().to_string())))
                .collect();
            Ok(Resolved {
                entries,
                discarded: collisions,
            })
        }
    }
}

/// All `(namespace, icon_id)` keys with more than one entry, in first-seen order.
fn find_collisions(entries: &[IconEntry]) -> Vec<Collision> {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut by_key: FxHashMap<(&str, &str), Vec<&str>> = FxHashMap::default();

    for entry in entries {
        let key = (entry.namespace(), entry.icon_id());
        let originals = by_key.entry(key).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        originals.push(&entry.original_name);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let originals = &by_key[&key];
            (originals.len() > 1).then(|| Collision {
                namespace: key.0.to_string(),
                icon_id: key.1.to_string(),
                originals: originals.iter().map(|s| s.to_string()).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(original: &str, normalized: &str) -> IconEntry {
        IconEntry::new(original, normalized, format!("/src/{original}.svg"))
    }

    #[test]
    fn test_no_collisions() {
        let entries = vec![entry("home", "home"), entry("social/fb", "social:fb")];
        let resolved = resolve(entries.clone(), DuplicatePolicy::Strict).unwrap();
        assert_eq!(resolved.entries, entries);
        assert!(resolved.discarded.is_empty());
    }

    #[test]
    fn test_strict_reports_all() {
        let entries = vec![
            entry("SunMoon", "sun-moon"),
            entry("sun_moon", "sun-moon"),
            entry("ui/Plus", "ui:plus"),
            entry("ui/plus", "ui:plus"),
            entry("ok", "ok"),
        ];
        let err = resolve(entries, DuplicatePolicy::Strict).unwrap_err();
        assert_eq!(err.collisions.len(), 2);
        assert_eq!(err.collisions[0].namespace, "default");
        assert_eq!(err.collisions[0].icon_id, "sun-moon");
        assert_eq!(err.collisions[0].originals, ["SunMoon", "sun_moon"]);
        assert_eq!(err.collisions[1].namespace, "ui");

        let message = err.to_string();
        assert!(message.contains("sun-moon"));
        assert!(message.contains("SunMoon"));
        assert!(message.contains("sun_moon"));
    }

    #[test]
    fn test_lenient_keeps_first() {
        let entries = vec![
            entry("SunMoon", "sun-moon"),
            entry("home", "home"),
            entry("sun_moon", "sun-moon"),
        ];
        let resolved = resolve(entries, DuplicatePolicy::Lenient).unwrap();
        let originals: Vec<_> = resolved
            .entries
            .iter()
            .map(|e| e.original_name.as_str())
            .collect();
        assert_eq!(originals, ["SunMoon", "home"]);
        assert_eq!(resolved.discarded.len(), 1);
        assert_eq!(resolved.discarded[0].originals[1], "sun_moon");
    }

    #[test]
    fn test_cross_namespace_allowed() {
        let entries = vec![entry("plus", "plus"), entry("sidebar/plus", "sidebar:plus")];
        let resolved = resolve(entries, DuplicatePolicy::Strict).unwrap();
        assert_eq!(resolved.entries.len(), 2);
    }

    #[test]
    fn test_policy_parsing() {
        #[derive(Deserialize)]
        struct Wrap {
            policy: DuplicatePolicy,
        }
        let w: Wrap = toml::from_str("policy = \"lenient\"").unwrap();
        assert_eq!(w.policy, DuplicatePolicy::Lenient);
        let w: Wrap = toml::from_str("policy = \"strict\"").unwrap();
        assert_eq!(w.policy, DuplicatePolicy::Strict);
    }
}
