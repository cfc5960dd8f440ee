//! Discovered icons and their namespace grouping.

use std::path::PathBuf;

/// Namespace of icons placed directly in the source root.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Top-level folder names that cannot become namespaces.
///
/// `default` would merge into the root icons. `sprite` would be written to
/// the same `icons-sprite` file as the root icons.
pub const RESERVED_NAMESPACES: &[&str] = &[DEFAULT_NAMESPACE, "sprite"];

/// Separator between namespace segments and the icon id.
pub const SEPARATOR: char = ':';

/// One discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    /// Path relative to the source root, without extension (`social/facebook`).
    pub original_name: String,
    /// Fully qualified normalized name (`social:facebook`, or `home` at the root).
    pub normalized_name: String,
    /// Where to read the bytes from.
    pub source_path: PathBuf,
}

impl IconEntry {
    pub fn new(
        original_name: impl Into<String>,
        normalized_name: impl Into<String>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            normalized_name: normalized_name.into(),
            source_path: source_path.into(),
        }
    }

    /// Namespace part of the normalized name (`default` at the root).
    pub fn namespace(&self) -> &str {
        split_name(&self.normalized_name).0
    }

    /// Normalized name with the namespace prefix removed.
    pub fn icon_id(&self) -> &str {
        split_name(&self.normalized_name).1
    }
}

/// Split a qualified name into `(namespace, icon_id)`.
///
/// The namespace is everything before the last separator, so nested folders
/// stay together: `a:b:c` -> `("a:b", "c")`.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind(SEPARATOR) {
        Some(idx) => (&name[..idx], &name[idx + 1..]),
        None => (DEFAULT_NAMESPACE, name),
    }
}

/// All entries sharing one namespace, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceGroup {
    pub namespace: String,
    /// `(icon_id, entry)` pairs; ids are unique within the group.
    pub icons: Vec<(String, IconEntry)>,
}

impl NamespaceGroup {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            icons: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Group entries by namespace, preserving first-appearance order.
///
/// Expects duplicates to have been resolved already.
pub fn group(entries: Vec<IconEntry>) -> Vec<NamespaceGroup> {
    let mut groups: Vec<NamespaceGroup> = Vec::new();
    for entry in entries {
        let namespace = entry.namespace().to_string();
        let id = entry.icon_id().to_string();
        match groups.iter_mut().find(|g| g.namespace == namespace) {
            Some(group) => group.icons.push((id, entry)),
            None => {
                let mut group = NamespaceGroup::new(namespace);
                group.icons.push((id, entry));
                groups.push(group);
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(original: &str, normalized: &str) -> IconEntry {
        IconEntry::new(original, normalized, format!("/src/{original}.svg"))
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("home"), ("default", "home"));
        assert_eq!(split_name("social:facebook"), ("social", "facebook"));
        assert_eq!(split_name("a:b:c"), ("a:b", "c"));
    }

    #[test]
    fn test_entry_accessors() {
        let e = entry("social/facebook", "social:facebook");
        assert_eq!(e.namespace(), "social");
        assert_eq!(e.icon_id(), "facebook");

        let root = entry("home", "home");
        assert_eq!(root.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(root.icon_id(), "home");
    }

    #[test]
    fn test_group_preserves_order() {
        let groups = group(vec![
            entry("social/twitter", "social:twitter"),
            entry("home", "home"),
            entry("social/facebook", "social:facebook"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].namespace, "social");
        assert_eq!(groups[1].namespace, DEFAULT_NAMESPACE);

        let ids: Vec<_> = groups[0].icons.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["twitter", "facebook"]);
    }

    #[test]
    fn test_group_same_id_across_namespaces() {
        let groups = group(vec![
            entry("plus", "plus"),
            entry("sidebar/plus", "sidebar:plus"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].icons[0].0, "plus");
        assert_eq!(groups[1].icons[0].0, "plus");
    }
}
