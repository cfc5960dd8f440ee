//! Icon references: `iconId` or `namespace:iconId`.

use std::fmt;

use parking_lot::Mutex;
use thiserror::Error;

use super::TrustedSprite;
use super::fetch::sprite_url;
use crate::icon::{DEFAULT_NAMESPACE, split_name};
use crate::icon::entry::SEPARATOR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid icon reference `{0}`")]
pub struct InvalidReference(pub String);

/// A parsed icon address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRef {
    namespace: String,
    id: String,
}

impl IconRef {
    /// `facebook` is in `default`; `social:facebook` in `social`;
    /// `a:b:c` is icon `c` in `a:b`.
    pub fn parse(reference: &str) -> Result<Self, InvalidReference> {
        let reference = reference.trim();
        let (namespace, id) = split_name(reference);
        let valid = !id.is_empty()
            && !namespace.is_empty()
            && namespace.split(':').all(|segment| !segment.is_empty());
        if !valid {
            return Err(InvalidReference(reference.to_string()));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            id: id.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the symbol once its sprite is injected next to other namespaces.
    ///
    /// `home` stays `home`; `sidebar:plus` becomes `sidebar.plus`, so it
    /// cannot clash with a root `plus`.
    pub fn symbol_id(&self) -> String {
        format!("{}{}", symbol_prefix(&self.namespace), self.id)
    }

    /// `{base_url}/{namespace}.svg#{id}`
    pub fn href(&self, base_url: &str) -> String {
        format!("{}#{}", sprite_url(base_url, &self.namespace), self.id)
    }

    /// `<svg>` element that renders the icon through `<use>`.
    pub fn use_markup(&self, base_url: &str) -> String {
        format!(
            r#"<svg class="icon" aria-hidden="true"><use href="{}"/></svg>"#,
            self.href(base_url).replace('&', "&amp;").replace('"', "&quot;")
        )
    }
}

/// Prefix given to symbol ids of `namespace` on injection.
///
/// Normalized names never contain dots, so prefixed ids stay unique.
pub fn symbol_prefix(namespace: &str) -> String {
    if namespace == DEFAULT_NAMESPACE {
        String::new()
    } else {
        format!("{}.", namespace.replace(SEPARATOR, "."))
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == DEFAULT_NAMESPACE {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}:{}", self.namespace, self.id)
        }
    }
}

/// Reference to a symbol inside a loaded sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub icon: IconRef,
    /// Fragment pointing at the symbol inside the injected sprite
    /// (`#home`, `#sidebar.plus`).
    pub fragment: String,
}

impl ResolvedIcon {
    /// `<use>` markup against the injected sprite.
    pub fn use_markup(&self) -> String {
        format!(
            r#"<svg class="icon" aria-hidden="true"><use href="{}"/></svg>"#,
            self.fragment
        )
    }
}

/// Rendering context loaded sprites are inserted into.
pub trait SpriteHost: Send + Sync {
    fn insert(&self, namespace: &str, sprite: &TrustedSprite);
}

/// Host that records insertions in order.
#[derive(Debug, Default)]
pub struct DocumentHost {
    inserted: Mutex<Vec<(String, TrustedSprite)>>,
}

impl DocumentHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces in insertion order.
    pub fn namespaces(&self) -> Vec<String> {
        self.inserted.lock().iter().map(|(ns, _)| ns.clone()).collect()
    }

    /// All inserted sprites, concatenated.
    pub fn markup(&self) -> String {
        self.inserted
            .lock()
            .iter()
            .map(|(_, sprite)| sprite.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl SpriteHost for DocumentHost {
    fn insert(&self, namespace: &str, sprite: &TrustedSprite) {
        self.inserted
            .lock()
            .push((namespace.to_string(), sprite.clone()));
    }
}
