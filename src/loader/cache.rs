//! Two-tier sprite cache with single-flight loading.
//!
//! Lookup order for a namespace:
//!
//! 1. in-memory map
//! 2. persisted session entry, only when its version stamp matches
//! 3. one shared fetch, whatever the number of concurrent callers
//!
//! The fetch runs on its own task and publishes through a `watch` channel, so
//! a caller that stops waiting does not cancel it for the others. Failures are
//! delivered to every waiter and never cached.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::watch;

use super::content::TrustedSprite;
use super::error::LoadError;
use super::fetch::SpriteFetcher;
use super::reference::{IconRef, ResolvedIcon, SpriteHost, symbol_prefix};
use super::store::{PersistedSprite, SessionStore, session_key};
use crate::debug;

type LoadResult = Result<TrustedSprite, LoadError>;
type Slot = watch::Receiver<Option<LoadResult>>;

/// Where a namespace stands from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// Outcome of looking for a running fetch.
enum Pending {
    Ready(TrustedSprite),
    Wait(Slot),
}

struct Inner<F, S> {
    version: String,
    fetcher: F,
    session: S,
    memory: Mutex<FxHashMap<String, TrustedSprite>>,
    in_flight: Mutex<FxHashMap<String, Slot>>,
    injected: Mutex<FxHashSet<String>>,
    /// Session keys this loader has written or read.
    tracked: Mutex<FxHashSet<String>>,
}

/// Lazy, namespace-keyed sprite loader.
///
/// Cheap to clone; clones share the same caches.
pub struct SpriteLoader<F, S> {
    inner: Arc<Inner<F, S>>,
}

impl<F, S> Clone for SpriteLoader<F, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: SpriteFetcher, S: SessionStore> SpriteLoader<F, S> {
    pub fn new(version: impl Into<String>, fetcher: F, session: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                version: version.into(),
                fetcher,
                session,
                memory: Mutex::new(FxHashMap::default()),
                in_flight: Mutex::new(FxHashMap::default()),
                injected: Mutex::new(FxHashSet::default()),
                tracked: Mutex::new(FxHashSet::default()),
            }),
        }
    }

    pub fn version(&self) -> &str {
        &self.inner.version
    }

    pub fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    pub fn session(&self) -> &S {
        &self.inner.session
    }

    pub fn state(&self, namespace: &str) -> LoadState {
        if self.inner.memory.lock().contains_key(namespace) {
            LoadState::Loaded
        } else if self.inner.in_flight.lock().contains_key(namespace) {
            LoadState::Loading
        } else {
            LoadState::Unloaded
        }
    }

    /// Sprite for `namespace`, fetching it at most once however many callers ask.
    pub async fn load(&self, namespace: &str) -> Result<TrustedSprite, LoadError> {
        let cached = self.inner.memory.lock().get(namespace).cloned();
        if let Some(sprite) = cached {
            return Ok(sprite);
        }

        if let Some(sprite) = self.inner.read_persisted(namespace) {
            self.inner
                .memory
                .lock()
                .insert(namespace.to_string(), sprite.clone());
            return Ok(sprite);
        }

        let mut slot = match self.join_or_start(namespace) {
            Pending::Ready(sprite) => return Ok(sprite),
            Pending::Wait(slot) => slot,
        };

        let abandoned = || LoadError::Abandoned {
            namespace: namespace.to_string(),
        };
        let outcome = match slot.wait_for(Option::is_some).await {
            Ok(result) => result.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| Err(abandoned()))
    }

    /// Load the icon's namespace and point at its symbol.
    pub async fn resolve(&self, icon: &IconRef) -> Result<ResolvedIcon, LoadError> {
        let sprite = self.load(icon.namespace()).await?;
        if !sprite.contains(icon.id()) {
            return Err(LoadError::UnknownIcon {
                namespace: icon.namespace().to_string(),
                icon: icon.id().to_string(),
            });
        }
        Ok(ResolvedIcon {
            icon: icon.clone(),
            fragment: format!("#{}", icon.symbol_id()),
        })
    }

    /// Load `namespace` and insert it into `host` unless already inserted.
    ///
    /// Symbol ids are scoped to the namespace first (see
    /// [`IconRef::symbol_id`]), so sprites sharing a host never clash.
    /// Returns whether this call performed the insertion.
    pub async fn inject<H: SpriteHost + ?Sized>(
        &self,
        namespace: &str,
        host: &H,
    ) -> Result<bool, LoadError> {
        let sprite = self.load(namespace).await?;
        let scoped = sprite
            .scoped(&symbol_prefix(namespace))
            .map_err(|reason| LoadError::InvalidContent {
                namespace: namespace.to_string(),
                reason,
            })?;
        let first = self.inner.injected.lock().insert(namespace.to_string());
        if first {
            host.insert(namespace, &scoped);
        }
        Ok(first)
    }

    /// Drop every in-memory sprite and every session key this loader owns.
    ///
    /// Keys written by other code sharing the store are left alone. A fetch
    /// already running still completes and repopulates its namespace.
    pub fn clear(&self) {
        self.inner.memory.lock().clear();
        let keys: Vec<String> = self.inner.tracked.lock().drain().collect();
        for key in keys {
            if let Err(e) = self.inner.session.remove(&key) {
                debug!("loader"; "failed to remove `{}`: {}", key, e);
            }
        }
    }

    fn join_or_start(&self, namespace: &str) -> Pending {
        let mut in_flight = self.inner.in_flight.lock();

        if let Some(slot) = in_flight.get(namespace)
            && slot.has_changed().is_ok()
        {
            return Pending::Wait(slot.clone());
        }

        // A fetch may have finished between the memory check and taking the lock
        if let Some(sprite) = self.inner.memory.lock().get(namespace).cloned() {
            return Pending::Ready(sprite);
        }

        let (tx, rx) = watch::channel(None);
        in_flight.insert(namespace.to_string(), rx.clone());
        drop(in_flight);

        let inner = Arc::clone(&self.inner);
        let namespace = namespace.to_string();
        tokio::spawn(async move {
            let result = inner.fetch_trusted(&namespace).await;
            if let Ok(sprite) = &result {
                inner.store(&namespace, sprite);
            }
            inner.in_flight.lock().remove(&namespace);
            tx.send_replace(Some(result));
        });

        Pending::Wait(rx)
    }
}

impl<F: SpriteFetcher, S: SessionStore> Inner<F, S> {
    async fn fetch_trusted(&self, namespace: &str) -> LoadResult {
        debug!("loader"; "fetching `{}`", namespace);
        let raw = self.fetcher.fetch(namespace).await?;
        TrustedSprite::validate(&raw).map_err(|reason| LoadError::InvalidContent {
            namespace: namespace.to_string(),
            reason,
        })
    }

    /// Write both tiers, tagged with the current version.
    fn store(&self, namespace: &str, sprite: &TrustedSprite) {
        self.memory
            .lock()
            .insert(namespace.to_string(), sprite.clone());

        let key = session_key(namespace);
        let persisted = PersistedSprite {
            version: self.version.clone(),
            content: sprite.as_str().to_string(),
        };
        match serde_json::to_string(&persisted) {
            Ok(value) => {
                if let Err(e) = self.session.set(&key, value) {
                    debug!("loader"; "failed to persist `{}`: {}", namespace, e);
                }
            }
            Err(e) => debug!("loader"; "failed to encode `{}`: {}", namespace, e),
        }
        self.tracked.lock().insert(key);
    }

    /// Persisted sprite, if present, current and still valid.
    fn read_persisted(&self, namespace: &str) -> Option<TrustedSprite> {
        let key = session_key(namespace);
        let raw = self.session.get(&key)?;
        self.tracked.lock().insert(key);

        let persisted: PersistedSprite = serde_json::from_str(&raw).ok()?;
        if persisted.version != self.version {
            debug!(
                "loader";
                "`{}` persisted for {}, current is {}",
                namespace, persisted.version, self.version
            );
            return None;
        }
        TrustedSprite::validate(&persisted.content).ok()
    }
}
