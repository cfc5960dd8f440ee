//! Lazy sprite loader with a two-tier cache.
//!
//! # Module Structure
//!
//! ```text
//! loader/
//! ├── cache      # SpriteLoader: memory tier, persisted tier, single-flight fetch
//! ├── content    # TrustedSprite validation gate
//! ├── fetch      # SpriteFetcher trait, HttpFetcher (reqwest)
//! ├── store      # SessionStore trait, MemorySession, FileSession
//! ├── reference  # IconRef parsing, href/<use> markup, SpriteHost
//! └── error      # LoadError
//! ```
//!
//! ```ignore
//! let loader = SpriteLoader::new("1.0.0", HttpFetcher::new(base_url), FileSession::open(path));
//! let icon = IconRef::parse("social:facebook")?;
//! let resolved = loader.resolve(&icon).await?;
//! ```

pub mod cache;
pub mod content;
pub mod error;
pub mod fetch;
pub mod reference;
pub mod store;

pub use cache::{LoadState, SpriteLoader};
pub use content::TrustedSprite;
pub use error::LoadError;
pub use fetch::{HttpFetcher, SpriteFetcher};
pub use reference::{DocumentHost, IconRef, InvalidReference, ResolvedIcon, SpriteHost};
pub use store::{FileSession, MemorySession, SessionStore};
