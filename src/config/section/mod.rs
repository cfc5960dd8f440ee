//! Configuration sections of `icon-sprite.toml`.
//!
//! | Module   | TOML Section | Purpose                                   |
//! |----------|--------------|-------------------------------------------|
//! | `build`  | `[build]`    | Source/output paths, duplicates, optimize |
//! | `serve`  | `[serve]`    | Sprite HTTP server                        |
//! | `loader` | `[loader]`   | Loader base URL, version stamp, session   |

mod build;
mod loader;
mod serve;

pub use build::BuildConfig;
pub use loader::LoaderConfig;
pub use serve::ServeConfig;
