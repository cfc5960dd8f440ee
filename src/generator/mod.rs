//! Generated companion files: the icon name listing and the sprite manifest.

pub mod manifest;
pub mod types;

pub use manifest::Manifest;
