//! Content types served by the sprite server.

pub const SVG: &str = "image/svg+xml";
pub const PLAIN: &str = "text/plain; charset=utf-8";
