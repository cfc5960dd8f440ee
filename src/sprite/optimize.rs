//! Optional SVG optimization using usvg.
//!
//! usvg parses the icon into its render tree and writes it back out, which
//! resolves styles and drops everything that does not render. Two things do
//! not survive that round trip, so icons using them are left untouched:
//!
//! - `currentColor` is resolved to a fixed color, breaking themable icons
//! - `<text>` is dropped (text shaping is compiled out)

use std::path::Path;

use super::error::OptimizationError;

/// Markers for content usvg would alter visually.
const UNSAFE_MARKERS: &[&str] = &["currentColor", "<text"];

/// Optimize a cleaned icon document.
///
/// Returns the re-serialized document, or an error when the icon cannot be
/// optimized without changing how it renders.
pub fn optimize_svg(path: &Path, content: &str) -> Result<String, OptimizationError> {
    let fail = |message: String| OptimizationError {
        path: path.to_path_buf(),
        message,
    };

    if let Some(marker) = UNSAFE_MARKERS.iter().find(|m| content.contains(*m)) {
        return Err(fail(format!("contains `{marker}`")));
    }

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(content.as_bytes(), &options)
        .map_err(|e| fail(e.to_string()))?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };

    Ok(tree.to_string(&write_options))
}
