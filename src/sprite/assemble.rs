//! Sprite assembly: one `<symbol>` per icon inside one hidden root `<svg>`.
//!
//! ```text
//! <svg xmlns=".." xmlns:xlink=".." aria-hidden="true" style="position:absolute;width:0;height:0;overflow:hidden">
//!   <symbol id="facebook" viewBox="0 0 24 24" fill="none">...</symbol>
//!   <symbol id="twitter" viewBox="0 0 24 24">...</symbol>
//! </svg>
//! ```

use std::fs;

use super::clean::strip_metadata;
use super::error::{OptimizationError, SourceReadError};
use super::optimize::optimize_svg;
use super::output::output_name;
use super::root::{SvgRoot, parse_root};
use crate::icon::{IconEntry, NamespaceGroup};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const HIDDEN_STYLE: &str = "position:absolute;width:0;height:0;overflow:hidden";

/// Root attributes carried over to the symbol so file-level styling survives.
pub const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "fill",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
];

/// One combined document per namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedDocument {
    pub namespace: String,
    /// Complete sprite markup.
    pub bytes: String,
    /// `icons-sprite` or `icons-<namespace>`.
    pub output_name: String,
    /// Symbol ids in document order.
    pub icon_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    /// Run the usvg optimizer on each icon.
    pub optimize: bool,
}

/// Assembly result, including per-icon problems that did not abort it.
#[derive(Debug)]
pub struct Assembled {
    pub document: CombinedDocument,
    /// Icons dropped from the sprite.
    pub skipped: Vec<SourceReadError>,
    /// Icons that kept their unoptimized content.
    pub unoptimized: Vec<OptimizationError>,
}

/// Assemble the sprite for one namespace group.
///
/// Never fails as a whole: unreadable icons are left out and reported.
pub fn assemble(group: &NamespaceGroup, options: AssembleOptions) -> Assembled {
    let mut symbols = Vec::with_capacity(group.icons.len());
    let mut icon_ids = Vec::with_capacity(group.icons.len());
    let mut skipped = Vec::new();
    let mut unoptimized = Vec::new();

    for (id, entry) in &group.icons {
        match render_icon(id, entry, options) {
            Ok((symbol, fallback)) => {
                symbols.push(symbol);
                icon_ids.push(id.clone());
                unoptimized.extend(fallback);
            }
            Err(e) => skipped.push(e),
        }
    }

    Assembled {
        document: CombinedDocument {
            namespace: group.namespace.clone(),
            bytes: wrap_symbols(&symbols),
            output_name: output_name(&group.namespace),
            icon_ids,
        },
        skipped,
        unoptimized,
    }
}

/// Read, clean, optionally optimize and wrap one icon.
fn render_icon(
    id: &str,
    entry: &IconEntry,
    options: AssembleOptions,
) -> Result<(String, Option<OptimizationError>), SourceReadError> {
    let path = &entry.source_path;
    let raw = fs::read_to_string(path).map_err(|e| SourceReadError::Io(path.clone(), e))?;
    let cleaned = strip_metadata(&raw);
    let source = parse_root(&cleaned).map_err(|e| SourceReadError::Parse(path.clone(), e))?;

    if !options.optimize {
        return Ok((render_symbol(id, &source, &source), None));
    }

    match optimize_svg(path, &cleaned) {
        Ok(optimized) => match parse_root(&optimized) {
            Ok(body) => Ok((render_symbol(id, &source, &body), None)),
            Err(e) => {
                let fallback = OptimizationError {
                    path: path.clone(),
                    message: e,
                };
                Ok((render_symbol(id, &source, &source), Some(fallback)))
            }
        },
        Err(e) => Ok((render_symbol(id, &source, &source), Some(e))),
    }
}

/// Build `<symbol>` from the source root's attributes and `body`'s content.
fn render_symbol(id: &str, source: &SvgRoot<'_>, body: &SvgRoot<'_>) -> String {
    let mut out = format!(r#"<symbol id="{id}""#);

    if let Some(view_box) = body.view_box().or_else(|| source.view_box()) {
        push_attr(&mut out, "viewBox", &view_box);
    }
    for name in PRESENTATION_ATTRIBUTES {
        if let Some(value) = source.attr(name) {
            push_attr(&mut out, name, value);
        }
    }

    out.push('>');
    out.push_str(body.inner);
    out.push_str("</symbol>");
    out
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&value.replace('"', "&quot;"));
    out.push('"');
}

/// Wrap symbols in the hidden sprite root.
fn wrap_symbols(symbols: &[String]) -> String {
    let mut out = format!(
        r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}" aria-hidden="true" style="{HIDDEN_STYLE}">"#
    );
    for symbol in symbols {
        out.push('\n');
        out.push_str(symbol);
    }
    out.push_str("\n</svg>\n");
    out
}
