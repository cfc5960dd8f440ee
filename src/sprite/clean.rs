//! Strip non-rendering markup from icon sources.

use regex::Regex;
use std::sync::LazyLock;

/// Elements removed together with their content.
static STRIPPED_ELEMENTS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    ["title", "desc", "metadata"].map(|tag| {
        Regex::new(&format!(r"(?is)<{tag}\b[^>]*?(?:/>|>.*?</{tag}\s*>)"))
            .expect("static element pattern")
    })
});

/// Prolog and comments, never meaningful inside a `<symbol>`.
static PROLOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\?xml.*?\?>|<!DOCTYPE[^>\[]*(?:\[.*?\])?\s*>|<!--.*?-->")
        .expect("static prolog pattern")
});

/// Remove `<title>`, `<desc>`, `<metadata>`, the XML prolog and comments.
pub fn strip_metadata(svg: &str) -> String {
    let mut out = PROLOG.replace_all(svg, "").into_owned();
    for re in STRIPPED_ELEMENTS.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_title_desc_metadata() {
        let svg = r#"<svg viewBox="0 0 24 24"><title>Home</title><desc>A house</desc><metadata><rdf:RDF/></metadata><path d="M0 0"/></svg>"#;
        assert_eq!(
            strip_metadata(svg),
            r#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#
        );
    }

    #[test]
    fn test_strip_case_insensitive_multiline() {
        let svg = "<svg>\n<TITLE id=\"t\">\nHome\n</TITLE>\n<path/></svg>";
        assert_eq!(strip_metadata(svg), "<svg>\n\n<path/></svg>");
    }

    #[test]
    fn test_strip_non_greedy() {
        let svg = "<svg><title>a</title><path/><title>b</title></svg>";
        assert_eq!(strip_metadata(svg), "<svg><path/></svg>");
    }

    #[test]
    fn test_strip_self_closing() {
        assert_eq!(strip_metadata("<svg><title/><path/></svg>"), "<svg><path/></svg>");
    }

    #[test]
    fn test_strip_prolog_and_comments() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<!-- Generator: Sketch -->
<svg><path/></svg>"#;
        assert_eq!(strip_metadata(svg), "<svg><path/></svg>");
    }

    #[test]
    fn test_keeps_similar_tags() {
        // <titlebar> is not <title>
        let svg = "<svg><titlebar/><description/></svg>";
        assert_eq!(strip_metadata(svg), svg);
    }
}
