//! Validation gate between fetched text and anything that caches or injects it.
//!
//! [`TrustedSprite`] can only be built by [`TrustedSprite::validate`], so
//! holding one proves the markup passed the checks below:
//!
//! - well-formed XML with a single `<svg>` root
//! - no `<script>` or `<foreignObject>` elements
//! - no `on*` event handler attributes
//! - no `javascript:` URLs in any attribute, including each `;`-separated
//!   entry of animation value lists

use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

const FORBIDDEN_ELEMENTS: &[&str] = &["script", "foreignobject"];

/// Sprite markup that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedSprite {
    content: Arc<str>,
    symbols: Arc<[String]>,
}

impl TrustedSprite {
    /// Check `raw` and wrap it, or describe why it was rejected.
    pub fn validate(raw: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(raw);
        let mut depth = 0usize;
        let mut seen_root = false;
        let mut symbols = Vec::new();

        loop {
            let pos = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|e| format!("malformed XML at byte {pos}: {e}"))?;
            match event {
                Event::Start(e) | Event::Empty(e) if depth == 0 && seen_root => {
                    return Err(format!(
                        "second root element <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                Event::Start(e) => {
                    check_element(&e, depth == 0, &mut symbols)?;
                    seen_root = true;
                    depth += 1;
                }
                Event::Empty(e) => {
                    check_element(&e, depth == 0, &mut symbols)?;
                    seen_root = true;
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Text(t) if depth == 0 && !t.iter().all(u8::is_ascii_whitespace) => {
                    return Err("text outside the root element".to_string());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err("no root element".to_string());
        }
        if depth != 0 {
            return Err("unclosed element".to_string());
        }

        Ok(Self {
            content: Arc::from(raw),
            symbols: symbols.into(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Symbol ids in document order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, icon_id: &str) -> bool {
        self.symbols.iter().any(|id| id == icon_id)
    }

    /// Copy with every symbol id, and every `href="#id"` pointing at one,
    /// prefixed by `prefix`. Other markup is written back untouched.
    pub fn scoped(&self, prefix: &str) -> Result<Self, String> {
        if prefix.is_empty() {
            return Ok(self.clone());
        }

        let mut reader = Reader::from_str(&self.content);
        let mut writer = Writer::new(Vec::with_capacity(self.content.len() + 64));
        loop {
            let event = reader.read_event().map_err(|e| e.to_string())?;
            let event = match event {
                Event::Eof => break,
                Event::Start(e) => Event::Start(self.scope_element(&e, prefix)?),
                Event::Empty(e) => Event::Empty(self.scope_element(&e, prefix)?),
                other => other,
            };
            writer.write_event(event).map_err(|e| e.to_string())?;
        }

        let content = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
        let symbols: Vec<String> = self.symbols.iter().map(|id| format!("{prefix}{id}")).collect();
        Ok(Self {
            content: Arc::from(content),
            symbols: symbols.into(),
        })
    }

    fn scope_element(&self, e: &BytesStart<'_>, prefix: &str) -> Result<BytesStart<'static>, String> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let is_symbol = e.local_name().as_ref().eq_ignore_ascii_case(b"symbol");
        let mut out = BytesStart::new(name);

        for attr in e.attributes() {
            let attr = attr.map_err(|err| err.to_string())?;
            let key = attr.key.as_ref();
            let local = attr.key.local_name();
            let raw = attr.value.as_ref();

            let value = if is_symbol && local.as_ref().eq_ignore_ascii_case(b"id") {
                [prefix.as_bytes(), raw].concat()
            } else if local.as_ref().eq_ignore_ascii_case(b"href") && self.points_at_symbol(raw) {
                [b"#".as_slice(), prefix.as_bytes(), &raw[1..]].concat()
            } else {
                raw.to_vec()
            };
            // Attributes are re-emitted double-quoted
            let value = String::from_utf8_lossy(&value).replace('"', "&quot;");
            out.push_attribute((key, value.as_bytes()));
        }
        Ok(out)
    }

    fn points_at_symbol(&self, raw: &[u8]) -> bool {
        raw.strip_prefix(b"#")
            .and_then(|id| std::str::from_utf8(id).ok())
            .and_then(|id| quick_xml::escape::unescape(id).ok())
            .is_some_and(|id| self.contains(&id))
    }
}

fn check_element(e: &BytesStart<'_>, is_root: bool, symbols: &mut Vec<String>) -> Result<(), String> {
    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
    if is_root && local != "svg" {
        return Err(format!("root element is <{local}>, expected <svg>"));
    }
    if FORBIDDEN_ELEMENTS.contains(&local.as_str()) {
        return Err(format!("forbidden element <{local}>"));
    }

    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("bad attribute in <{local}>: {err}"))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_ascii_lowercase();
        if key.starts_with("on") {
            return Err(format!("event handler attribute `{key}` on <{local}>"));
        }

        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        if value.split(';').any(is_javascript_url) {
            return Err(format!("javascript: URL in `{key}` on <{local}>"));
        }

        if local == "symbol" && key == "id" {
            symbols.push(value);
        }
    }
    Ok(())
}

/// Browsers ignore whitespace and control characters inside a scheme.
fn is_javascript_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take("javascript:".len())
        .collect();
    compact.eq_ignore_ascii_case("javascript:")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPRITE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" aria-hidden="true">
<symbol id="facebook" viewBox="0 0 24 24"><path d="M1 1"/></symbol>
<symbol id="twitter" viewBox="0 0 24 24"><use href="#facebook"/></symbol>
</svg>
"##;

    #[test]
    fn test_accepts_sprite() {
        let sprite = TrustedSprite::validate(SPRITE).unwrap();
        assert_eq!(sprite.symbols(), ["facebook", "twitter"]);
        assert!(sprite.contains("twitter"));
        assert!(!sprite.contains("github"));
        assert_eq!(sprite.as_str(), SPRITE);
    }

    #[test]
    fn test_accepts_prolog() {
        let raw = "<?xml version=\"1.0\"?>\n<!-- built -->\n<svg/>";
        assert!(TrustedSprite::validate(raw).is_ok());
    }

    #[test]
    fn test_rejects_non_svg_root() {
        let err = TrustedSprite::validate("<html><body/></html>").unwrap_err();
        assert!(err.contains("html"));
    }

    #[test]
    fn test_rejects_script() {
        let raw = r#"<svg><symbol id="a"><script>alert(1)</script></symbol></svg>"#;
        assert!(TrustedSprite::validate(raw).unwrap_err().contains("script"));

        let raw = r#"<svg><foreignObject><div/></foreignObject></svg>"#;
        assert!(TrustedSprite::validate(raw).is_err());
    }

    #[test]
    fn test_rejects_event_handlers() {
        let raw = r#"<svg><symbol id="a" onload="alert(1)"/></svg>"#;
        assert!(TrustedSprite::validate(raw).unwrap_err().contains("onload"));

        let raw = r#"<svg ONCLICK="x()"/>"#;
        assert!(TrustedSprite::validate(raw).is_err());
    }

    #[test]
    fn test_rejects_javascript_urls() {
        let raw = r#"<svg><a href="javascript:alert(1)"/></svg>"#;
        assert!(TrustedSprite::validate(raw).is_err());

        let raw = r#"<svg><a xlink:href=" JaVa&#x09;Script:alert(1)"/></svg>"#;
        assert!(TrustedSprite::validate(raw).is_err());
    }

    #[test]
    fn test_rejects_javascript_in_animation_values() {
        let raw = r#"<svg><a><animate attributeName="href" values="x;javascript:alert(1)"/></a></svg>"#;
        assert!(TrustedSprite::validate(raw).unwrap_err().contains("values"));

        let raw = r#"<svg><a><set attributeName="href" to=" ; JavaScript:alert(1)"/></a></svg>"#;
        assert!(TrustedSprite::validate(raw).is_err());

        let raw = r#"<svg><animate attributeName="opacity" values="0;0.5;1"/></svg>"#;
        assert!(TrustedSprite::validate(raw).is_ok());
    }

    #[test]
    fn test_scoped_prefixes_symbols_and_local_refs() {
        let sprite = TrustedSprite::validate(SPRITE).unwrap();
        let scoped = sprite.scoped("social.").unwrap();

        assert_eq!(scoped.symbols(), ["social.facebook", "social.twitter"]);
        assert!(scoped.as_str().contains(r#"<symbol id="social.facebook" viewBox="0 0 24 24">"#));
        assert!(scoped.as_str().contains(r##"<use href="#social.facebook"/>"##));
        assert!(!scoped.as_str().contains(r#"id="facebook""#));
        assert!(TrustedSprite::validate(scoped.as_str()).is_ok());

        assert_eq!(sprite.scoped("").unwrap(), sprite);
    }

    #[test]
    fn test_scoped_requotes_single_quoted_values() {
        let raw = r#"<svg><symbol id='a' aria-label='say "hi"'/></svg>"#;
        let scoped = TrustedSprite::validate(raw).unwrap().scoped("ui.").unwrap();
        assert!(scoped.as_str().contains(r#"aria-label="say &quot;hi&quot;""#));
        assert!(TrustedSprite::validate(scoped.as_str()).is_ok());
    }

    #[test]
    fn test_scoped_leaves_unknown_refs() {
        let raw = r##"<svg><symbol id="a"><use href="#gradient"/><path fill="url(#a)"/></symbol></svg>"##;
        let scoped = TrustedSprite::validate(raw).unwrap().scoped("ui.").unwrap();
        assert!(scoped.as_str().contains(r##"href="#gradient""##));
        assert!(scoped.as_str().contains(r##"fill="url(#a)""##));
        assert!(scoped.as_str().contains(r#"id="ui.a""#));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(TrustedSprite::validate("").is_err());
        assert!(TrustedSprite::validate("not xml").is_err());
        assert!(TrustedSprite::validate("<svg><g></svg>").is_err());
        assert!(TrustedSprite::validate("<svg>").is_err());
        assert!(TrustedSprite::validate("<svg/><svg/>").is_err());
    }
}
