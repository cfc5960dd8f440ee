//! Request URL to namespace mapping.

use percent_encoding::percent_decode_str;

use crate::sprite::output::OUTPUT_EXTENSION;

/// Namespace requested by `url`, if it addresses a sprite under `route`.
///
/// `/icons/social.svg` is `social`; `/icons/a%3Ab.svg` is `a:b`. Anything
/// that could leave the output directory is rejected.
pub fn sprite_namespace(url: &str, route: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.strip_prefix(route)?.strip_prefix('/')?;
    let encoded = file.strip_suffix(OUTPUT_EXTENSION)?.strip_suffix('.')?;
    if encoded.is_empty() || encoded.contains('/') {
        return None;
    }

    let namespace = percent_decode_str(encoded).decode_utf8().ok()?;
    let valid = namespace
        .split(':')
        .all(|segment| !segment.is_empty() && !segment.starts_with('.') && !segment.contains(['/', '\\']));
    valid.then(|| namespace.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_namespace() {
        assert_eq!(sprite_namespace("/icons/social.svg", "/icons").as_deref(), Some("social"));
        assert_eq!(sprite_namespace("/icons/default.svg?v=2", "/icons").as_deref(), Some("default"));
        assert_eq!(sprite_namespace("/icons/a%3Ab.svg", "/icons").as_deref(), Some("a:b"));
        assert_eq!(sprite_namespace("/social.svg", "").as_deref(), Some("social"));
    }

    #[test]
    fn test_sprite_namespace_rejects() {
        assert_eq!(sprite_namespace("/other/social.svg", "/icons"), None);
        assert_eq!(sprite_namespace("/iconsx/social.svg", "/icons"), None);
        assert_eq!(sprite_namespace("/icons/social.png", "/icons"), None);
        assert_eq!(sprite_namespace("/icons/.svg", "/icons"), None);
        assert_eq!(sprite_namespace("/icons/a/b.svg", "/icons"), None);
        assert_eq!(sprite_namespace("/icons/..%2Fsecret.svg", "/icons"), None);
        assert_eq!(sprite_namespace("/icons/a%3A.svg", "/icons"), None);
    }
}
