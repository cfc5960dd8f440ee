//! Icon name normalization.
//!
//! Turns arbitrary file and folder names into kebab-case identifiers:
//!
//! ```text
//! sunMoon    -> sun-moon
//! SunMoon    -> sun-moon
//! sun_moon   -> sun-moon
//! "sun  moon" -> sun-moon
//! Café Crème -> cafe-creme
//! ```

use thiserror::Error;

/// Name could not be turned into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid icon name `{raw}`: normalizes to an empty identifier")]
pub struct InvalidNameError {
    pub raw: String,
}

/// Normalize a file or folder name into a kebab-case identifier.
///
/// The result only contains `a-z`, `0-9` and single `-` separators, never at
/// either end. Normalizing an already normalized name returns it unchanged.
pub fn normalize(raw: &str) -> Result<String, InvalidNameError> {
    let ascii = transliterate(raw);

    let spaced = collapse_whitespace(&ascii);
    let hyphenated = spaced.replace(' ', "-");
    let split = split_case_boundaries(&hyphenated);
    let lowered = split.replace('_', "-").to_ascii_lowercase();
    let collapsed = collapse_hyphens(&lowered);
    let name = collapsed.trim_matches('-');

    if name.is_empty() {
        return Err(InvalidNameError {
            raw: raw.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Fold to ASCII and turn punctuation into separators.
///
/// Whitespace, `-` and `_` are kept as-is so the later steps can treat them.
fn transliterate(raw: &str) -> String {
    let ascii = deunicode::deunicode(raw);
    ascii
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// `sunMoon` -> `sun-Moon`, `icon2X` -> `icon2-X`.
fn split_case_boundaries(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if let Some(p) = prev
            && (p.is_ascii_lowercase() || p.is_ascii_digit())
            && c.is_ascii_uppercase()
        {
            out.push('-');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn collapse_hyphens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}
