//! Root `<svg>` element parsing with quick-xml.
//!
//! Splits an icon document into the attributes of its root element and the
//! raw markup between `<svg ...>` and `</svg>`, validating that the whole
//! root element is well-formed on the way.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parsed root element of one icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgRoot<'a> {
    /// Attributes in source order, values kept escaped as written.
    pub attributes: Vec<(String, String)>,
    /// Markup between the root start and end tags.
    pub inner: &'a str,
}

impl SvgRoot<'_> {
    /// Raw value of attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `viewBox`, or one derived from numeric `width`/`height`.
    pub fn view_box(&self) -> Option<String> {
        if let Some(vb) = self.attr("viewBox") {
            return Some(vb.to_string());
        }
        let width = parse_length(self.attr("width")?)?;
        let height = parse_length(self.attr("height")?)?;
        Some(format!("0 0 {width} {height}"))
    }
}

/// Parse `svg`, requiring a single well-formed `<svg>` root element.
pub fn parse_root(svg: &str) -> Result<SvgRoot<'_>, String> {
    let mut reader = Reader::from_str(svg);

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event().map_err(|e| format!("{e} at byte {pos}"))? {
            Event::Start(e) => {
                let attributes = root_attributes(&e)?;
                let start = reader.buffer_position() as usize;
                let end = find_root_end(&mut reader)?;
                return Ok(SvgRoot {
                    attributes,
                    inner: svg[start..end].trim(),
                });
            }
            Event::Empty(e) => {
                let attributes = root_attributes(&e)?;
                return Ok(SvgRoot {
                    attributes,
                    inner: "",
                });
            }
            Event::Eof => return Err("no root element".to_string()),
            Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
            Event::Text(_) => return Err("text before root element".to_string()),
            _ => {}
        }
    }
}

/// Check the element is `svg` and collect its attributes.
fn root_attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, String> {
    let local = e.local_name();
    if local.as_ref() != b"svg" {
        return Err(format!(
            "root element is <{}>, expected <svg>",
            String::from_utf8_lossy(e.name().as_ref())
        ));
    }

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

/// Read until the root end tag, returning the byte offset where it starts.
fn find_root_end(reader: &mut Reader<&[u8]>) -> Result<usize, String> {
    let mut depth = 0usize;
    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event().map_err(|e| format!("{e} at byte {pos}"))? {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(pos),
            Event::End(_) => depth -= 1,
            Event::Eof => return Err("unclosed <svg> element".to_string()),
            _ => {}
        }
    }
}

/// `24`, `24px` or `24.5` -> number; relative units are rejected.
fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse().ok()
}
