//! Owned element tree read with quick-xml.
//!
//! Source dialects are looked up by local name only, so a namespaced export
//! (`<ns0:INVOIC02 xmlns:ns0=...>`) reads the same as an unqualified one.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::MappingError;

/// Deepest element nesting accepted. Neither dialect nor UBL comes close;
/// the limit keeps recursive drops and walks off the end of the stack.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name, prefix removed.
    pub name: String,
    pub attrs: Vec<(String, String)>,
    /// Concatenated, trimmed character data.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name, in document order.
    pub fn children<'s, 'n>(
        &'s self,
        name: &'n str,
    ) -> impl Iterator<Item = &'s Element> + use<'s, 'n> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First `name` child whose `key` field has text `value`.
    ///
    /// This is the IDoc qualifier lookup: `E1EDK02` with `QUALF` = `009`.
    pub fn child_where(&self, name: &str, key: &str, value: &str) -> Option<&Element> {
        self.children
            .iter()
            .filter(|c| c.name == name)
            .find(|c| c.child_text(key) == Some(value))
    }

    /// Text content, `None` when blank.
    pub fn text(&self) -> Option<&str> {
        Some(self.text.as_str()).filter(|t| !t.is_empty())
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Element::text)
    }

    /// Text at a descendant path of local names.
    pub fn path_text(&self, path: &[&str]) -> Option<&str> {
        path.iter()
            .try_fold(self, |el, name| el.child(name))
            .and_then(Element::text)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Read a complete document into its root element.
pub fn parse(xml: &str) -> Result<Element, MappingError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(MappingError::Xml(format!(
                        "elements nested deeper than {MAX_DEPTH} levels"
                    )));
                }
                stack.push(open(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let el = open(e)?;
                close(&mut stack, &mut root, el);
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| MappingError::Xml(format!("XML parse error: {e}")))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Ok(Event::End(_)) => {
                let Some(mut el) = stack.pop() else {
                    return Err(MappingError::Xml("unbalanced end tag".into()));
                };
                el.text = el.text.trim().to_string();
                close(&mut stack, &mut root, el);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MappingError::Xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(MappingError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| MappingError::Xml("document has no root element".into()))
}

fn open(e: &BytesStart<'_>) -> Result<Element, MappingError> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut el = Element::new(name);
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MappingError::Xml(format!("bad attribute value: {e}")))?;
        el.attrs.push((key, value.trim().to_string()));
    }
    Ok(el)
}

fn close(stack: &mut [Element], root: &mut Option<Element>, el: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => {}
    }
}
