//! Parse XML text into an element tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Document, Element, Error, Result};

impl Document {
    /// Parse XML text into a document.
    ///
    /// The declaration, comments and processing instructions are dropped.
    /// Whitespace-only text is kept only on elements without children, so
    /// layout whitespace between elements does not survive a round trip.
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let node = element_from_start(&e)?;
                    attach(&mut stack, &mut root, node);
                }
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(node) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        if !text.trim().is_empty() || node.children.is_empty() {
                            node.text.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(node) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        node.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // Ignore other events (declarations, comments, etc.)
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "parse error at position {}: {}",
                        reader.error_position(),
                        e
                    )))
                }
            }
        }

        root.map(Document::new).ok_or(Error::NoRoot)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, node: Element) {
    match stack.last_mut() {
        Some(parent) => {
            // Layout whitespace before the first child.
            if parent.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
                parent.text = None;
            }
            parent.children.push(node);
        }
        None => *root = Some(node),
    }
}
