//! Indenting XML document writer.

use std::io::Write;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::{Element, Error, Result};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// A complete XML document: prolog plus a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element.
    pub root: Element,
}

impl Document {
    /// Create a document around `root`.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Convert to an indented XML string.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut output = Vec::new();
        self.write_to(&mut output)?;
        Ok(String::from_utf8(output)?)
    }

    /// Write the document to a writer.
    ///
    /// The output starts with `<?xml version="1.0"?>`, puts every element on
    /// its own line indented by [`INDENT_WIDTH`] spaces per depth, keeps
    /// text-only elements on a single line, and ends with a newline.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', INDENT_WIDTH);

        xml_writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(|e| Error::Xml(e.to_string()))?;

        write_element(&mut xml_writer, &self.root)?;

        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    /// Parse XML text and write it back with canonical indentation.
    ///
    /// Whitespace between elements is discarded, so formatting output that
    /// was already produced by this writer yields identical bytes.
    pub fn reformat(xml: &str) -> Result<String> {
        Self::from_xml_str(xml)?.to_xml_string()
    }
}

/// Write a single element and its children.
fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Xml(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Xml(e.to_string()))?;

    // Quotes are left as-is in text content; only markup is escaped.
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
            .map_err(|e| Error::Xml(e.to_string()))?;
    }

    for child in &element.children {
        write_element(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| Error::Xml(e.to_string()))
}
