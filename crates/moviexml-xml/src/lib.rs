//! Element tree and XML document formatting for moviexml.
//!
//! Exported documents are assembled in memory as an [`Element`] tree and
//! indented while the tree is walked, so no text-level post-processing of
//! serialized markup is ever needed. Element text and attribute values are
//! escaped on output; angle brackets in values cannot disturb the layout.
//!
//! # Example
//!
//! ```
//! use moviexml_xml::{Document, Element};
//!
//! let root = Element::new("movies").child(
//!     Element::new("movie")
//!         .attr("id", "M1")
//!         .child(Element::new("title").text("Test")),
//! );
//!
//! let xml = Document::new(root).to_xml_string()?;
//! assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<movies>"));
//! # Ok::<(), moviexml_xml::Error>(())
//! ```

mod element;
mod error;
mod from_xml;
mod writer;

pub use element::{encode_name, Element};
pub use error::{Error, Result};
pub use writer::{Document, INDENT_WIDTH};
