//! moviexml - export a movie database to cross-referenced XML documents.
//!
//! This crate provides a unified interface to the moviexml library crates.
//!
//! # Crates
//!
//! - [`moviexml_common`] - Entity kinds, relations, identifier synthesis
//! - [`moviexml_xml`] - Element tree and indenting XML writer
//! - [`moviexml_export`] - SQLite schema, relation resolution, per-kind export
//!
//! # Example
//!
//! ```no_run
//! use moviexml::prelude::*;
//!
//! let db = MovieDatabase::open("movies.db")?;
//! db.validate()?;
//!
//! let exporter = db.exporter(RelationOrder::Storage);
//! let summary = exporter.export(EntityKind::Movie, std::path::Path::new("."), |_, _| {})?;
//! println!("{} records", summary.records);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use moviexml_common as common;
pub use moviexml_export as export;
pub use moviexml_xml as xml;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use moviexml_common::{make_id, EntityKind, Relation};
    pub use moviexml_export::{
        EntityExporter, ExportEvent, ExportSummary, MovieDatabase, RelationOrder,
        RelationResolver,
    };
    pub use moviexml_xml::{Document, Element};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
