//! Export of a movie database to cross-referenced XML documents.
//!
//! The source is an SQLite database with three primary tables (`Movie`,
//! `Person`, `Oscar`) and two pivot tables (`Director`, `Actor`). Each
//! primary table becomes one document (`movies.xml`, `people.xml`,
//! `oscars.xml`) with one element per row. Links between records are not
//! nested; they are written as attributes holding space-separated lists of
//! synthesized IDs (`directors="P7 P8"`).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use moviexml_export::{MovieDatabase, RelationOrder};
//!
//! let db = MovieDatabase::open("movies.db")?;
//! let written = db.export_all(Path::new("."), RelationOrder::Storage, |_| {})?;
//! for summary in &written {
//!     println!("{} has been written.", summary.path.display());
//! }
//! db.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Schema** ([`TableSchema`]): column lists and exportable fields, read once per table
//! - **Resolver** ([`RelationResolver`]): pivot table lookups producing ID lists
//! - **Exporter** ([`EntityExporter`]): one document per entity kind
//! - **Database** ([`MovieDatabase`]): connection lifetime, validation, full export

mod database;
mod error;
pub mod exporter;
pub mod resolver;
pub mod schema;
pub mod value;

pub use database::{ExportEvent, MovieDatabase};
pub use error::{Error, Result};
pub use exporter::{record_element, EntityExporter, ExportPlan, ExportSummary};
pub use resolver::{RelationOrder, RelationQuery, RelationResolver};
pub use schema::{validate_tables, TableSchema};

pub use moviexml_common::{EntityKind, Relation};
