//! Error types for database export.

use moviexml_common::EntityKind;
use thiserror::Error;

/// Errors that can occur when exporting a movie database.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required tables are absent.
    #[error("Database file is invalid! Missing tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),

    /// A table queried during export does not exist.
    #[error("table {0} does not exist")]
    UnknownTable(String),

    /// An expected column is missing from a table.
    #[error("table {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    /// A key column holds NULL where a value is required.
    #[error("{table}.{column} is NULL")]
    NullKey { table: String, column: String },

    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writing error.
    #[error("{0}")]
    Xml(#[from] moviexml_xml::Error),

    /// Failure while exporting one entity kind.
    #[error("failed to export {kind}")]
    Export {
        kind: EntityKind,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this is a schema validation failure detected before export.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingTables(_))
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, Error>;
