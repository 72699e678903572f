//! Table schema description and validation.

use moviexml_common::EntityKind;
use rusqlite::Connection;
use tracing::debug;

use crate::{Error, Result};

/// Columns of one table, read once with `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub table: String,
    /// All column names, in declaration order.
    pub columns: Vec<String>,
    /// Columns exported as child elements, in declaration order.
    pub exportable_fields: Vec<String>,
}

impl TableSchema {
    /// Read the column list of `table`.
    ///
    /// Fails with [`Error::UnknownTable`] if the table has no columns,
    /// which is how SQLite reports a table that does not exist.
    pub fn load(conn: &Connection, table: &str) -> Result<Self> {
        let mut stmt =
            conn.prepare_cached("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(Error::UnknownTable(table.to_string()));
        }

        let exportable_fields = columns
            .iter()
            .filter(|c| is_exportable(c))
            .cloned()
            .collect();

        let schema = Self {
            table: table.to_string(),
            columns,
            exportable_fields,
        };
        debug!(
            table,
            columns = schema.columns.len(),
            fields = ?schema.exportable_fields,
            "loaded table schema"
        );
        Ok(schema)
    }

    /// Read the column list of the table backing `kind`.
    pub fn for_kind(conn: &Connection, kind: EntityKind) -> Result<Self> {
        Self::load(conn, kind.table_name())
    }

    /// Whether the table has a column named `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`Error::MissingColumn`] unless the table has `column`.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(Error::MissingColumn {
                table: self.table.clone(),
                column: column.to_string(),
            })
        }
    }
}

/// Whether a column is exported as a scalar field.
///
/// Any column whose name contains `id` (case-sensitive) is treated as a key
/// and left out. This also catches names such as `video` or `width`, so
/// columns like that never appear in the output.
pub fn is_exportable(column: &str) -> bool {
    !column.contains("id")
}

/// Names of all tables in the database.
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Check that the tables of every entity kind are present.
///
/// Reports all missing tables at once, in export order.
pub fn validate_tables(conn: &Connection) -> Result<()> {
    let present = table_names(conn)?;
    let missing: Vec<String> = EntityKind::ALL
        .iter()
        .map(|kind| kind.table_name())
        .filter(|table| !present.iter().any(|p| p == table))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingTables(missing))
    }
}
