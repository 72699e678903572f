//! Source database handle.

use std::path::Path;

use moviexml_common::EntityKind;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::exporter::{EntityExporter, ExportSummary};
use crate::resolver::RelationOrder;
use crate::schema;
use crate::{Error, Result};

/// Progress of [`MovieDatabase::export_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportEvent<'a> {
    /// Export of `kind` is about to read `total` records.
    Started { kind: EntityKind, total: usize },
    /// `done` of `total` records of `kind` have been built.
    Progress {
        kind: EntityKind,
        done: usize,
        total: usize,
    },
    /// The document of one kind is on disk.
    Written(&'a ExportSummary),
}

/// A movie database opened for export.
///
/// The connection is held for the lifetime of the handle and shared by every
/// export. It is released by [`MovieDatabase::close`], or on drop when an
/// error ends the run early.
#[derive(Debug)]
pub struct MovieDatabase {
    conn: Connection,
}

impl MovieDatabase {
    /// Open an existing database file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Names of all tables in the database.
    pub fn tables(&self) -> Result<Vec<String>> {
        schema::table_names(&self.conn)
    }

    /// Check that the `Movie`, `Oscar` and `Person` tables exist.
    pub fn validate(&self) -> Result<()> {
        schema::validate_tables(&self.conn)
    }

    /// Number of records of `kind`.
    pub fn record_count(&self, kind: EntityKind) -> Result<usize> {
        self.exporter(RelationOrder::default()).record_count(kind)
    }

    /// An exporter sharing this database's connection.
    pub fn exporter(&self, order: RelationOrder) -> EntityExporter<'_> {
        EntityExporter::new(&self.conn, order)
    }

    /// Validate the schema, then export every kind into `dir`.
    ///
    /// Nothing is written if validation fails. A failure part way through
    /// leaves the documents of earlier kinds on disk. `on_event` sees each
    /// kind start, its per-record progress, and the written document.
    pub fn export_all(
        &self,
        dir: &Path,
        order: RelationOrder,
        mut on_event: impl FnMut(ExportEvent<'_>),
    ) -> Result<Vec<ExportSummary>> {
        self.validate()?;

        let exporter = self.exporter(order);
        let mut summaries = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            let total = exporter.record_count(kind).map_err(|source| Error::Export {
                kind,
                source: Box::new(source),
            })?;
            debug!(%kind, total, "starting export");
            on_event(ExportEvent::Started { kind, total });

            let summary = exporter.export(kind, dir, |done, total| {
                on_event(ExportEvent::Progress { kind, done, total })
            })?;
            on_event(ExportEvent::Written(&summary));
            summaries.push(summary);
        }

        info!(documents = summaries.len(), dir = %dir.display(), "export complete");
        Ok(summaries)
    }

    /// Close the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Sqlite(e))
    }
}
