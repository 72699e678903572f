//! Per-kind export of database records to XML documents.

use std::path::{Path, PathBuf};

use moviexml_common::{award_id, movie_id, person_id, EntityKind, Relation};
use moviexml_xml::{encode_name, Document, Element};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use tracing::{debug, info};

use crate::resolver::{RelationQuery, RelationResolver, RelationOrder, YEAR_COLUMN};
use crate::schema::TableSchema;
use crate::value::{key_text, present_text, to_text};
use crate::{Error, Result};

/// Key column of movies and persons.
pub const ID_COLUMN: &str = "id";
/// Movie reference of an award.
pub const MOVIE_ID_COLUMN: &str = "movie_id";
/// Person reference of an award.
pub const PERSON_ID_COLUMN: &str = "person_id";

/// Everything needed to turn one row of a kind into an element, worked out
/// once per kind before the rows are read.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub kind: EntityKind,
    pub schema: TableSchema,
    /// Relation attributes as (relation, attribute name).
    pub relations: Vec<(Relation, &'static str)>,
    /// Scalar fields as (column index, element name).
    pub fields: Vec<(usize, String)>,
}

impl ExportPlan {
    /// Build the plan for `kind`, checking every column it relies on.
    pub fn new(conn: &Connection, kind: EntityKind) -> Result<Self> {
        let schema = TableSchema::for_kind(conn, kind)?;

        match kind {
            EntityKind::Movie | EntityKind::Person => schema.require_column(ID_COLUMN)?,
            EntityKind::Award => {
                schema.require_column(MOVIE_ID_COLUMN)?;
                schema.require_column(PERSON_ID_COLUMN)?;
                schema.require_column(YEAR_COLUMN)?;
            }
        }

        let mut relations = Vec::new();
        for &relation in kind.relations() {
            if let (Some(query), Some(attribute)) =
                (RelationQuery::plan(kind, relation), relation.attribute_name(kind))
            {
                query.check(conn)?;
                relations.push((relation, attribute));
            }
        }

        let fields = schema
            .exportable_fields
            .iter()
            .filter_map(|field| {
                schema
                    .columns
                    .iter()
                    .position(|c| c == field)
                    .map(|index| (index, encode_name(field)))
            })
            .collect();

        Ok(Self {
            kind,
            schema,
            relations,
            fields,
        })
    }

    /// `SELECT` listing the columns in schema order.
    fn select_sql(&self) -> String {
        let columns: Vec<String> = self
            .schema
            .columns
            .iter()
            .map(|c| format!("\"{}\"", c.replace('"', "\"\"")))
            .collect();
        format!("SELECT {} FROM \"{}\"", columns.join(", "), self.kind.table_name())
    }
}

/// Result of writing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub kind: EntityKind,
    /// Path of the written file.
    pub path: PathBuf,
    /// Number of record elements written.
    pub records: usize,
}

/// Exports entity kinds from a shared connection.
#[derive(Debug)]
pub struct EntityExporter<'conn> {
    conn: &'conn Connection,
    resolver: RelationResolver<'conn>,
}

impl<'conn> EntityExporter<'conn> {
    /// Create an exporter over `conn`.
    pub fn new(conn: &'conn Connection, order: RelationOrder) -> Self {
        Self {
            conn,
            resolver: RelationResolver::new(conn, order),
        }
    }

    /// Number of records of `kind`.
    pub fn record_count(&self, kind: EntityKind) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", kind.table_name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// Build the document for `kind` in memory.
    ///
    /// `progress` is called with (records done, total) as rows are read.
    pub fn build_document(
        &self,
        kind: EntityKind,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Document> {
        let plan = ExportPlan::new(self.conn, kind)?;
        let total = self.record_count(kind)?;
        debug!(%kind, total, fields = plan.fields.len(), "exporting records");

        let mut root = Element::new(kind.root_name());
        let mut stmt = self.conn.prepare(&plan.select_sql())?;
        let mut rows = stmt.query([])?;

        let mut done = 0;
        while let Some(row) = rows.next()? {
            root.push_child(record_element(&plan, row, &self.resolver)?);
            done += 1;
            progress(done, total.max(done));
        }

        Ok(Document::new(root))
    }

    /// Export `kind` to `<dir>/<root>.xml`, replacing any existing file.
    pub fn export(
        &self,
        kind: EntityKind,
        dir: &Path,
        progress: impl FnMut(usize, usize),
    ) -> Result<ExportSummary> {
        self.export_inner(kind, dir, progress)
            .map_err(|source| Error::Export {
                kind,
                source: Box::new(source),
            })
    }

    fn export_inner(
        &self,
        kind: EntityKind,
        dir: &Path,
        progress: impl FnMut(usize, usize),
    ) -> Result<ExportSummary> {
        let document = self.build_document(kind, progress)?;
        let records = document.root.children.len();

        std::fs::create_dir_all(dir)?;
        let path = dir.join(kind.file_name());
        let xml = document.to_xml_string()?;
        std::fs::write(&path, xml)?;

        info!(%kind, records, path = %path.display(), "document written");
        Ok(ExportSummary {
            kind,
            path,
            records,
        })
    }
}

/// Build the element for one row.
///
/// Depends only on its arguments: the row, the plan computed for its kind,
/// and the resolver used for relation attributes.
pub fn record_element(
    plan: &ExportPlan,
    row: &Row<'_>,
    resolver: &RelationResolver<'_>,
) -> Result<Element> {
    let kind = plan.kind;
    let mut element = Element::new(kind.element_name());

    match kind {
        EntityKind::Movie | EntityKind::Person => {
            let key = row.get_ref(ID_COLUMN)?;
            let raw = key_text(key).ok_or_else(|| null_key(plan, ID_COLUMN))?;
            let id = if kind == EntityKind::Movie {
                movie_id(&raw)
            } else {
                person_id(&raw)
            };
            element.set_attr("id", id);

            let anchor = Value::from(key);
            for &(relation, attribute) in &plan.relations {
                if let Some(ids) = resolver.resolve_attribute(kind, &anchor, relation)? {
                    element.set_attr(attribute, ids);
                }
            }
        }
        EntityKind::Award => {
            let year = to_text(row.get_ref(YEAR_COLUMN)?);
            let person = present_text(row.get_ref(PERSON_ID_COLUMN)?);
            let movie = key_text(row.get_ref(MOVIE_ID_COLUMN)?)
                .ok_or_else(|| null_key(plan, MOVIE_ID_COLUMN))?;

            element.set_attr("id", award_id(&year, person.as_deref().unwrap_or_default()));
            element.set_attr("movie_id", movie_id(&movie));
            if let Some(person) = person {
                element.set_attr("person_id", person_id(&person));
            }
        }
    }

    for (index, name) in &plan.fields {
        if let Some(text) = present_text(row.get_ref(*index)?) {
            element.push_child(Element::new(name.as_str()).text(text));
        }
    }

    Ok(element)
}

fn null_key(plan: &ExportPlan, column: &str) -> Error {
    Error::NullKey {
        table: plan.schema.table.clone(),
        column: column.to_string(),
    }
}
