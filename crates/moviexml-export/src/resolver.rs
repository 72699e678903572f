//! Resolution of related records into synthesized ID lists.
//!
//! For an anchor movie the pivot table is searched on its movie column and
//! the person side is returned; for an anchor person it is the other way
//! round. Awards are matched on their person column from either side and are
//! always returned as award IDs (`O<year><person>`).

use moviexml_common::{award_id, make_id, EntityKind, Relation};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::schema::TableSchema;
use crate::value::{key_text, present_text, to_text};
use crate::{Error, Result};

/// Column holding the award year.
pub const YEAR_COLUMN: &str = "year";

/// Ordering of IDs within a relation attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelationOrder {
    /// Row order of the underlying table, as stored.
    #[default]
    Storage,
    /// Synthesized IDs sorted lexicographically (`M10` before `M9`).
    Sorted,
}

/// Columns and result kind for one (anchor, relation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationQuery {
    pub relation: Relation,
    /// Column compared against the anchor's key.
    pub match_column: &'static str,
    /// Column holding the related key.
    pub result_column: &'static str,
    /// Kind of the related records.
    pub result_kind: EntityKind,
}

impl RelationQuery {
    /// Plan the lookup of `relation` from an anchor of kind `anchor`.
    ///
    /// Returns `None` for anchors that carry no relations.
    pub fn plan(anchor: EntityKind, relation: Relation) -> Option<Self> {
        let person_column = relation.person_column();
        let movie_column = relation.movie_column();

        let (match_column, result_column, result_kind) = match (anchor, relation) {
            (EntityKind::Award, _) => return None,
            (EntityKind::Movie, Relation::Award) => (movie_column, person_column, EntityKind::Award),
            (EntityKind::Movie, _) => (movie_column, person_column, EntityKind::Person),
            (EntityKind::Person, Relation::Award) => (person_column, person_column, EntityKind::Award),
            (EntityKind::Person, _) => (person_column, movie_column, EntityKind::Movie),
        };

        Some(Self {
            relation,
            match_column,
            result_column,
            result_kind,
        })
    }

    /// Columns the relation table must have.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![self.match_column];
        if self.result_column != self.match_column {
            columns.push(self.result_column);
        }
        if self.result_kind == EntityKind::Award {
            columns.push(YEAR_COLUMN);
        }
        columns
    }

    /// Check the relation table against [`Self::required_columns`].
    pub fn check(&self, conn: &Connection) -> Result<()> {
        let schema = TableSchema::load(conn, self.relation.table_name())?;
        for column in self.required_columns() {
            schema.require_column(column)?;
        }
        Ok(())
    }

    /// SQL text of the lookup. Identifiers come only from the fixed
    /// relation tables; the anchor key is bound as `?1`.
    pub fn sql(&self) -> String {
        let table = self.relation.table_name();

        if self.result_kind == EntityKind::Award {
            format!(
                "SELECT \"{}\", \"{}\" FROM \"{}\" WHERE \"{}\" = ?1",
                self.result_column, YEAR_COLUMN, table, self.match_column
            )
        } else {
            format!(
                "SELECT \"{}\" FROM \"{}\" WHERE \"{}\" = ?1",
                self.result_column, table, self.match_column
            )
        }
    }
}

/// Looks up related records on a shared connection.
///
/// The resolver holds no per-record state; statements are cached on the
/// connection, so repeated lookups only rebind the anchor key.
#[derive(Debug, Clone, Copy)]
pub struct RelationResolver<'conn> {
    conn: &'conn Connection,
    order: RelationOrder,
}

impl<'conn> RelationResolver<'conn> {
    /// Create a resolver over `conn`.
    pub fn new(conn: &'conn Connection, order: RelationOrder) -> Self {
        Self { conn, order }
    }

    /// ID ordering policy in use.
    pub fn order(&self) -> RelationOrder {
        self.order
    }

    /// Synthesized IDs of all `relation` records linked to the anchor.
    ///
    /// `anchor_id` is the anchor's raw key as stored. An empty list means
    /// no links, and the caller omits the attribute.
    pub fn resolve(
        &self,
        anchor: EntityKind,
        anchor_id: &Value,
        relation: Relation,
    ) -> Result<Vec<String>> {
        match RelationQuery::plan(anchor, relation) {
            Some(query) => self.run(&query, anchor_id),
            None => Ok(Vec::new()),
        }
    }

    /// Same as [`Self::resolve`], joined with single spaces.
    ///
    /// Returns `None` when there are no links.
    pub fn resolve_attribute(
        &self,
        anchor: EntityKind,
        anchor_id: &Value,
        relation: Relation,
    ) -> Result<Option<String>> {
        let ids = self.resolve(anchor, anchor_id, relation)?;
        Ok((!ids.is_empty()).then(|| ids.join(" ")))
    }

    fn run(&self, query: &RelationQuery, anchor_id: &Value) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(&query.sql())?;
        let mut rows = stmt.query([anchor_id])?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let key = row.get_ref(0)?;
            let id = if query.result_kind == EntityKind::Award {
                let year = to_text(row.get_ref(1)?);
                award_id(&year, &present_text(key).unwrap_or_default())
            } else {
                let raw = key_text(key).ok_or_else(|| Error::NullKey {
                    table: query.relation.table_name().to_string(),
                    column: query.result_column.to_string(),
                })?;
                make_id(query.result_kind, &raw, None)
            };
            ids.push(id);
        }

        if self.order == RelationOrder::Sorted {
            ids.sort_unstable();
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Director (director_id TEXT, movie_id TEXT);
             CREATE TABLE Actor (actor_id TEXT, movie_id TEXT);
             CREATE TABLE Oscar (movie_id TEXT, person_id TEXT, type TEXT, year INTEGER);
             INSERT INTO Director VALUES ('7', '5'), ('7', '3'), ('8', '3');
             INSERT INTO Actor VALUES ('9', '3');
             INSERT INTO Oscar VALUES ('3', '7', 'BEST-DIRECTOR', 1994),
                                      ('3', NULL, 'BEST-PICTURE', 1994),
                                      ('5', '7', 'BEST-DIRECTOR', 1990);",
        )
        .unwrap();
        conn
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_plan() {
        let q = RelationQuery::plan(EntityKind::Person, Relation::Director).unwrap();
        assert_eq!((q.match_column, q.result_column), ("director_id", "movie_id"));
        assert_eq!(q.result_kind, EntityKind::Movie);

        let q = RelationQuery::plan(EntityKind::Movie, Relation::Actor).unwrap();
        assert_eq!((q.match_column, q.result_column), ("movie_id", "actor_id"));
        assert_eq!(q.result_kind, EntityKind::Person);

        let q = RelationQuery::plan(EntityKind::Person, Relation::Award).unwrap();
        assert_eq!((q.match_column, q.result_column), ("person_id", "person_id"));
        assert_eq!(q.required_columns(), ["person_id", "year"]);

        assert!(RelationQuery::plan(EntityKind::Award, Relation::Director).is_none());
    }

    #[test]
    fn test_person_directed_in_storage_order() {
        let conn = connection();
        let resolver = RelationResolver::new(&conn, RelationOrder::Storage);
        let ids = resolver
            .resolve(EntityKind::Person, &text("7"), Relation::Director)
            .unwrap();
        assert_eq!(ids, ["M5", "M3"]);
    }

    #[test]
    fn test_sorted_order() {
        let conn = connection();
        let resolver = RelationResolver::new(&conn, RelationOrder::Sorted);
        let ids = resolver
            .resolve(EntityKind::Person, &text("7"), Relation::Director)
            .unwrap();
        assert_eq!(ids, ["M3", "M5"]);

        let oscars = resolver
            .resolve(EntityKind::Person, &text("7"), Relation::Award)
            .unwrap();
        assert_eq!(oscars, ["O19907", "O19947"]);
    }

    #[test]
    fn test_sorted_compares_ids_as_text() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Director (director_id INTEGER, movie_id INTEGER);
             INSERT INTO Director VALUES (7, 10), (7, 9), (0, 9);",
        )
        .unwrap();

        let resolver = RelationResolver::new(&conn, RelationOrder::Sorted);
        let ids = resolver
            .resolve(EntityKind::Person, &Value::Integer(7), Relation::Director)
            .unwrap();
        assert_eq!(ids, ["M10", "M9"]);

        let directors = resolver
            .resolve(EntityKind::Movie, &Value::Integer(9), Relation::Director)
            .unwrap();
        assert_eq!(directors, ["P0", "P7"]);
    }

    #[test]
    fn test_movie_side() {
        let conn = connection();
        let resolver = RelationResolver::new(&conn, RelationOrder::Storage);

        let directors = resolver
            .resolve_attribute(EntityKind::Movie, &text("3"), Relation::Director)
            .unwrap();
        assert_eq!(directors.as_deref(), Some("P7 P8"));

        let oscars = resolver
            .resolve_attribute(EntityKind::Movie, &text("3"), Relation::Award)
            .unwrap();
        assert_eq!(oscars.as_deref(), Some("O19947 O19940000000"));
    }

    #[test]
    fn test_no_links() {
        let conn = connection();
        let resolver = RelationResolver::new(&conn, RelationOrder::Storage);
        let actors = resolver
            .resolve_attribute(EntityKind::Movie, &text("5"), Relation::Actor)
            .unwrap();
        assert_eq!(actors, None);
        assert!(resolver
            .resolve(EntityKind::Award, &text("3"), Relation::Actor)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_value_is_bound_not_interpolated() {
        let conn = connection();
        let resolver = RelationResolver::new(&conn, RelationOrder::Storage);
        let ids = resolver
            .resolve(EntityKind::Person, &text("7' OR '1'='1"), Relation::Director)
            .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let conn = connection();
        conn.execute_batch("DROP TABLE Actor; CREATE TABLE Actor (person_id TEXT, movie_id TEXT);")
            .unwrap();
        let query = RelationQuery::plan(EntityKind::Movie, Relation::Actor).unwrap();
        assert!(matches!(
            query.check(&conn),
            Err(Error::MissingColumn { ref column, .. }) if column == "actor_id"
        ));
    }
}
