//! End-to-end export tests against SQLite files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use moviexml_export::{EntityKind, Error, MovieDatabase, RelationOrder};
use moviexml_xml::Document;
use rusqlite::Connection;
use tempfile::TempDir;

const SCHEMA: &str = "
    CREATE TABLE Movie (id TEXT PRIMARY KEY, name TEXT, year INTEGER, rating TEXT,
                        runtime INTEGER, genre TEXT, earnings_rank INTEGER, tagline TEXT);
    CREATE TABLE Person (id TEXT PRIMARY KEY, name TEXT, dob TEXT, pob TEXT);
    CREATE TABLE Oscar (movie_id TEXT, person_id TEXT, type TEXT, year INTEGER);
    CREATE TABLE Director (director_id TEXT, movie_id TEXT);
    CREATE TABLE Actor (actor_id TEXT, movie_id TEXT);
";

fn create_db(dir: &Path, sql: &str) -> PathBuf {
    let path = dir.join("movies.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(sql).unwrap();
    conn.close().unwrap();
    path
}

fn export(sql: &str, order: RelationOrder) -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(dir.path(), sql);
    let out = dir.path().join("out");

    let db = MovieDatabase::open(&db_path).unwrap();
    let written = db.export_all(&out, order, |_| {}).unwrap();
    db.close().unwrap();

    let paths = written.into_iter().map(|s| s.path).collect();
    (dir, paths)
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join("out").join(name)).unwrap()
}

#[test]
fn test_minimal_database() {
    let sql = format!(
        "{SCHEMA}
         INSERT INTO Movie (id, name) VALUES ('1', 'Test');
         INSERT INTO Person (id, name) VALUES ('1', 'Actor A');
         INSERT INTO Actor VALUES ('1', '1');"
    );
    let (dir, paths) = export(&sql, RelationOrder::Storage);

    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["movies.xml", "oscars.xml", "people.xml"]);

    assert_eq!(
        read(&dir, "movies.xml"),
        "<?xml version=\"1.0\"?>\n\
<movies>\n\
\x20   <movie id=\"M1\" actors=\"P1\">\n\
\x20       <name>Test</name>\n\
\x20   </movie>\n\
</movies>\n"
    );
    assert_eq!(
        read(&dir, "people.xml"),
        "<?xml version=\"1.0\"?>\n\
<people>\n\
\x20   <person id=\"P1\" actedIn=\"M1\">\n\
\x20       <name>Actor A</name>\n\
\x20   </person>\n\
</people>\n"
    );
    assert_eq!(read(&dir, "oscars.xml"), "<?xml version=\"1.0\"?>\n<oscars/>\n");
}

#[test]
fn test_cross_references() {
    let sql = format!(
        "{SCHEMA}
         INSERT INTO Movie (id, name, year, tagline) VALUES
             ('0000003', 'Third', 1994, 'Great'),
             ('0000005', 'Fifth', 1990, NULL),
             ('0000009', 'Ninth', 2001, '');
         INSERT INTO Person (id, name) VALUES ('0000007', 'Director D'), ('0000008', 'Nobody');
         INSERT INTO Director VALUES ('0000007', '0000003'), ('0000007', '0000005');
         INSERT INTO Oscar VALUES ('0000003', '0000007', 'BEST-DIRECTOR', 1994),
                                  ('0000003', NULL, 'BEST-PICTURE', 1994);"
    );
    let (dir, _) = export(&sql, RelationOrder::Storage);

    let people = Document::from_xml_str(&read(&dir, "people.xml")).unwrap().root;
    let director = &people.children[0];
    assert_eq!(director.attribute("id"), Some("P0000007"));
    assert_eq!(director.attribute("directed"), Some("M0000003 M0000005"));
    assert_eq!(director.attribute("oscars"), Some("O19940000007"));
    assert_eq!(director.attribute("actedIn"), None);

    let nobody = &people.children[1];
    assert_eq!(nobody.attributes, vec![("id".to_string(), "P0000008".to_string())]);

    let movies = Document::from_xml_str(&read(&dir, "movies.xml")).unwrap().root;
    let third = &movies.children[0];
    assert_eq!(third.attribute("directors"), Some("P0000007"));
    assert_eq!(third.attribute("oscars"), Some("O19940000007 O19940000000"));
    assert_eq!(third.child_text("tagline"), Some("Great"));
    assert!(movies.children[1].find("tagline").is_none());
    assert!(movies.children[2].find("tagline").is_none());

    let oscars = Document::from_xml_str(&read(&dir, "oscars.xml")).unwrap().root;
    assert_eq!(oscars.children.len(), 2);
    assert_eq!(oscars.children[0].attribute("person_id"), Some("P0000007"));
    assert_eq!(oscars.children[1].attribute("id"), Some("O19940000000"));
    assert_eq!(oscars.children[1].attribute("movie_id"), Some("M0000003"));
    assert_eq!(oscars.children[1].attribute("person_id"), None);
}

#[test]
fn test_sorted_relations() {
    let sql = format!(
        "{SCHEMA}
         INSERT INTO Movie (id, name) VALUES ('3', 'A'), ('5', 'B');
         INSERT INTO Person (id, name) VALUES ('7', 'D');
         INSERT INTO Director VALUES ('7', '5'), ('7', '3');"
    );

    let (dir, _) = export(&sql, RelationOrder::Storage);
    assert!(read(&dir, "people.xml").contains("directed=\"M5 M3\""));

    let (dir, _) = export(&sql, RelationOrder::Sorted);
    assert!(read(&dir, "people.xml").contains("directed=\"M3 M5\""));
}

#[test]
fn test_markup_in_values_survives() {
    let sql = format!(
        "{SCHEMA}
         INSERT INTO Movie (id, name) VALUES ('1', 'Tom & Jerry <Uncut>');"
    );
    let (dir, _) = export(&sql, RelationOrder::Storage);

    let movies = read(&dir, "movies.xml");
    assert!(movies.contains("<name>Tom &amp; Jerry &lt;Uncut&gt;</name>"));

    let doc = Document::from_xml_str(&movies).unwrap();
    assert_eq!(doc.root.children[0].child_text("name"), Some("Tom & Jerry <Uncut>"));
}

#[test]
fn test_formatting_is_stable() {
    let sql = format!(
        "{SCHEMA}
         INSERT INTO Movie (id, name, year, rating) VALUES ('1', 'Test', 1999, 'R');
         INSERT INTO Person (id, name, pob) VALUES ('1', 'Actor A', 'Boston');
         INSERT INTO Actor VALUES ('1', '1');
         INSERT INTO Oscar VALUES ('1', '1', 'BEST-ACTOR', 2000);"
    );
    let (_dir, paths) = export(&sql, RelationOrder::Storage);

    for path in paths {
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\"?>\n"));
        assert_eq!(Document::reformat(&written).unwrap(), written);
    }
}

#[test]
fn test_missing_table_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(
        dir.path(),
        "CREATE TABLE Movie (id TEXT, name TEXT);
         CREATE TABLE Person (id TEXT, name TEXT);
         INSERT INTO Movie VALUES ('1', 'Test');",
    );
    let out = dir.path().join("out");

    let db = MovieDatabase::open(&db_path).unwrap();
    let err = db.export_all(&out, RelationOrder::Storage, |_| {}).unwrap_err();
    db.close().unwrap();

    assert!(matches!(err, Error::MissingTables(ref missing) if missing == &["Oscar"]));
    assert!(!out.join("movies.xml").exists());
    assert!(!out.join("people.xml").exists());
}

#[test]
fn test_missing_pivot_column_keeps_earlier_files() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(
        dir.path(),
        "CREATE TABLE Movie (id TEXT, name TEXT);
         CREATE TABLE Person (id TEXT, name TEXT);
         CREATE TABLE Oscar (movie_id TEXT, person_id TEXT, type TEXT, year INTEGER);
         CREATE TABLE Director (person_id TEXT, movie_id TEXT);
         CREATE TABLE Actor (actor_id TEXT, movie_id TEXT);",
    );
    let out = dir.path().join("out");

    let db = MovieDatabase::open(&db_path).unwrap();
    let exporter = db.exporter(RelationOrder::Storage);

    let written = exporter.export(EntityKind::Award, &out, |_, _| {}).unwrap();
    assert_eq!(written.records, 0);

    let err = exporter.export(EntityKind::Movie, &out, |_, _| {}).unwrap_err();
    match err {
        Error::Export { kind, source } => {
            assert_eq!(kind, EntityKind::Movie);
            assert!(matches!(
                *source,
                Error::MissingColumn { ref table, ref column } if table == "Director" && column == "director_id"
            ));
        }
        other => panic!("expected export error, got {:?}", other),
    }
    assert!(out.join("oscars.xml").exists());
    assert!(!out.join("movies.xml").exists());
}

#[test]
fn test_overwrites_existing_file() {
    let sql = format!("{SCHEMA} INSERT INTO Movie (id, name) VALUES ('1', 'Test');");
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(dir.path(), &sql);
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("movies.xml"), "stale").unwrap();

    let db = MovieDatabase::open(&db_path).unwrap();
    db.export_all(&out, RelationOrder::Storage, |_| {}).unwrap();

    let movies = fs::read_to_string(out.join("movies.xml")).unwrap();
    assert!(movies.contains("<movie id=\"M1\">"));
}
