use pretty_assertions::assert_eq;

use super::library;
use crate::schema::{FieldDef, Schema};
use crate::sql::{build_create_table, build_drop_table};

#[test]
fn test_create_table_renders_one_clause_per_field() {
    let (registry, author, _) = library();
    assert_eq!(
        build_create_table(&author, &registry).unwrap(),
        "CREATE TABLE IF NOT EXISTS author (id INTEGER PRIMARY KEY AUTOINCREMENT, name VARCHAR(128))"
    );
}

#[test]
fn test_create_table_appends_foreign_key_clauses_after_columns() {
    let (registry, _, book) = library();
    assert_eq!(
        build_create_table(&book, &registry).unwrap(),
        "CREATE TABLE IF NOT EXISTS book (\
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         author INTEGER, \
         title VARCHAR(250), \
         pages INTEGER DEFAULT 100, \
         FOREIGN KEY (author) REFERENCES author(id) ON DELETE CASCADE ON UPDATE NO ACTION)"
    );
}

#[test]
fn test_create_table_is_stable_across_repeated_calls() {
    let (registry, _, book) = library();
    let first = build_create_table(&book, &registry).unwrap();
    let second = build_create_table(&book, &registry).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_not_null_and_default_rendering() {
    let registry = {
        let (registry, _, _) = library();
        registry
    };
    let schema = Schema::builder("Setting")
        .field("id", FieldDef::auto())
        .field(
            "label",
            FieldDef::text().nullable(false).default_value("none"),
        )
        .field("enabled", FieldDef::boolean().default_value(true))
        .build()
        .unwrap();

    assert_eq!(
        build_create_table(&schema, &registry).unwrap(),
        "CREATE TABLE IF NOT EXISTS setting (\
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         label VARCHAR(128) NOT NULL DEFAULT 'none', \
         enabled BOOLEAN DEFAULT 1)"
    );
}

#[test]
fn test_drop_table() {
    let (_, _, book) = library();
    assert_eq!(build_drop_table(&book), "DROP TABLE book");
}
