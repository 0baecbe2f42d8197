//! End-to-end tests: the compiler driving a real SQLite database.

use ormlet_core::prelude::*;
use ormlet_sqlite::SqliteExecutor;
use pretty_assertions::assert_eq;

fn library() -> Database<SqliteExecutor> {
    let author = Schema::builder("Author")
        .field("id", FieldDef::auto())
        .field("name", FieldDef::text())
        .build()
        .unwrap();
    let book = Schema::builder("Book")
        .field("id", FieldDef::auto())
        .field(
            "author",
            FieldDef::foreign_key("Author", "books").on_delete(ReferentialAction::Cascade),
        )
        .field("title", FieldDef::text())
        .field("pages", FieldDef::integer().default_value(100))
        .build()
        .unwrap();

    let mut db = Database::new(SqliteExecutor::in_memory().unwrap());
    db.register_models(vec![author, book]).unwrap();
    db.model("Author").unwrap().create_table().unwrap();
    db.model("Book").unwrap().create_table().unwrap();
    db
}

fn gibson_library() -> (Database<SqliteExecutor>, Record, Record) {
    let db = library();
    let author = db
        .model("Author")
        .unwrap()
        .create(&[("name", Value::from("William Gibson"))])
        .unwrap();
    let book = db
        .model("Book")
        .unwrap()
        .create(&[
            ("author", Value::from(&author)),
            ("title", Value::from("Title")),
            ("pages", Value::Int(100)),
        ])
        .unwrap();
    (db, author, book)
}

#[test]
fn test_values_resolves_the_join_under_unqualified_names() {
    let (db, _, _) = gibson_library();

    let rows = db
        .model("Book")
        .unwrap()
        .filter("pages__gt", 10)
        .unwrap()
        .values(["title", "author__name"])
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("title"), Some(&Value::Text("Title".into())));
    assert_eq!(
        rows[0].get("name"),
        Some(&Value::Text("William Gibson".into()))
    );
}

#[test]
fn test_contains_filter_through_the_join() {
    let (db, _, book) = gibson_library();

    let matches = db
        .model("Book")
        .unwrap()
        .filter("author__name__contains", "Gibson")
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pk(), book.pk());

    let misses = db
        .model("Book")
        .unwrap()
        .filter("author__name__contains", "Sterling")
        .unwrap()
        .count()
        .unwrap();
    assert_eq!(misses, 0);
}

#[test]
fn test_create_applies_database_defaults() {
    let (db, author, _) = gibson_library();

    let book = db
        .model("Book")
        .unwrap()
        .create(&[
            ("author", Value::from(&author)),
            ("title", Value::from("Burning Chrome")),
        ])
        .unwrap();
    assert_eq!(book.get("pages"), Some(&Value::Int(100)));
}

#[test]
fn test_cascade_delete_removes_referencing_rows() {
    let (db, author, _) = gibson_library();

    let removed = db
        .model("Author")
        .unwrap()
        .filter("id", author.pk())
        .unwrap()
        .delete()
        .unwrap();
    assert_eq!(removed, 1);

    let left = db.model("Book").unwrap().count().unwrap();
    assert_eq!(left, 0);
}

#[test]
fn test_delete_through_a_join_only_hits_matching_rows() {
    let (db, _, _) = gibson_library();
    let sterling = db
        .model("Author")
        .unwrap()
        .create(&[("name", Value::from("Bruce Sterling"))])
        .unwrap();
    db.model("Book")
        .unwrap()
        .create(&[
            ("author", Value::from(&sterling)),
            ("title", Value::from("Islands in the Net")),
        ])
        .unwrap();

    let removed = db
        .model("Book")
        .unwrap()
        .filter("author__name__contains", "Gibson")
        .unwrap()
        .delete()
        .unwrap();
    assert_eq!(removed, 1);

    let titles = db.model("Book").unwrap().values(["title"]).unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(
        titles[0].get("title"),
        Some(&Value::Text("Islands in the Net".into()))
    );
}

#[test]
fn test_update_is_limited_to_the_primary_table() {
    let (db, _, book) = gibson_library();

    let touched = db
        .model("Book")
        .unwrap()
        .filter("title", "Title")
        .unwrap()
        .update(&[("pages", Value::Int(200))])
        .unwrap();
    assert_eq!(touched, 1);

    let reloaded = db
        .model("Book")
        .unwrap()
        .get(&[("id", book.pk())])
        .unwrap();
    assert_eq!(reloaded.get("pages"), Some(&Value::Int(200)));

    let err = db
        .model("Book")
        .unwrap()
        .filter("author__name", "William Gibson")
        .unwrap()
        .update(&[("pages", Value::Int(1))]);
    assert!(matches!(err, Err(OrmletError::Query(_))));
}

#[test]
fn test_get_cardinality() {
    let (db, author, _) = gibson_library();
    db.model("Book")
        .unwrap()
        .create(&[
            ("author", Value::from(&author)),
            ("title", Value::from("Count Zero")),
        ])
        .unwrap();

    let err = db
        .model("Book")
        .unwrap()
        .get(&[("title", Value::from("Mona Lisa Overdrive"))]);
    assert!(matches!(err, Err(OrmletError::ObjectDoesNotExist(_))));

    let err = db
        .model("Book")
        .unwrap()
        .get(&[("author", Value::from(&author))]);
    assert!(matches!(err, Err(OrmletError::MultipleObjects(_))));
}

#[test]
fn test_get_or_create_only_inserts_once() {
    let db = library();

    let first = db
        .model("Author")
        .unwrap()
        .get_or_create(&[("name", Value::from("William Gibson"))])
        .unwrap();
    let second = db
        .model("Author")
        .unwrap()
        .get_or_create(&[("name", Value::from("William Gibson"))])
        .unwrap();

    assert_eq!(first.pk(), second.pk());
    assert_eq!(db.model("Author").unwrap().count().unwrap(), 1);
}

#[test]
fn test_reverse_relation_and_follow() {
    let (db, author, book) = gibson_library();

    let books = db.reverse(&author, "books").unwrap().all().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].pk(), book.pk());

    let followed = db.follow(&book, "author").unwrap();
    assert_eq!(
        followed.get("name"),
        Some(&Value::Text("William Gibson".into()))
    );
}

#[test]
fn test_save_round_trip() {
    let (db, _, book) = gibson_library();

    let mut book = book;
    book.set("pages", 321).unwrap();
    let saved = db.model("Book").unwrap().save(&book).unwrap();
    assert_eq!(saved.pk(), book.pk());
    assert_eq!(saved.get("pages"), Some(&Value::Int(321)));
}

#[test]
fn test_executor_failures_surface_with_the_statement() {
    let db = library();
    db.model("Book").unwrap().drop_table().unwrap();

    let err = db.model("Book").unwrap().all().unwrap_err();
    match err {
        OrmletError::DbOperation { sql, .. } => {
            assert_eq!(sql, "SELECT t0.* FROM book AS t0");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_boolean_round_trip() {
    let reader = Schema::builder("Reader")
        .field("id", FieldDef::auto())
        .field("name", FieldDef::text())
        .field("active", FieldDef::boolean().default_value(true))
        .build()
        .unwrap();

    let mut db = Database::new(SqliteExecutor::in_memory().unwrap());
    db.register_models(vec![reader]).unwrap();
    db.model("Reader").unwrap().create_table().unwrap();

    let reader = db
        .model("Reader")
        .unwrap()
        .create(&[("name", Value::from("Case")), ("active", Value::Bool(false))])
        .unwrap();
    assert_eq!(reader.get("active"), Some(&Value::Bool(false)));

    let defaulted = db
        .model("Reader")
        .unwrap()
        .create(&[("name", Value::from("Molly"))])
        .unwrap();
    assert_eq!(defaulted.get("active"), Some(&Value::Bool(true)));
}
