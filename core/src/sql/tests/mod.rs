//! Renderer tests. These assert byte-exact SQL text.

mod ddl;

use std::sync::Arc;

use crate::lookup::LookupOp;
use crate::schema::{FieldDef, ReferentialAction, Registry, Schema};
use crate::state::LookupEntry;
use crate::value::Value;

/// Author/Book fixture shared by the renderer tests.
pub(crate) fn library() -> (Registry, Arc<Schema>, Arc<Schema>) {
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
        .field("title", FieldDef::text().max_length(250))
        .field("pages", FieldDef::integer().default_value(100))
        .build()
        .unwrap();

    let mut registry = Registry::new();
    let author = registry.insert(author).unwrap();
    let book = registry.insert(book).unwrap();
    registry.wire_reverse_relations().unwrap();
    (registry, author, book)
}

pub(crate) fn entry(alias: &str, field: &str, op: LookupOp, value: Value) -> LookupEntry {
    LookupEntry {
        alias: alias.to_string(),
        field: field.to_string(),
        op,
        value,
    }
}
