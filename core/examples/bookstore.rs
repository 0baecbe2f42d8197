//! Prints the SQL a small Author/Book schema compiles to.

use ormlet_core::prelude::*;
use ormlet_core::schema::ReferentialAction;

struct PrintExecutor;

impl Executor for PrintExecutor {
    fn fetch(&self, sql: &str) -> OrmletResult<Vec<Row>> {
        println!("{sql};");
        Ok(vec![])
    }

    fn execute(&self, sql: &str) -> OrmletResult<u64> {
        println!("{sql};");
        Ok(0)
    }

    fn insert(&self, sql: &str) -> OrmletResult<i64> {
        println!("{sql};");
        Ok(1)
    }
}

fn main() -> OrmletResult<()> {
    let author = Schema::builder("Author")
        .field("id", FieldDef::auto())
        .field("name", FieldDef::text())
        .build()?;
    let book = Schema::builder("Book")
        .field("id", FieldDef::auto())
        .field(
            "author",
            FieldDef::foreign_key("Author", "books").on_delete(ReferentialAction::Cascade),
        )
        .field("title", FieldDef::text())
        .field("pages", FieldDef::integer().default_value(100))
        .build()?;

    let mut db = Database::new(PrintExecutor);
    db.register_models(vec![author, book])?;

    db.model("Author")?.create_table()?;
    db.model("Book")?.create_table()?;

    db.model("Book")?.filter("pages__gt", 10)?.all()?;
    db.model("Book")?
        .filter("author__name__contains", "Gibson")?
        .values(["title", "author__name"])?;
    db.model("Book")?
        .filter("author__name", "William Gibson")?
        .delete()?;

    Ok(())
}
