//! Schema-driven query compiler.
//!
//! Declare record schemas, chain filters, get SQL — the executor stays at
//! the boundary.
//!
//! ```ignore
//! use ormlet_core::prelude::*;
//!
//! let author = Schema::builder("Author")
//!     .field("id", FieldDef::auto())
//!     .field("name", FieldDef::text())
//!     .build()?;
//!
//! let mut db = Database::new(executor);
//! db.register_models(vec![author])?;
//! let rows = db.model("Author")?.filter("name__contains", "Gibson")?.all()?;
//! ```

pub mod database;
pub mod error;
pub mod executor;
pub mod lookup;
pub mod queryset;
pub mod record;
pub mod schema;
pub mod sql;
pub mod state;
pub mod value;

pub use database::Database;
pub use error::{OrmletError, OrmletResult};
pub use value::Value;

pub mod prelude {
    pub use crate::database::Database;
    pub use crate::error::{OrmletError, OrmletResult};
    pub use crate::executor::{Executor, Row};
    pub use crate::queryset::QuerySet;
    pub use crate::record::Record;
    pub use crate::schema::{FieldDef, ReferentialAction, Schema};
    pub use crate::value::Value;
}
