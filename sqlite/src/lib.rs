//! SQLite executor backend for ormlet.
//!
//! Wraps a `rusqlite` connection behind the core's [`Executor`] contract.
//! Referential integrity is enforced by turning `PRAGMA foreign_keys` on
//! for the connection, so the `ON DELETE` / `ON UPDATE` actions declared on
//! foreign keys actually fire. Every statement crossing the boundary is
//! logged at `debug` level before it reaches SQLite.

use ormlet_core::error::{OrmletError, OrmletResult};
use ormlet_core::executor::{Executor, Row};
use ormlet_core::value::Value;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;

pub struct SqliteExecutor {
    connection: Connection,
}

impl SqliteExecutor {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Fresh in-memory database; it lives as long as this executor.
    pub fn in_memory() -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> rusqlite::Result<Self> {
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn wrap(sql: &str, err: rusqlite::Error) -> OrmletError {
        OrmletError::db(err.to_string(), sql)
    }
}

fn value_from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Int(n),
        ValueRef::Real(n) => Value::Float(n),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        // Blobs are outside the value vocabulary
        ValueRef::Blob(_) => Value::Null,
    }
}

impl Executor for SqliteExecutor {
    fn fetch(&self, sql: &str) -> OrmletResult<Vec<Row>> {
        tracing::debug!(target: "ormlet_sqlite", sql, "fetch");
        let mut statement = self
            .connection
            .prepare(sql)
            .map_err(|e| Self::wrap(sql, e))?;
        let names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = statement.query([]).map_err(|e| Self::wrap(sql, e))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(|e| Self::wrap(sql, e))? {
            let mut mapped = Row::new();
            for (idx, name) in names.iter().enumerate() {
                let value = row.get_ref(idx).map_err(|e| Self::wrap(sql, e))?;
                mapped.push(name.clone(), value_from_sqlite(value));
            }
            result.push(mapped);
        }
        Ok(result)
    }

    fn execute(&self, sql: &str) -> OrmletResult<u64> {
        tracing::debug!(target: "ormlet_sqlite", sql, "execute");
        self.connection
            .execute(sql, [])
            .map(|count| count as u64)
            .map_err(|e| Self::wrap(sql, e))
    }

    fn insert(&self, sql: &str) -> OrmletResult<i64> {
        tracing::debug!(target: "ormlet_sqlite", sql, "insert");
        self.connection
            .execute(sql, [])
            .map_err(|e| Self::wrap(sql, e))?;
        Ok(self.connection.last_insert_rowid())
    }
}
