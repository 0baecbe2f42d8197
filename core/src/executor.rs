//! Executor boundary: the single synchronous contract per statement.
//!
//! The core never opens connections or performs I/O; a backend implements
//! [`Executor`] and everything above it stays pure. Failures must be wrapped
//! as [`OrmletError::DbOperation`](crate::error::OrmletError) with the
//! offending SQL preserved.

use crate::error::OrmletResult;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One result row: ordered column-name/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.columns.push((name.into(), value));
    }

    /// First value under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Executes literal SQL text on behalf of the query builder.
///
/// One synchronous call per statement; no pipelining, no retries. The
/// backend is responsible for enforcing the referential-integrity behavior
/// declared on foreign keys.
pub trait Executor {
    /// Run a statement that yields rows.
    fn fetch(&self, sql: &str) -> OrmletResult<Vec<Row>>;

    /// Run a statement and return the affected-row count.
    fn execute(&self, sql: &str) -> OrmletResult<u64>;

    /// Run an INSERT and return the generated primary key.
    fn insert(&self, sql: &str) -> OrmletResult<i64>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_and_json() {
        let mut row = Row::new();
        row.push("title", Value::from("Title"));
        row.push("pages", Value::Int(100));

        assert_eq!(row.get("title"), Some(&Value::Text("Title".into())));
        assert_eq!(row.get("missing"), None);
        // serde_json orders object keys lexicographically
        assert_eq!(
            row.to_json().to_string(),
            r#"{"pages":100,"title":"Title"}"#
        );
    }
}
