//! Row instances bound to a schema.
//!
//! A `Record` stores one value per schema field, in field order. Assignment
//! goes through a single validated path; a foreign-key value arrives here
//! already reduced to the referenced row's primary key (see the `From`
//! conversion at the bottom).

use std::sync::Arc;

use crate::error::{OrmletError, OrmletResult};
use crate::executor::Row;
use crate::schema::{FieldType, Schema};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Record {
    /// Fresh instance with every field set to its default (or null),
    /// validated field by field.
    pub fn new(schema: Arc<Schema>) -> OrmletResult<Self> {
        let mut values = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            values.push(field.validate_assign(Value::Null)?);
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn model(&self) -> &str {
        &self.schema.model
    }

    /// Validated assignment. Nullability, type and length rules apply; null
    /// falls back to the field default.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> OrmletResult<()> {
        let idx = self
            .schema
            .fields
            .iter()
            .position(|f| f.name == field)
            .ok_or_else(|| {
                OrmletError::query(format!(
                    "model '{}' has no field '{}'",
                    self.schema.model, field
                ))
            })?;
        self.values[idx] = self.schema.fields[idx].validate_assign(value.into())?;
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        let idx = self.schema.fields.iter().position(|f| f.name == field)?;
        Some(&self.values[idx])
    }

    /// Primary-key value, null while unsaved.
    pub fn pk(&self) -> Value {
        self.schema
            .primary_key()
            .and_then(|pk| self.get(&pk.name).cloned())
            .unwrap_or(Value::Null)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    /// Map an executor row back into a record. Values are matched by column
    /// name; SQLite hands booleans back as integers, so `0`/`1` coerce for
    /// boolean fields. Columns the schema does not know are ignored, missing
    /// columns stay null.
    pub fn from_row(schema: Arc<Schema>, row: &Row) -> OrmletResult<Self> {
        let mut values = vec![Value::Null; schema.fields.len()];
        for (idx, field) in schema.fields.iter().enumerate() {
            let Some(value) = row.get(&field.name) else {
                continue;
            };
            values[idx] = match (&field.ty, value) {
                (FieldType::Boolean, Value::Int(n)) => Value::Bool(*n != 0),
                _ => value.clone(),
            };
        }
        Ok(Self { schema, values })
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields()
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Reduce an instance used as a filter or assignment value to its
/// primary-key literal.
impl From<&Record> for Value {
    fn from(record: &Record) -> Self {
        record.pk()
    }
}
