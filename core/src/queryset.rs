//! The caller-facing fluent chain.
//!
//! One [`QueryState`] per root invocation: `filter` accumulates, every other
//! operation is terminal and consumes the builder, so a chain cannot
//! continue past the call that rendered and executed its SQL.

use std::sync::Arc;

use crate::database::Database;
use crate::error::{OrmletError, OrmletResult};
use crate::executor::{Executor, Row};
use crate::lookup::{parse_lookup, parse_selection, LookupOp};
use crate::record::Record;
use crate::schema::Schema;
use crate::sql;
use crate::state::{LookupEntry, QueryState, SelectField, PRIMARY_ALIAS};
use crate::value::Value;

pub struct QuerySet<'db, E: Executor> {
    db: &'db Database<E>,
    schema: Arc<Schema>,
    state: QueryState,
}

impl<'db, E: Executor> Clone for QuerySet<'db, E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db,
            schema: Arc::clone(&self.schema),
            state: self.state.clone(),
        }
    }
}

impl<'db, E: Executor> QuerySet<'db, E> {
    pub(crate) fn new(db: &'db Database<E>, schema: Arc<Schema>) -> Self {
        Self {
            db,
            schema,
            state: QueryState::new(),
        }
    }

    /// Append a WHERE lookup parsed from `key`, registering a join alias if
    /// the key traverses a foreign key. Chainable.
    pub fn filter(mut self, key: &str, value: impl Into<Value>) -> OrmletResult<Self> {
        let parsed = parse_lookup(key, value.into())?;
        let alias = self.bind_column(parsed.join.as_deref(), &parsed.field)?;
        self.state.push_filter(LookupEntry {
            alias,
            field: parsed.field,
            op: parsed.op,
            value: parsed.value,
        });
        Ok(self)
    }

    /// Terminal select with raw-value projection: each row comes back keyed
    /// by the unqualified field name. An empty field list behaves like
    /// `all()` without record mapping.
    pub fn values<I, S>(mut self, fields: I) -> OrmletResult<Vec<Row>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in fields {
            let selection = parse_selection(key.as_ref())?;
            let alias = self.bind_column(selection.join.as_deref(), &selection.field)?;
            self.state.push_select(SelectField {
                alias,
                field: selection.field.clone(),
                output: Some(selection.field),
            });
        }
        let statement = sql::build_select(&self.schema, self.db.registry(), &self.state)?;
        self.db.executor().fetch(&statement)
    }

    /// Terminal select-all; result rows are mapped back into records.
    pub fn all(self) -> OrmletResult<Vec<Record>> {
        let statement = sql::build_select(&self.schema, self.db.registry(), &self.state)?;
        let rows = self.db.executor().fetch(&statement)?;
        rows.iter()
            .map(|row| Record::from_row(Arc::clone(&self.schema), row))
            .collect()
    }

    /// Number of matching rows. Renders the same SELECT as `all()`.
    pub fn count(self) -> OrmletResult<usize> {
        let statement = sql::build_select(&self.schema, self.db.registry(), &self.state)?;
        Ok(self.db.executor().fetch(&statement)?.len())
    }

    /// Filter + select-all requiring exactly one result row.
    pub fn get(mut self, pairs: &[(&str, Value)]) -> OrmletResult<Record> {
        for (key, value) in pairs {
            self = self.filter(key, value.clone())?;
        }
        let statement = sql::build_select(&self.schema, self.db.registry(), &self.state)?;
        let rows = self.db.executor().fetch(&statement)?;
        match rows.as_slice() {
            [] => Err(OrmletError::ObjectDoesNotExist(format!(
                "no {} row matches the given lookups",
                self.schema.model
            ))),
            [row] => Record::from_row(Arc::clone(&self.schema), row),
            _ => Err(OrmletError::MultipleObjects(format!(
                "{} {} rows match the given lookups",
                rows.len(),
                self.schema.model
            ))),
        }
    }

    /// `get`, falling back to `create` with the same pairs as field values
    /// when no row matches.
    pub fn get_or_create(self, pairs: &[(&str, Value)]) -> OrmletResult<Record> {
        match self.clone().get(pairs) {
            Err(OrmletError::ObjectDoesNotExist(_)) => self.create(pairs),
            other => other,
        }
    }

    /// Insert one row and return it, re-fetched by its primary key. Values
    /// are validated against the schema before any SQL is rendered.
    pub fn create(mut self, pairs: &[(&str, Value)]) -> OrmletResult<Record> {
        for (key, value) in pairs {
            self.bind_assignment(key, value)?;
            self.state.push_insert(LookupEntry {
                alias: PRIMARY_ALIAS.to_string(),
                field: (*key).to_string(),
                op: LookupOp::Exact,
                value: value.clone(),
            });
        }
        let statement = sql::build_insert(&self.schema, &self.state)?;
        let generated = self.db.executor().insert(&statement)?;

        let pk_field = sql::primary_key_of(&self.schema)?;
        let key = pairs
            .iter()
            .find(|(name, _)| *name == pk_field)
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Int(generated));
        self.db
            .model(&self.schema.model)?
            .get(&[(pk_field.as_str(), key)])
    }

    /// Update the matching rows and return the affected-row count. Rejected
    /// with a query error when the chain filtered through a join.
    pub fn update(mut self, pairs: &[(&str, Value)]) -> OrmletResult<u64> {
        for (key, value) in pairs {
            self.bind_assignment(key, value)?;
            self.state.push_update(LookupEntry {
                alias: PRIMARY_ALIAS.to_string(),
                field: (*key).to_string(),
                op: LookupOp::Exact,
                value: value.clone(),
            });
        }
        let statement = sql::build_update(&self.schema, &self.state)?;
        self.db.executor().execute(&statement)
    }

    /// Delete the matching rows and return the affected-row count.
    pub fn delete(self) -> OrmletResult<u64> {
        let statement = sql::build_delete(&self.schema, self.db.registry(), &self.state)?;
        self.db.executor().execute(&statement)
    }

    /// Persist an instance: null primary key inserts, anything else updates
    /// the row in place and re-fetches it.
    pub fn save(self, record: &Record) -> OrmletResult<Record> {
        let db = self.db;
        let model = self.schema.model.clone();
        let pk_field = sql::primary_key_of(&self.schema)?;
        let pairs: Vec<(&str, Value)> = record
            .fields()
            .filter(|(name, _)| *name != pk_field)
            .map(|(name, value)| (name, value.clone()))
            .collect();

        match record.pk() {
            Value::Null => self.create(&pairs),
            key => {
                self.filter(&pk_field, key.clone())?.update(&pairs)?;
                db.model(&model)?.get(&[(pk_field.as_str(), key)])
            }
        }
    }

    pub fn create_table(self) -> OrmletResult<()> {
        let statement = sql::build_create_table(&self.schema, self.db.registry())?;
        self.db.executor().execute(&statement)?;
        Ok(())
    }

    pub fn drop_table(self) -> OrmletResult<()> {
        let statement = sql::build_drop_table(&self.schema);
        self.db.executor().execute(&statement)?;
        Ok(())
    }

    /// Resolve a column reference to its table alias, registering the join
    /// on first mention. Unknown fields and joins through non-foreign-key
    /// fields are query errors, raised before any SQL exists.
    fn bind_column(&mut self, join: Option<&str>, field: &str) -> OrmletResult<String> {
        match join {
            None => {
                if self.schema.field(field).is_none() {
                    return Err(OrmletError::query(format!(
                        "model '{}' has no field '{}'",
                        self.schema.model, field
                    )));
                }
                Ok(PRIMARY_ALIAS.to_string())
            }
            Some(join_field) => {
                let via = self.schema.field(join_field).ok_or_else(|| {
                    OrmletError::query(format!(
                        "model '{}' has no field '{}'",
                        self.schema.model, join_field
                    ))
                })?;
                let fk = via.foreign_key.as_ref().ok_or_else(|| {
                    OrmletError::query(format!(
                        "field '{}' of model '{}' is not a foreign key",
                        join_field, self.schema.model
                    ))
                })?;
                let target = self.db.registry().get(&fk.references)?;
                if target.field(field).is_none() {
                    return Err(OrmletError::query(format!(
                        "model '{}' has no field '{}'",
                        target.model, field
                    )));
                }
                Ok(self.state.register(join_field))
            }
        }
    }

    /// INSERT/UPDATE keys are plain column names on the primary table.
    fn bind_assignment(&self, key: &str, value: &Value) -> OrmletResult<()> {
        let field = self.schema.field(key).ok_or_else(|| {
            OrmletError::query(format!(
                "model '{}' has no column '{}'",
                self.schema.model, key
            ))
        })?;
        field.check_type(value)
    }
}
