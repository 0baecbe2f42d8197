//! The database handle: registry plus executor.
//!
//! This is the root of every chain: `db.model("Book")?` hands out a fresh
//! `QuerySet` with its own state. The handle also resolves the two relation
//! accessors — following a stored foreign key forward, and reading a
//! reverse relation as a fresh filtered query.

use std::sync::Arc;

use crate::error::{OrmletError, OrmletResult};
use crate::executor::Executor;
use crate::queryset::QuerySet;
use crate::record::Record;
use crate::schema::{Registry, Schema};
use crate::value::Value;

pub struct Database<E: Executor> {
    executor: E,
    registry: Registry,
}

impl<E: Executor> Database<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            registry: Registry::new(),
        }
    }

    /// Register schemas in two phases: record them all, then wire every
    /// foreign key's reverse relation. Foreign-key targets must be part of
    /// some `register_models` call by the time the wiring runs.
    pub fn register_models(&mut self, schemas: Vec<Schema>) -> OrmletResult<()> {
        for schema in schemas {
            self.registry.insert(schema)?;
        }
        self.registry.wire_reverse_relations()
    }

    /// Root a fresh query chain at the named model.
    pub fn model(&self, name: &str) -> OrmletResult<QuerySet<'_, E>> {
        let schema = self.registry.get(name)?;
        Ok(QuerySet::new(self, schema))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Resolve a stored foreign-key value to the referenced instance.
    pub fn follow(&self, record: &Record, field: &str) -> OrmletResult<Record> {
        let schema = record.schema();
        let def = schema.field(field).ok_or_else(|| {
            OrmletError::query(format!("model '{}' has no field '{}'", schema.model, field))
        })?;
        let fk = def.foreign_key.as_ref().ok_or_else(|| {
            OrmletError::query(format!(
                "field '{}' of model '{}' is not a foreign key",
                field, schema.model
            ))
        })?;
        let key = record.get(field).cloned().unwrap_or(Value::Null);
        if key.is_null() {
            return Err(OrmletError::ObjectDoesNotExist(format!(
                "'{}' is not set on this {} instance",
                field, schema.model
            )));
        }
        let target = self.registry.get(&fk.references)?;
        let pk = target.primary_key().map(|f| f.name.clone()).ok_or_else(|| {
            OrmletError::query(format!("model '{}' has no primary key", target.model))
        })?;
        self.model(&fk.references)?.get(&[(pk.as_str(), key)])
    }

    /// Read a reverse relation: all rows of the owning model whose
    /// foreign-key column equals this instance's primary key, as a fresh
    /// lazily evaluated chain.
    pub fn reverse(&self, record: &Record, name: &str) -> OrmletResult<QuerySet<'_, E>> {
        let relation = self
            .registry
            .reverse(record.model(), name)
            .cloned()
            .ok_or_else(|| {
                OrmletError::ModelRegistration(format!(
                    "model '{}' has no reverse relation '{}'",
                    record.model(),
                    name
                ))
            })?;
        let key = record.pk();
        if key.is_null() {
            return Err(OrmletError::query(format!(
                "cannot read '{}' before this {} instance is saved",
                name,
                record.model()
            )));
        }
        self.model(&relation.origin)?.filter(&relation.fk_field, key)
    }

    /// Convenience for the common single-model case.
    pub fn schema(&self, name: &str) -> OrmletResult<Arc<Schema>> {
        self.registry.get(name)
    }
}
