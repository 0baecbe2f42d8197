//! Model registry and reverse-relation wiring.
//!
//! Registration is two-phase: every schema is inserted first, then
//! [`Registry::wire_reverse_relations`] walks all foreign keys and installs
//! one reverse accessor per edge on the referenced model. Running the wiring
//! again after registering more models is allowed; re-installing an identical
//! edge is a no-op, a conflicting one is an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{OrmletError, OrmletResult};
use crate::schema::Schema;

/// A reverse relation installed on a referenced model: "rows of `origin`
/// whose `fk_field` column equals this instance's primary key".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseRelation {
    pub origin: String,
    pub fk_field: String,
}

#[derive(Debug, Default)]
pub struct Registry {
    schemas: BTreeMap<String, Arc<Schema>>,
    /// target model -> reverse name -> relation
    reverses: BTreeMap<String, BTreeMap<String, ReverseRelation>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema: Schema) -> OrmletResult<Arc<Schema>> {
        if schema.abstract_base {
            return Err(OrmletError::ModelRegistration(format!(
                "abstract model '{}' cannot be registered",
                schema.model
            )));
        }
        if self.schemas.contains_key(&schema.model) {
            return Err(OrmletError::ModelRegistration(format!(
                "model '{}' is already registered",
                schema.model
            )));
        }
        let schema = Arc::new(schema);
        self.schemas.insert(schema.model.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, model: &str) -> OrmletResult<Arc<Schema>> {
        self.schemas.get(model).cloned().ok_or_else(|| {
            OrmletError::ModelRegistration(format!("model '{}' is not registered", model))
        })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.schemas.contains_key(model)
    }

    pub fn models(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    /// Install reverse relations for every foreign key of every registered
    /// schema. Each edge must resolve to a registered target.
    pub fn wire_reverse_relations(&mut self) -> OrmletResult<()> {
        let mut edges: Vec<(String, String, ReverseRelation)> = Vec::new();
        for schema in self.schemas.values() {
            for field in schema.foreign_keys() {
                let Some(fk) = &field.foreign_key else {
                    continue;
                };
                if !self.schemas.contains_key(&fk.references) {
                    return Err(OrmletError::ModelRegistration(format!(
                        "model '{}' field '{}' references unregistered model '{}'",
                        schema.model, field.name, fk.references
                    )));
                }
                edges.push((
                    fk.references.clone(),
                    fk.reverse_name.clone(),
                    ReverseRelation {
                        origin: schema.model.clone(),
                        fk_field: field.name.clone(),
                    },
                ));
            }
        }

        for (target, name, relation) in edges {
            let installed = self.reverses.entry(target.clone()).or_default();
            match installed.get(&name) {
                Some(existing) if *existing == relation => {}
                Some(_) => {
                    return Err(OrmletError::ModelRegistration(format!(
                        "reverse relation '{}' on model '{}' is declared twice",
                        name, target
                    )));
                }
                None => {
                    installed.insert(name, relation);
                }
            }
        }
        Ok(())
    }

    pub fn reverse(&self, model: &str, name: &str) -> Option<&ReverseRelation> {
        self.reverses.get(model)?.get(name)
    }
}
