//! Record schemas: field descriptors, the schema builder and validation.
//!
//! Schemas are built explicitly in two steps: declare fields on a
//! [`SchemaBuilder`], then `build()` validates the merged field set and
//! backfills every field's `name` with the name it was declared under.

mod registry;

pub use registry::{Registry, ReverseRelation};

use crate::error::{OrmletError, OrmletResult, SchemaErrorReason};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Referential action for foreign-key constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    #[default]
    NoAction,
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferentialAction::Cascade => write!(f, "CASCADE"),
            ReferentialAction::Restrict => write!(f, "RESTRICT"),
            ReferentialAction::SetNull => write!(f, "SET NULL"),
            ReferentialAction::NoAction => write!(f, "NO ACTION"),
        }
    }
}

/// Column type. The closed vocabulary used for both runtime validation and
/// SQL type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text { max_length: u16 },
    Integer,
    Boolean,
}

impl FieldType {
    /// SQL type name for CREATE TABLE.
    pub fn sql_type(&self) -> String {
        match self {
            FieldType::Text { max_length } => format!("VARCHAR({})", max_length),
            FieldType::Integer => "INTEGER".to_string(),
            FieldType::Boolean => "BOOLEAN".to_string(),
        }
    }

    /// Short name for validation messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text { .. } => "TEXT",
            FieldType::Integer => "INTEGER",
            FieldType::Boolean => "BOOLEAN",
        }
    }
}

/// Foreign-key edge attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Name of the referenced model.
    pub references: String,
    /// Name of the reverse relation installed on the referenced model.
    pub reverse_name: String,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

/// One column of a record schema.
///
/// `name` is backfilled by [`SchemaBuilder::build`] with the name the field
/// was declared under; declarers never set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    pub nullable: bool,
    pub default: Option<Value>,
    pub primary_key: bool,
    /// Auto-generated integer key; implies `primary_key`.
    pub auto: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl FieldDef {
    fn base(ty: FieldType) -> Self {
        Self {
            name: String::new(),
            ty,
            nullable: true,
            default: None,
            primary_key: false,
            auto: false,
            foreign_key: None,
        }
    }

    /// Sized text column, 128 characters unless overridden.
    pub fn text() -> Self {
        Self::base(FieldType::Text { max_length: 128 })
    }

    pub fn integer() -> Self {
        Self::base(FieldType::Integer)
    }

    pub fn boolean() -> Self {
        Self::base(FieldType::Boolean)
    }

    /// Auto-generated integer primary key.
    pub fn auto() -> Self {
        let mut field = Self::base(FieldType::Integer);
        field.primary_key = true;
        field.auto = true;
        field
    }

    /// Foreign key to `model`, installing `reverse_name` on the target.
    /// Stored as the referenced row's integer primary key.
    pub fn foreign_key(model: impl Into<String>, reverse_name: impl Into<String>) -> Self {
        let mut field = Self::base(FieldType::Integer);
        field.foreign_key = Some(ForeignKey {
            references: model.into(),
            reverse_name: reverse_name.into(),
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
        });
        field
    }

    pub fn max_length(mut self, n: u16) -> Self {
        if let FieldType::Text { .. } = self.ty {
            self.ty = FieldType::Text { max_length: n };
        }
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        if let Some(fk) = &mut self.foreign_key {
            fk.on_delete = action;
        }
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        if let Some(fk) = &mut self.foreign_key {
            fk.on_update = action;
        }
        self
    }

    /// Type and length validation for a value bound to this field.
    pub fn check_type(&self, value: &Value) -> OrmletResult<()> {
        match (&self.ty, value) {
            (_, Value::Null) => Ok(()),
            (FieldType::Text { max_length }, Value::Text(s)) => {
                if s.chars().count() > *max_length as usize {
                    Err(OrmletError::field(
                        &self.name,
                        format!("value exceeds max length {}", max_length),
                    ))
                } else {
                    Ok(())
                }
            }
            (FieldType::Integer, Value::Int(_)) => Ok(()),
            (FieldType::Boolean, Value::Bool(_)) => Ok(()),
            _ => Err(OrmletError::field(
                &self.name,
                format!("expected {} value, got {}", self.ty.name(), value.kind()),
            )),
        }
    }

    /// Full assignment validation: the non-nullable/no-default declaration
    /// error surfaces here, on every assignment; null falls back to the
    /// default. Returns the value to store.
    pub fn validate_assign(&self, value: Value) -> OrmletResult<Value> {
        if !self.nullable && self.default.is_none() && !self.auto {
            return Err(OrmletError::field(
                &self.name,
                "set a default value for the non-nullable field",
            ));
        }
        let value = if value.is_null() {
            self.default.clone().unwrap_or(Value::Null)
        } else {
            value
        };
        self.check_type(&value)?;
        Ok(value)
    }
}

/// An immutable record schema: ordered fields, table name, one primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub model: String,
    pub table: String,
    /// Declaration order, inherited fields first.
    pub fields: Vec<FieldDef>,
    /// Abstract bases carry no primary key and cannot be registered.
    pub abstract_base: bool,
}

impl Schema {
    pub fn builder(model: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            model: model.into(),
            table: None,
            base: None,
            fields: Vec::new(),
            abstract_base: false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_key(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.primary_key)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.foreign_key.is_some())
    }
}

/// Two-phase schema construction: declare, then validate and backfill.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    model: String,
    table: Option<String>,
    base: Option<Schema>,
    fields: Vec<(String, FieldDef)>,
    abstract_base: bool,
}

impl SchemaBuilder {
    /// Explicit table name; defaults to the lowercased model name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Single inheritance: start from the base's field map. A field declared
    /// here under an inherited name replaces it in place.
    pub fn extends(mut self, base: &Schema) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Exempt this schema from the primary-key rule. Abstract bases only
    /// exist to be extended.
    pub fn abstract_base(mut self) -> Self {
        self.abstract_base = true;
        self
    }

    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    pub fn build(self) -> OrmletResult<Schema> {
        let mut fields: Vec<FieldDef> = self
            .base
            .as_ref()
            .map(|b| b.fields.clone())
            .unwrap_or_default();

        for (name, mut def) in self.fields {
            def.name = name;
            match fields.iter().position(|f| f.name == def.name) {
                Some(pos) => fields[pos] = def,
                None => fields.push(def),
            }
        }

        if !self.abstract_base {
            let pk_count = fields.iter().filter(|f| f.primary_key).count();
            if pk_count == 0 {
                return Err(OrmletError::schema(
                    &self.model,
                    SchemaErrorReason::MissingPrimaryKey,
                ));
            }
            if pk_count > 1 {
                return Err(OrmletError::schema(
                    &self.model,
                    SchemaErrorReason::MultiplePrimaryKeys,
                ));
            }
        }

        let table = self.table.unwrap_or_else(|| self.model.to_lowercase());

        Ok(Schema {
            model: self.model,
            table,
            fields,
            abstract_base: self.abstract_base,
        })
    }
}
