//! Error types for ormlet.

use thiserror::Error;

/// Why a schema failed validation at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorReason {
    MissingPrimaryKey,
    MultiplePrimaryKeys,
}

impl std::fmt::Display for SchemaErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaErrorReason::MissingPrimaryKey => write!(f, "no primary key field declared"),
            SchemaErrorReason::MultiplePrimaryKeys => {
                write!(f, "more than one primary key field declared")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum OrmletError {
    /// Schema declaration is invalid; the model cannot be used at all.
    #[error("schema error in model '{model}': {reason}")]
    Schema {
        model: String,
        reason: SchemaErrorReason,
    },

    /// A value failed nullability, type or length validation on assignment.
    #[error("field '{field}': {message}")]
    Field { field: String, message: String },

    /// The statement shape is invalid; raised before any SQL is executed.
    #[error("query error: {0}")]
    Query(String),

    /// The executor rejected the statement; the SQL text is preserved.
    #[error("database operation failed: {message} (sql: {sql})")]
    DbOperation { message: String, sql: String },

    #[error("object does not exist: {0}")]
    ObjectDoesNotExist(String),

    #[error("multiple objects returned: {0}")]
    MultipleObjects(String),

    #[error("model registration error: {0}")]
    ModelRegistration(String),
}

impl OrmletError {
    /// Create a schema error for the given model.
    pub fn schema(model: impl Into<String>, reason: SchemaErrorReason) -> Self {
        Self::Schema {
            model: model.into(),
            reason,
        }
    }

    /// Create a field validation error.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Wrap an executor failure, keeping the statement for diagnostics.
    pub fn db(message: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::DbOperation {
            message: message.into(),
            sql: sql.into(),
        }
    }
}

/// Result type alias for ormlet operations.
pub type OrmletResult<T> = Result<T, OrmletError>;
