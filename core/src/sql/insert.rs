//! INSERT generation.

use crate::error::{OrmletError, OrmletResult};
use crate::lookup::LookupOp;
use crate::schema::Schema;
use crate::state::QueryState;

use super::render_value;

/// Render the INSERT statement from the accumulated assignments. The
/// auto-generated primary key is excluded from the column list; the backend
/// supplies it.
pub fn build_insert(schema: &Schema, state: &QueryState) -> OrmletResult<String> {
    let mut columns: Vec<String> = Vec::with_capacity(state.inserts.len());
    let mut values: Vec<String> = Vec::with_capacity(state.inserts.len());

    for entry in &state.inserts {
        if schema
            .field(&entry.field)
            .is_some_and(|f| f.primary_key && f.auto)
        {
            continue;
        }
        columns.push(entry.field.clone());
        values.push(render_value(LookupOp::Exact, &entry.value));
    }

    if columns.is_empty() {
        return Err(OrmletError::query(format!(
            "INSERT into '{}' has no columns",
            schema.table
        )));
    }

    Ok(format!(
        "INSERT INTO {}({}) VALUES ({})",
        schema.table,
        columns.join(", "),
        values.join(", ")
    ))
}
