//! UPDATE generation.

use crate::error::{OrmletError, OrmletResult};
use crate::lookup::LookupOp;
use crate::schema::Schema;
use crate::state::QueryState;

use super::{render_value, where_clause};

/// Render the UPDATE statement. Updates may only touch the primary table's
/// own columns, so a chain that registered a join alias is rejected before
/// any SQL is produced. The primary-key column is silently dropped from the
/// SET list.
pub fn build_update(schema: &Schema, state: &QueryState) -> OrmletResult<String> {
    if state.has_joins() {
        return Err(OrmletError::query(
            "UPDATE can only set columns of the primary table",
        ));
    }

    let pk_name = schema.primary_key().map(|f| f.name.clone());
    let assignments: Vec<String> = state
        .updates
        .iter()
        .filter(|entry| pk_name.as_deref() != Some(entry.field.as_str()))
        .map(|entry| {
            format!(
                "{} = {}",
                entry.field,
                render_value(LookupOp::Exact, &entry.value)
            )
        })
        .collect();

    if assignments.is_empty() {
        return Err(OrmletError::query(format!(
            "UPDATE of '{}' has no assignments",
            schema.table
        )));
    }

    let mut sql = format!("UPDATE {} SET {}", schema.table, assignments.join(", "));
    if let Some(filters) = where_clause(state, true) {
        sql.push_str(&format!(" WHERE {}", filters));
    }
    Ok(sql)
}
