//! SQL rendering: pure functions from schema + query state to statement text.
//!
//! Stateless by construction; every function takes the schema (and, where
//! joins or foreign keys must be resolved, the registry) plus the chain's
//! [`QueryState`](crate::state::QueryState) and returns the literal SQL.

mod ddl;
mod delete;
mod insert;
mod select;
mod update;

pub use ddl::{build_create_table, build_drop_table};
pub use delete::build_delete;
pub use insert::build_insert;
pub use select::build_select;
pub use update::build_update;

#[cfg(test)]
mod tests;

use crate::error::{OrmletError, OrmletResult};
use crate::lookup::LookupOp;
use crate::schema::{Registry, Schema};
use crate::state::QueryState;
use crate::value::{quote_text, Value};

/// Normalize a lookup operand into its SQL literal. Single source of truth
/// for INSERT, UPDATE and WHERE rendering.
pub(crate) fn render_value(op: LookupOp, value: &Value) -> String {
    match op {
        LookupOp::Contains => match value {
            Value::Text(s) => quote_text(&format!("%{}%", s)),
            other => format!("'%{}%'", other),
        },
        LookupOp::In => match value {
            Value::List(_) => value.to_string(),
            single => format!("({})", single),
        },
        _ => value.to_string(),
    }
}

/// Render the accumulated WHERE lookups, ANDed in insertion order, or `None`
/// when no filters were applied. `strip_alias` drops the table qualifier for
/// statements whose dialect form has no alias in scope (UPDATE, direct
/// DELETE).
pub(crate) fn where_clause(state: &QueryState, strip_alias: bool) -> Option<String> {
    if state.filters.is_empty() {
        return None;
    }
    let rendered: Vec<String> = state
        .filters
        .iter()
        .map(|lookup| {
            let column = if strip_alias {
                lookup.field.clone()
            } else {
                format!("{}.{}", lookup.alias, lookup.field)
            };
            format!(
                "{} {} {}",
                column,
                lookup.op.sql_symbol(),
                render_value(lookup.op, &lookup.value)
            )
        })
        .collect();
    Some(rendered.join(" AND "))
}

/// Render `<table> AS t0` plus one LEFT JOIN per registered join path, in
/// registration order.
pub(crate) fn from_clause(
    schema: &Schema,
    registry: &Registry,
    state: &QueryState,
) -> OrmletResult<String> {
    let mut sql = format!("{} AS {}", schema.table, crate::state::PRIMARY_ALIAS);
    for join in state.joined_relations() {
        let field_name = join.field.as_deref().unwrap_or_default();
        let field = schema.field(field_name).ok_or_else(|| {
            OrmletError::query(format!(
                "model '{}' has no field '{}'",
                schema.model, field_name
            ))
        })?;
        let fk = field.foreign_key.as_ref().ok_or_else(|| {
            OrmletError::query(format!(
                "field '{}' of model '{}' is not a foreign key",
                field_name, schema.model
            ))
        })?;
        let target = registry.get(&fk.references)?;
        let target_pk = primary_key_of(&target)?;
        sql.push_str(&format!(
            " LEFT JOIN {} AS {} ON {}.{} = {}.{}",
            target.table,
            join.alias,
            crate::state::PRIMARY_ALIAS,
            field.name,
            join.alias,
            target_pk,
        ));
    }
    Ok(sql)
}

/// Primary-key field name, as a query error for the degenerate case so the
/// renderer never panics.
pub(crate) fn primary_key_of(schema: &Schema) -> OrmletResult<String> {
    schema
        .primary_key()
        .map(|f| f.name.clone())
        .ok_or_else(|| {
            OrmletError::query(format!("model '{}' has no primary key", schema.model))
        })
}
