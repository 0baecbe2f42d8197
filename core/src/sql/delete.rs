//! DELETE generation, with the subquery rewrite for joined filters.

use crate::error::OrmletResult;
use crate::schema::{Registry, Schema};
use crate::state::{QueryState, SelectField, PRIMARY_ALIAS};

use super::{build_select, primary_key_of, where_clause};

/// Render the DELETE statement. Without joins this is a direct delete with
/// the alias stripped from the WHERE clause. When the chain filtered through
/// a related table, SQLite cannot join inside DELETE, so the statement is
/// rewritten as `DELETE FROM t WHERE pk IN (SELECT t0.pk ...)` carrying the
/// same joins and filters.
pub fn build_delete(
    schema: &Schema,
    registry: &Registry,
    state: &QueryState,
) -> OrmletResult<String> {
    let mut sql = format!("DELETE FROM {}", schema.table);

    if state.has_joins() {
        let pk = primary_key_of(schema)?;
        let mut inner = state.clone();
        inner.select = vec![SelectField {
            alias: PRIMARY_ALIAS.to_string(),
            field: pk.clone(),
            output: None,
        }];
        let subquery = build_select(schema, registry, &inner)?;
        sql.push_str(&format!(" WHERE {} IN ({})", pk, subquery));
    } else if let Some(filters) = where_clause(state, true) {
        sql.push_str(&format!(" WHERE {}", filters));
    }

    Ok(sql)
}
