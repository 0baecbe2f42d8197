//! SELECT generation, including the LEFT JOIN chain for registered paths.

use crate::error::OrmletResult;
use crate::schema::{Registry, Schema};
use crate::state::QueryState;

use super::{from_clause, where_clause};

/// Render the SELECT statement. Explicit selections render `alias.field`
/// (plus ` AS name` when raw-value projection was requested); with no
/// selection every registered alias projects `alias.*`.
pub fn build_select(
    schema: &Schema,
    registry: &Registry,
    state: &QueryState,
) -> OrmletResult<String> {
    let fields = if state.select.is_empty() {
        state
            .aliases()
            .map(|alias| format!("{}.*", alias))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        state
            .select
            .iter()
            .map(|sel| {
                let mut sql = format!("{}.{}", sel.alias, sel.field);
                if let Some(output) = &sel.output {
                    sql.push_str(&format!(" AS {}", output));
                }
                sql
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut sql = format!(
        "SELECT {} FROM {}",
        fields,
        from_clause(schema, registry, state)?
    );
    if let Some(filters) = where_clause(state, false) {
        sql.push_str(&format!(" WHERE {}", filters));
    }
    Ok(sql)
}
