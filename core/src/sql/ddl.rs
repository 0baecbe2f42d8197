//! CREATE TABLE / DROP TABLE generation.

use crate::error::OrmletResult;
use crate::schema::{Registry, Schema};

use super::primary_key_of;

/// Render the CREATE TABLE statement: one column clause per field in
/// declaration order, then one FOREIGN KEY clause per foreign-key field.
pub fn build_create_table(schema: &Schema, registry: &Registry) -> OrmletResult<String> {
    let mut clauses: Vec<String> = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let mut sql = format!("{} {}", field.name, field.ty.sql_type());
        if field.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if !field.nullable && !field.auto {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &field.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }
        if field.auto {
            sql.push_str(" AUTOINCREMENT");
        }
        clauses.push(sql);
    }

    for field in schema.foreign_keys() {
        let Some(fk) = &field.foreign_key else {
            continue;
        };
        let target = registry.get(&fk.references)?;
        let target_pk = primary_key_of(&target)?;
        clauses.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {} ON UPDATE {}",
            field.name, target.table, target_pk, fk.on_delete, fk.on_update
        ));
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        schema.table,
        clauses.join(", ")
    ))
}

pub fn build_drop_table(schema: &Schema) -> String {
    format!("DROP TABLE {}", schema.table)
}
