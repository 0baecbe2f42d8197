//! Per-chain query state: alias assignment and statement accumulators.
//!
//! One `QueryState` lives for exactly one builder chain. The primary table
//! always owns alias `t0`; every joined relation gets the next `t{n}` at
//! first mention, whether that mention comes from a selected field or a
//! filter lookup. Allocation order equals first-mention order, which keeps
//! the rendered SQL byte-identical across repeated runs.

use crate::lookup::LookupOp;
use crate::value::Value;

/// Alias of the primary table in every rendered statement.
pub const PRIMARY_ALIAS: &str = "t0";

/// One registered table alias. `field` is the foreign-key field traversed to
/// reach it; `None` marks the primary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAlias {
    pub field: Option<String>,
    pub alias: String,
}

/// One projected field of a SELECT. `output` carries the unqualified name
/// used for `AS` when raw-value projection was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    pub alias: String,
    pub field: String,
    pub output: Option<String>,
}

/// One lookup bound to an aliased column. WHERE entries carry the parsed
/// operator; INSERT and UPDATE entries are plain `exact` assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    pub alias: String,
    pub field: String,
    pub op: LookupOp,
    pub value: Value,
}

/// Accumulated state of one statement chain.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    joins: Vec<JoinAlias>,
    pub select: Vec<SelectField>,
    pub filters: Vec<LookupEntry>,
    pub inserts: Vec<LookupEntry>,
    pub updates: Vec<LookupEntry>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            joins: vec![JoinAlias {
                field: None,
                alias: PRIMARY_ALIAS.to_string(),
            }],
            select: Vec::new(),
            filters: Vec::new(),
            inserts: Vec::new(),
            updates: Vec::new(),
        }
    }

    /// Register a join path and return its alias. The first call for a path
    /// allocates the next sequential alias; later calls return the existing
    /// one, so the same relation is never joined twice in one chain.
    pub fn register(&mut self, join_field: &str) -> String {
        if let Some(join) = self
            .joins
            .iter()
            .find(|j| j.field.as_deref() == Some(join_field))
        {
            return join.alias.clone();
        }
        let alias = format!("t{}", self.joins.len());
        self.joins.push(JoinAlias {
            field: Some(join_field.to_string()),
            alias: alias.clone(),
        });
        alias
    }

    /// All aliases in registration order, primary first.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.joins.iter().map(|j| j.alias.as_str())
    }

    /// Joined relations in registration order, primary excluded.
    pub fn joined_relations(&self) -> impl Iterator<Item = &JoinAlias> {
        self.joins.iter().filter(|j| j.field.is_some())
    }

    /// Whether any alias beyond the primary table is registered.
    pub fn has_joins(&self) -> bool {
        self.joins.len() > 1
    }

    pub fn push_select(&mut self, field: SelectField) {
        self.select.push(field);
    }

    /// Append a WHERE lookup. Lookups are keyed by `(alias, field)`;
    /// rebinding the same column replaces the earlier entry in place.
    pub fn push_filter(&mut self, entry: LookupEntry) {
        Self::upsert(&mut self.filters, entry);
    }

    pub fn push_insert(&mut self, entry: LookupEntry) {
        Self::upsert(&mut self.inserts, entry);
    }

    pub fn push_update(&mut self, entry: LookupEntry) {
        Self::upsert(&mut self.updates, entry);
    }

    fn upsert(entries: &mut Vec<LookupEntry>, entry: LookupEntry) {
        match entries
            .iter()
            .position(|e| e.alias == entry.alias && e.field == entry.field)
        {
            Some(pos) => entries[pos] = entry,
            None => entries.push(entry),
        }
    }
}
