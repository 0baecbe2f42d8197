//! Lookup key parsing.
//!
//! A lookup key has the shape `[<join>__]<field>[__<operator>]`. The join
//! segment names a foreign-key field on the primary model; the remaining
//! field lives on the referenced model's table. Selection keys use the same
//! grammar without the operator suffix.

use crate::error::{OrmletError, OrmletResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// The closed operator vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupOp {
    Exact,
    Gt,
    Gte,
    Lt,
    Lte,
    /// LIKE with the operand wrapped in `%...%`.
    Contains,
    /// IN with a parenthesized literal list operand.
    In,
    Is,
}

impl LookupOp {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            LookupOp::Exact => "=",
            LookupOp::Gt => ">",
            LookupOp::Gte => ">=",
            LookupOp::Lt => "<",
            LookupOp::Lte => "<=",
            LookupOp::Contains => "LIKE",
            LookupOp::In => "IN",
            LookupOp::Is => "IS",
        }
    }

    fn from_suffix(segment: &str) -> Option<Self> {
        match segment {
            "exact" => Some(LookupOp::Exact),
            "gt" => Some(LookupOp::Gt),
            "gte" => Some(LookupOp::Gte),
            "lt" => Some(LookupOp::Lt),
            "lte" => Some(LookupOp::Lte),
            "contains" => Some(LookupOp::Contains),
            "in" => Some(LookupOp::In),
            "is" => Some(LookupOp::Is),
            _ => None,
        }
    }
}

/// A normalized filter lookup: join path, field, operator and operand.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLookup {
    pub join: Option<String>,
    pub field: String,
    pub op: LookupOp,
    pub value: Value,
}

/// A normalized selection key: join path and field, no operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelection {
    pub join: Option<String>,
    pub field: String,
}

fn split_key(key: &str) -> OrmletResult<Vec<&str>> {
    let segments: Vec<&str> = key.split("__").collect();
    if key.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(OrmletError::query(format!("malformed lookup key '{}'", key)));
    }
    Ok(segments)
}

/// Parse one keyword filter argument into a [`ParsedLookup`].
///
/// A trailing segment outside the operator vocabulary belongs to the field
/// name and the operator defaults to `exact`; a key that *is* an operator
/// name is likewise a plain field.
pub fn parse_lookup(key: &str, value: Value) -> OrmletResult<ParsedLookup> {
    let mut segments = split_key(key)?;

    let op = if segments.len() > 1 {
        match LookupOp::from_suffix(segments[segments.len() - 1]) {
            Some(op) => {
                segments.pop();
                op
            }
            None => LookupOp::Exact,
        }
    } else {
        LookupOp::Exact
    };

    let (join, field) = match segments.as_slice() {
        [field] => (None, (*field).to_string()),
        [join, field] => (Some((*join).to_string()), (*field).to_string()),
        _ => {
            return Err(OrmletError::query(format!(
                "lookup '{}' traverses more than one relation",
                key
            )));
        }
    };

    Ok(ParsedLookup {
        join,
        field,
        op,
        value,
    })
}

/// Parse one field-selection key. Selection lists never carry operators,
/// only an optional join prefix.
pub fn parse_selection(key: &str) -> OrmletResult<ParsedSelection> {
    let segments = split_key(key)?;
    match segments.as_slice() {
        [field] => Ok(ParsedSelection {
            join: None,
            field: (*field).to_string(),
        }),
        [join, field] => Ok(ParsedSelection {
            join: Some((*join).to_string()),
            field: (*field).to_string(),
        }),
        _ => Err(OrmletError::query(format!(
            "selection '{}' traverses more than one relation",
            key
        ))),
    }
}
