//! FILENAME: core/data-service/src/filter.rs
//! Row predicates compiled from request filters.
//!
//! Filters are compiled once per query so LIKE patterns are not rebuilt for
//! every row. Semantics follow SQL: a NULL cell never matches, filters with
//! a null value are ignored, and all remaining filters are ANDed.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use report_model::value::{as_strict_number, to_display_string};
use report_model::{ConditionOperator, Filter, Row};

use crate::error::DataServiceError;

#[derive(Debug)]
enum Predicate {
    Equals(Value),
    NotEquals(Value),
    Ordered(ConditionOperator, Value),
    In(Vec<Value>),
    Like(Regex),
}

#[derive(Debug)]
pub(crate) struct RowFilter {
    field: String,
    predicate: Predicate,
}

impl RowFilter {
    pub(crate) fn matches(&self, row: &Row) -> bool {
        let cell = match lookup(row, &self.field) {
            Some(Value::Null) | None => return false,
            Some(cell) => cell,
        };

        match &self.predicate {
            Predicate::Equals(value) => loose_equals(cell, value),
            Predicate::NotEquals(value) => !loose_equals(cell, value),
            Predicate::Ordered(op, value) => match compare(cell, value) {
                Some(ordering) => match op {
                    ConditionOperator::Greater => ordering == Ordering::Greater,
                    ConditionOperator::Less => ordering == Ordering::Less,
                    ConditionOperator::GreaterOrEqual => ordering != Ordering::Less,
                    ConditionOperator::LessOrEqual => ordering != Ordering::Greater,
                    _ => false,
                },
                None => false,
            },
            Predicate::In(values) => values.iter().any(|v| loose_equals(cell, v)),
            Predicate::Like(pattern) => pattern.is_match(&to_display_string(cell)),
        }
    }
}

/// Compiles the usable filters of a request.
pub(crate) fn compile_filters(filters: &[Filter]) -> Result<Vec<RowFilter>, DataServiceError> {
    let mut compiled = Vec::with_capacity(filters.len());

    for filter in filters {
        if filter.field.is_empty() || filter.value.is_null() {
            continue;
        }

        let predicate = match &filter.operator {
            ConditionOperator::Eq => Predicate::Equals(filter.value.clone()),
            ConditionOperator::NotEq => Predicate::NotEquals(filter.value.clone()),
            op @ (ConditionOperator::Greater
            | ConditionOperator::Less
            | ConditionOperator::GreaterOrEqual
            | ConditionOperator::LessOrEqual) => Predicate::Ordered(op.clone(), filter.value.clone()),
            ConditionOperator::In => match &filter.value {
                Value::Array(items) => Predicate::In(items.clone()),
                single => Predicate::In(vec![single.clone()]),
            },
            ConditionOperator::Like => {
                let pattern = like_to_regex(&to_display_string(&filter.value));
                let regex = Regex::new(&pattern).map_err(|e| DataServiceError::InvalidFilter {
                    field: filter.field.clone(),
                    reason: e.to_string(),
                })?;
                Predicate::Like(regex)
            }
            ConditionOperator::Unknown(op) => {
                return Err(DataServiceError::InvalidFilter {
                    field: filter.field.clone(),
                    reason: format!("unsupported operator '{}'", op),
                });
            }
        };

        compiled.push(RowFilter {
            field: filter.field.clone(),
            predicate,
        });
    }

    Ok(compiled)
}

/// Column lookup: exact name first, then case-insensitive.
fn lookup<'a>(row: &'a Row, field: &str) -> Option<&'a Value> {
    row.get(field).or_else(|| {
        row.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}

fn loose_equals(cell: &Value, value: &Value) -> bool {
    match (as_strict_number(cell), as_strict_number(value)) {
        (Some(a), Some(b)) => a == b,
        _ => to_display_string(cell) == to_display_string(value),
    }
}

fn compare(cell: &Value, value: &Value) -> Option<Ordering> {
    match (as_strict_number(cell), as_strict_number(value)) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(to_display_string(cell).cmp(&to_display_string(value))),
    }
}

/// Translates a SQL LIKE pattern (`%`, `_`) into an anchored regex.
fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("(?is)^");
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    regex
}
