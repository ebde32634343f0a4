//! FILENAME: core/binding-engine/src/condition.rs
//! Condition Evaluator - one atomic condition against a resolved operand.
//!
//! `=`/`!=` compare display strings (so `1` equals `"1"`), ordering operators
//! compare numbers, `LIKE` is substring containment, and `IN` checks
//! membership by raw-value equality without any coercion.

use serde_json::Value;

use report_model::value::{strict_equals, to_display_string, to_number};
use report_model::{ConditionOperator, DataSourceCondition, LogicOperator};

/// Evaluates `condition` against the operand value resolved for it.
/// An unresolved operand (`None` or null) never satisfies a condition.
pub fn evaluate(condition: &DataSourceCondition, resolved: Option<&Value>) -> bool {
    let value = match resolved {
        None | Some(Value::Null) => return false,
        Some(value) => value,
    };

    compare(&condition.operator, value, condition.comparison_target())
}

/// Applies `operator` with the operand on the left and the target on the right.
pub fn compare(operator: &ConditionOperator, value: &Value, target: &Value) -> bool {
    match operator {
        ConditionOperator::Eq => to_display_string(value) == to_display_string(target),
        ConditionOperator::NotEq => to_display_string(value) != to_display_string(target),
        ConditionOperator::Greater => to_number(value) > to_number(target),
        ConditionOperator::Less => to_number(value) < to_number(target),
        ConditionOperator::GreaterOrEqual => to_number(value) >= to_number(target),
        ConditionOperator::LessOrEqual => to_number(value) <= to_number(target),
        ConditionOperator::Like => to_display_string(value).contains(&to_display_string(target)),
        ConditionOperator::In => match target {
            Value::Array(members) => members.iter().any(|m| strict_equals(m, value)),
            single => strict_equals(single, value),
        },
        ConditionOperator::Unknown(_) => false,
    }
}

/// Combines per-condition results. An empty list never matches.
pub fn combine(logic: LogicOperator, results: &[bool]) -> bool {
    if results.is_empty() {
        return false;
    }
    match logic {
        LogicOperator::And => results.iter().all(|r| *r),
        LogicOperator::Or => results.iter().any(|r| *r),
    }
}
