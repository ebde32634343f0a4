//! FILENAME: core/report-model/src/condition.rs
//! Data source conditions and filter predicates.
//!
//! The canvas stores a condition as a flat record with optional fields for
//! every operand kind. On load it is converted into `DataSourceCondition`,
//! a closed union where each operand kind carries only what it needs.
//! Invalid records (a component operand without a component reference, a
//! fixed match without a target) are rejected at deserialization time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;

// ============================================================================
// OPERATORS
// ============================================================================

/// Comparison operator shared by conditions and filters.
///
/// Operator strings outside the supported set are kept verbatim in `Unknown`
/// so that a report round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Eq,
    NotEq,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    In,
    Like,
    Unknown(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Eq => "=",
            ConditionOperator::NotEq => "!=",
            ConditionOperator::Greater => ">",
            ConditionOperator::Less => "<",
            ConditionOperator::GreaterOrEqual => ">=",
            ConditionOperator::LessOrEqual => "<=",
            ConditionOperator::In => "IN",
            ConditionOperator::Like => "LIKE",
            ConditionOperator::Unknown(op) => op,
        }
    }
}

impl Default for ConditionOperator {
    fn default() -> Self {
        ConditionOperator::Eq
    }
}

impl From<String> for ConditionOperator {
    fn from(op: String) -> Self {
        match op.as_str() {
            // an empty operator means equality on the canvas
            "=" | "" => ConditionOperator::Eq,
            "!=" => ConditionOperator::NotEq,
            ">" => ConditionOperator::Greater,
            "<" => ConditionOperator::Less,
            ">=" => ConditionOperator::GreaterOrEqual,
            "<=" => ConditionOperator::LessOrEqual,
            "IN" => ConditionOperator::In,
            "LIKE" => ConditionOperator::Like,
            _ => ConditionOperator::Unknown(op),
        }
    }
}

impl From<&str> for ConditionOperator {
    fn from(op: &str) -> Self {
        ConditionOperator::from(op.to_string())
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FILTER
// ============================================================================

/// An atomic predicate sent to the data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(default)]
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: ConditionOperator, value: Value) -> Self {
        Filter {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality filter, as produced by drill-down levels.
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Filter::new(field, ConditionOperator::Eq, value)
    }
}

// ============================================================================
// CONDITION OPERANDS
// ============================================================================

/// Where a fixed target value was chosen from in the property panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetValueSource {
    /// Typed in by hand.
    Input,
    /// Picked from a column of a dataset.
    Datasource { field: String },
}

/// How a component operand is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentMatch {
    /// Compare the peer's current value against `expected`.
    /// On the wire `expected` lives in `staticValue`.
    Current { expected: Value },
    /// Compare the peer's current value against a fixed target.
    Fixed { target: Value, source: TargetValueSource },
}

/// A reference to a value exposed by another widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentOperand {
    pub component_id: String,
    pub component_field: String,
    pub matching: ComponentMatch,
}

/// The left-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOperand {
    /// A literal with no live operand behind it.
    Static { value: Value },
    /// The live value of a peer widget.
    Component(ComponentOperand),
}

// ============================================================================
// CONDITION
// ============================================================================

/// One atomic condition of a conditional data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCondition", into = "RawCondition")]
pub struct DataSourceCondition {
    /// Informational: the data field the condition is about.
    pub field: Option<String>,
    pub operator: ConditionOperator,
    pub operand: ConditionOperand,
}

impl DataSourceCondition {
    pub fn static_value(operator: ConditionOperator, value: Value) -> Self {
        DataSourceCondition {
            field: None,
            operator,
            operand: ConditionOperand::Static { value },
        }
    }

    /// Matches when the peer's current value compares true against `expected`.
    pub fn component_current(
        component_id: impl Into<String>,
        component_field: impl Into<String>,
        operator: ConditionOperator,
        expected: Value,
    ) -> Self {
        DataSourceCondition {
            field: None,
            operator,
            operand: ConditionOperand::Component(ComponentOperand {
                component_id: component_id.into(),
                component_field: component_field.into(),
                matching: ComponentMatch::Current { expected },
            }),
        }
    }

    /// Matches when the peer's current value compares true against a typed-in target.
    pub fn component_fixed(
        component_id: impl Into<String>,
        component_field: impl Into<String>,
        operator: ConditionOperator,
        target: Value,
    ) -> Self {
        DataSourceCondition {
            field: None,
            operator,
            operand: ConditionOperand::Component(ComponentOperand {
                component_id: component_id.into(),
                component_field: component_field.into(),
                matching: ComponentMatch::Fixed {
                    target,
                    source: TargetValueSource::Input,
                },
            }),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// The value the operand is compared against.
    pub fn comparison_target(&self) -> &Value {
        match &self.operand {
            ConditionOperand::Static { value } => value,
            ConditionOperand::Component(operand) => match &operand.matching {
                ComponentMatch::Current { expected } => expected,
                ComponentMatch::Fixed { target, .. } => target,
            },
        }
    }

    /// The peer reference, if the operand reads another widget.
    pub fn component_operand(&self) -> Option<&ComponentOperand> {
        match &self.operand {
            ConditionOperand::Component(operand) => Some(operand),
            ConditionOperand::Static { .. } => None,
        }
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum ValueType {
    #[default]
    Static,
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ComponentValueMode {
    Current,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TargetSourceKind {
    Input,
    Datasource,
}

/// The flat record the canvas reads and writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(default)]
    operator: ConditionOperator,
    #[serde(default)]
    value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    static_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_value_mode: Option<ComponentValueMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_target_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_target_value_source: Option<TargetSourceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_target_value_field: Option<String>,
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.is_empty())
}

impl TryFrom<RawCondition> for DataSourceCondition {
    type Error = ModelError;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let operand = match raw.value_type {
            ValueType::Static => ConditionOperand::Static {
                value: raw.static_value.unwrap_or(Value::Null),
            },
            ValueType::Component => {
                let component_id =
                    non_empty(raw.component_id).ok_or(ModelError::MissingComponentReference)?;
                let component_field = non_empty(raw.component_field)
                    .ok_or(ModelError::MissingComponentReference)?;

                let matching = match raw.component_value_mode {
                    Some(ComponentValueMode::Fixed) => {
                        let target = raw
                            .component_target_value
                            .ok_or_else(|| ModelError::MissingTargetValue(component_id.clone()))?;
                        let source = match raw.component_target_value_source {
                            Some(TargetSourceKind::Datasource) => TargetValueSource::Datasource {
                                field: non_empty(raw.component_target_value_field).ok_or_else(
                                    || ModelError::MissingTargetValueField(component_id.clone()),
                                )?,
                            },
                            Some(TargetSourceKind::Input) | None => TargetValueSource::Input,
                        };
                        ComponentMatch::Fixed { target, source }
                    }
                    Some(ComponentValueMode::Current) | None => ComponentMatch::Current {
                        expected: raw.static_value.unwrap_or(Value::Null),
                    },
                };

                ConditionOperand::Component(ComponentOperand {
                    component_id,
                    component_field,
                    matching,
                })
            }
        };

        Ok(DataSourceCondition {
            field: raw.field,
            operator: raw.operator,
            operand,
        })
    }
}

impl From<DataSourceCondition> for RawCondition {
    fn from(condition: DataSourceCondition) -> Self {
        let mut raw = RawCondition {
            field: condition.field,
            operator: condition.operator,
            ..RawCondition::default()
        };

        match condition.operand {
            ConditionOperand::Static { value } => {
                raw.value_type = ValueType::Static;
                raw.static_value = Some(value);
            }
            ConditionOperand::Component(operand) => {
                raw.value_type = ValueType::Component;
                raw.component_id = Some(operand.component_id);
                raw.component_field = Some(operand.component_field);
                match operand.matching {
                    ComponentMatch::Current { expected } => {
                        raw.component_value_mode = Some(ComponentValueMode::Current);
                        raw.static_value = Some(expected);
                    }
                    ComponentMatch::Fixed { target, source } => {
                        raw.component_value_mode = Some(ComponentValueMode::Fixed);
                        raw.component_target_value = Some(target);
                        match source {
                            TargetValueSource::Input => {
                                raw.component_target_value_source = Some(TargetSourceKind::Input);
                            }
                            TargetValueSource::Datasource { field } => {
                                raw.component_target_value_source =
                                    Some(TargetSourceKind::Datasource);
                                raw.component_target_value_field = Some(field);
                            }
                        }
                    }
                }
            }
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_condition_requires_reference() {
        let result: Result<DataSourceCondition, _> = serde_json::from_value(json!({
            "operator": "=",
            "valueType": "component",
            "componentField": "value"
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("componentId"), "unexpected error: {}", err);
    }

    #[test]
    fn test_fixed_mode_requires_target() {
        let result: Result<DataSourceCondition, _> = serde_json::from_value(json!({
            "valueType": "component",
            "componentId": "d1",
            "componentField": "value",
            "componentValueMode": "fixed"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_datasource_target_requires_field() {
        let result: Result<DataSourceCondition, _> = serde_json::from_value(json!({
            "valueType": "component",
            "componentId": "d1",
            "componentField": "value",
            "componentValueMode": "fixed",
            "componentTargetValue": "Asia",
            "componentTargetValueSource": "datasource"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_current_mode_reuses_static_value_as_expected() {
        let condition: DataSourceCondition = serde_json::from_value(json!({
            "valueType": "component",
            "componentId": "d1",
            "componentField": "value",
            "staticValue": "EU"
        }))
        .unwrap();

        assert_eq!(condition.operator, ConditionOperator::Eq);
        assert_eq!(condition.comparison_target(), &json!("EU"));
        let operand = condition.component_operand().unwrap();
        assert_eq!(operand.component_id, "d1");
        assert!(matches!(operand.matching, ComponentMatch::Current { .. }));
    }

    #[test]
    fn test_unknown_operator_is_preserved() {
        let condition: DataSourceCondition = serde_json::from_value(json!({
            "operator": "BETWEEN",
            "valueType": "static",
            "staticValue": 1
        }))
        .unwrap();
        assert_eq!(condition.operator, ConditionOperator::Unknown("BETWEEN".to_string()));

        let back = serde_json::to_value(&condition).unwrap();
        assert_eq!(back["operator"], json!("BETWEEN"));
        assert_eq!(back["valueType"], json!("static"));
    }

    #[test]
    fn test_fixed_datasource_condition_writes_flat_record() {
        let condition: DataSourceCondition = serde_json::from_value(json!({
            "valueType": "component",
            "componentId": "tree",
            "componentField": "selectedNode",
            "componentValueMode": "fixed",
            "componentTargetValue": "Shanghai",
            "componentTargetValueSource": "datasource",
            "componentTargetValueField": "city"
        }))
        .unwrap();

        let raw = serde_json::to_value(&condition).unwrap();
        assert_eq!(raw["componentTargetValueField"], json!("city"));
        assert_eq!(raw["componentValueMode"], json!("fixed"));
        assert!(raw.get("staticValue").is_none());
    }
}
