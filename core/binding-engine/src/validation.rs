//! FILENAME: core/binding-engine/src/validation.rs
//! Configuration checks for widget bindings.
//!
//! Issues are reported, never enforced: a widget with issues still resolves
//! (and typically ends up on its default source or unconfigured).

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use report_model::{ComponentConfig, ComponentId, ConditionOperand, ReportConfig, SourceKind};

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigIssue {
    #[error("conditional source #{source_index} has no conditions and can never match")]
    EmptyConditions { source_index: usize },

    #[error("condition #{condition_index} of source #{source_index} compares a static value with itself")]
    SelfReferentialCondition {
        source_index: usize,
        condition_index: usize,
    },

    #[error("conditional data source has no candidates and no default")]
    NoSourceAvailable,

    #[error("condition #{condition_index} of source #{source_index} reads unknown widget '{component_id}'")]
    UnknownComponent {
        source_index: usize,
        condition_index: usize,
        component_id: ComponentId,
    },

    #[error("condition #{condition_index} of source #{source_index} reads the widget itself")]
    SelfReference {
        source_index: usize,
        condition_index: usize,
    },

    #[error("drill-down is enabled but level 1 has no dimension")]
    DrillWithoutDimensions,

    #[error("drill dimension for level {level} is set but a shallower level is not")]
    DrillDimensionGap { level: u8 },
}

/// Checks that only need the widget itself.
pub fn validate_component(widget: &ComponentConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if let SourceKind::Conditional {
        conditional_sources,
        default_source,
    } = &widget.data_source.kind
    {
        if conditional_sources.is_empty() && default_source.is_none() {
            issues.push(ConfigIssue::NoSourceAvailable);
        }

        for (source_index, source) in conditional_sources.iter().enumerate() {
            if source.conditions.is_empty() {
                issues.push(ConfigIssue::EmptyConditions { source_index });
            }
            for (condition_index, condition) in source.conditions.iter().enumerate() {
                match &condition.operand {
                    ConditionOperand::Static { .. } => {
                        issues.push(ConfigIssue::SelfReferentialCondition {
                            source_index,
                            condition_index,
                        });
                    }
                    ConditionOperand::Component(operand) if operand.component_id == widget.id => {
                        issues.push(ConfigIssue::SelfReference {
                            source_index,
                            condition_index,
                        });
                    }
                    ConditionOperand::Component(_) => {}
                }
            }
        }
    }

    if let Some(drill) = widget.drill_config().filter(|d| d.enabled) {
        if drill.dimensions.get(1).is_none() {
            issues.push(ConfigIssue::DrillWithoutDimensions);
        }
        for level in 2..=3 {
            if drill.dimensions.get(level).is_some() && drill.dimensions.get(level - 1).is_none() {
                issues.push(ConfigIssue::DrillDimensionGap { level });
            }
        }
    }

    issues
}

/// Checks every widget, including references between widgets.
pub fn validate_report(report: &ReportConfig) -> Vec<(ComponentId, ConfigIssue)> {
    let known: HashSet<&str> = report.components.iter().map(|c| c.id.as_str()).collect();
    let mut issues = Vec::new();

    for widget in &report.components {
        issues.extend(
            validate_component(widget)
                .into_iter()
                .map(|issue| (widget.id.clone(), issue)),
        );

        for (source_index, source) in widget.data_source.conditional_sources().iter().enumerate() {
            for (condition_index, condition) in source.conditions.iter().enumerate() {
                if let Some(operand) = condition.component_operand() {
                    if !known.contains(operand.component_id.as_str()) {
                        issues.push((
                            widget.id.clone(),
                            ConfigIssue::UnknownComponent {
                                source_index,
                                condition_index,
                                component_id: operand.component_id.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_model::{
        ComponentType, ConditionOperator, ConditionalDataSource, DataSourceCondition,
        DataSourceConfig, DrillDimensions, DrillDownConfig, SourceRef,
    };
    use serde_json::json;

    #[test]
    fn test_static_and_empty_conditions_are_flagged() {
        let widget = ComponentConfig::new("w", ComponentType::LineChart).with_data_source(
            DataSourceConfig::conditional(
                vec![
                    ConditionalDataSource::new(5, Some("eu_sales")).with_condition(
                        DataSourceCondition::static_value(ConditionOperator::Eq, json!("EU"))
                            .with_field("region"),
                    ),
                    ConditionalDataSource::new(5, Some("never")),
                ],
                Some(SourceRef::new(5, Some("global_sales"))),
            ),
        );

        let issues = validate_component(&widget);
        assert_eq!(
            issues,
            vec![
                ConfigIssue::SelfReferentialCondition {
                    source_index: 0,
                    condition_index: 0
                },
                ConfigIssue::EmptyConditions { source_index: 1 },
            ]
        );
    }

    #[test]
    fn test_self_reference_and_missing_sources() {
        let widget = ComponentConfig::new("w", ComponentType::Dropdown).with_data_source(
            DataSourceConfig::conditional(
                vec![ConditionalDataSource::new(1, None).with_condition(
                    DataSourceCondition::component_current("w", "value", ConditionOperator::Eq, json!(1)),
                )],
                None,
            ),
        );
        assert_eq!(
            validate_component(&widget),
            vec![ConfigIssue::SelfReference {
                source_index: 0,
                condition_index: 0
            }]
        );

        let empty = ComponentConfig::new("e", ComponentType::PieChart)
            .with_data_source(DataSourceConfig::conditional(Vec::new(), None));
        assert_eq!(validate_component(&empty), vec![ConfigIssue::NoSourceAvailable]);
    }

    #[test]
    fn test_drill_dimension_checks() {
        let mut drill = DrillDownConfig::self_drill(&[]);
        drill.dimensions = DrillDimensions {
            level1: None,
            level2: None,
            level3: Some("city".to_string()),
        };
        let widget = ComponentConfig::new("w", ComponentType::PieChart).with_drill_down(drill);
        assert_eq!(
            validate_component(&widget),
            vec![
                ConfigIssue::DrillWithoutDimensions,
                ConfigIssue::DrillDimensionGap { level: 3 }
            ]
        );
    }

    #[test]
    fn test_report_flags_unknown_peers() {
        let chart = ComponentConfig::new("chart", ComponentType::LineChart).with_data_source(
            DataSourceConfig::conditional(
                vec![ConditionalDataSource::new(1, None).with_condition(
                    DataSourceCondition::component_fixed("ghost", "value", ConditionOperator::Eq, json!("x")),
                )],
                Some(SourceRef::new(1, None)),
            ),
        );
        let report = ReportConfig::new(vec![chart]);

        let issues = validate_report(&report);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, "chart");
        assert!(matches!(
            &issues[0].1,
            ConfigIssue::UnknownComponent { component_id, .. } if component_id == "ghost"
        ));
    }
}
