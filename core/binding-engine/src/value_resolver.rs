//! FILENAME: core/binding-engine/src/value_resolver.rs
//! Value Resolver - the current value of a field on a peer widget.
//!
//! Field names are interpreted per widget type: a dropdown's `value` is its
//! selection, a tree's `value` is the last node of its selected path.
//! Resolution is read-only; peers are never mutated from here.

use serde_json::Value;

use report_model::value::is_truthy;
use report_model::{
    ComponentConfig, ComponentType, ConditionOperand, DataSourceCondition, ReportConfig,
    PROP_SELECTED_NODE_PATH, PROP_VALUE,
};

/// Pull-based lookup of peer widget values.
pub trait ComponentValues {
    /// Value of `field` (default `value`) on widget `component_id`,
    /// or `None` when the widget is unknown or holds no value.
    fn component_value(&self, component_id: &str, field: Option<&str>) -> Option<Value>;
}

/// Resolves peer values from a snapshot of the report's widgets.
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    components: &'a [ComponentConfig],
}

impl<'a> ValueResolver<'a> {
    pub fn new(components: &'a [ComponentConfig]) -> Self {
        ValueResolver { components }
    }

    pub fn from_report(report: &'a ReportConfig) -> Self {
        ValueResolver::new(&report.components)
    }

    pub fn resolve(&self, component_id: &str, field: &str) -> Option<Value> {
        let component = self.components.iter().find(|c| c.id == component_id)?;
        resolve_field(component, field)
    }
}

impl ComponentValues for ValueResolver<'_> {
    fn component_value(&self, component_id: &str, field: Option<&str>) -> Option<Value> {
        self.resolve(component_id, field.unwrap_or(PROP_VALUE))
    }
}

impl ComponentValues for ReportConfig {
    fn component_value(&self, component_id: &str, field: Option<&str>) -> Option<Value> {
        ValueResolver::from_report(self).component_value(component_id, field)
    }
}

fn resolve_field(component: &ComponentConfig, field: &str) -> Option<Value> {
    let props = &component.props;
    match (component.component_type, field) {
        (ComponentType::Dropdown, "value" | "selectedValue") => truthy(props.value()),
        (ComponentType::TreeChart, "selectedNodePath") => truthy(props.get(PROP_SELECTED_NODE_PATH)),
        // the last node is taken as-is, falsy names included
        (ComponentType::TreeChart, "selectedNode" | "value") => props
            .selected_node_path()
            .and_then(|path| path.last())
            .filter(|node| !node.is_null())
            .cloned(),
        _ => truthy(props.get(field)),
    }
}

/// Falsy props (null, `false`, `0`, `""`) read as no value.
fn truthy(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| is_truthy(v)).cloned()
}

/// The live operand of a condition. Static operands have none.
pub fn resolve_operand<P: ComponentValues + ?Sized>(
    condition: &DataSourceCondition,
    peers: &P,
) -> Option<Value> {
    match &condition.operand {
        ConditionOperand::Static { .. } => None,
        ConditionOperand::Component(operand) => {
            peers.component_value(&operand.component_id, Some(&operand.component_field))
        }
    }
}
