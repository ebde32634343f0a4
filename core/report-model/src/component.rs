//! FILENAME: core/report-model/src/component.rs
//! Component Definition - a widget placed on the report canvas.
//!
//! Position and style belong to the canvas and are ignored here; only the
//! binding-relevant parts (type, data source, runtime props, interaction)
//! are modeled.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_source::{DataSourceConfig, SourceOrigin};
use crate::drill::{DrillDownConfig, DrillDownState};

/// Unique identifier for a widget within a report.
pub type ComponentId = String;

pub const PROP_VALUE: &str = "value";
pub const PROP_SELECTED_NODE_PATH: &str = "selectedNodePath";
pub const PROP_DRILL_DOWN_STATE: &str = "drillDownState";

// ============================================================================
// COMPONENT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    LineChart,
    PieChart,
    Dropdown,
    TextInput,
    TreeChart,
}

impl ComponentType {
    /// Field-mapping roles that must be set before data can be fetched.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ComponentType::LineChart => &["x", "y"],
            ComponentType::PieChart => &["category", "value"],
            ComponentType::Dropdown => &["option"],
            ComponentType::TreeChart => &["name"],
            ComponentType::TextInput => &[],
        }
    }

    /// The role whose column labels the category axis (or options).
    pub fn display_field_key(&self) -> Option<&'static str> {
        match self {
            ComponentType::LineChart => Some("x"),
            ComponentType::PieChart => Some("category"),
            ComponentType::Dropdown => Some("option"),
            ComponentType::TreeChart => Some("name"),
            ComponentType::TextInput => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::LineChart => "line_chart",
            ComponentType::PieChart => "pie_chart",
            ComponentType::Dropdown => "dropdown",
            ComponentType::TextInput => "text_input",
            ComponentType::TreeChart => "tree_chart",
        }
    }
}

// ============================================================================
// PROPS
// ============================================================================

/// Mutable runtime state of a widget, kept as an open JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(pub Map<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn value(&self) -> Option<&Value> {
        self.get(PROP_VALUE)
    }

    pub fn selected_node_path(&self) -> Option<&Vec<Value>> {
        self.get(PROP_SELECTED_NODE_PATH).and_then(Value::as_array)
    }

    /// The stored drill-down state, or level 0 if none was stored yet.
    /// A malformed entry is treated like a missing one.
    pub fn drill_state(&self) -> DrillDownState {
        self.get(PROP_DRILL_DOWN_STATE)
            .and_then(|raw| serde_json::from_value(raw.clone()).ok())
            .unwrap_or_default()
    }
}

// ============================================================================
// INTERACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_down: Option<DrillDownConfig>,
}

// ============================================================================
// COMPONENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    pub id: ComponentId,

    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default)]
    pub data_source: DataSourceConfig,

    #[serde(default)]
    pub props: Props,

    #[serde(default)]
    pub interaction: InteractionConfig,
}

impl ComponentConfig {
    pub fn new(id: impl Into<String>, component_type: ComponentType) -> Self {
        ComponentConfig {
            id: id.into(),
            component_type,
            data_source: DataSourceConfig::default(),
            props: Props::new(),
            interaction: InteractionConfig::default(),
        }
    }

    pub fn with_data_source(mut self, data_source: DataSourceConfig) -> Self {
        self.data_source = data_source;
        self
    }

    pub fn with_prop(mut self, key: &str, value: Value) -> Self {
        self.props.0.insert(key.to_string(), value);
        self
    }

    pub fn with_drill_down(mut self, drill_down: DrillDownConfig) -> Self {
        self.interaction.drill_down = Some(drill_down);
        self
    }

    pub fn drill_config(&self) -> Option<&DrillDownConfig> {
        self.interaction.drill_down.as_ref()
    }

    pub fn drill_state(&self) -> DrillDownState {
        self.props.drill_state()
    }

    /// Returns a copy carrying `state` in its props.
    pub fn with_drill_state(&self, state: &DrillDownState) -> Self {
        let mut updated = self.clone();
        // DrillDownState only holds JSON-safe data
        let raw = serde_json::to_value(state).unwrap_or(Value::Null);
        updated
            .props
            .0
            .insert(PROP_DRILL_DOWN_STATE.to_string(), raw);
        updated
    }

    /// Returns a copy with an auto-selected table name written to `origin`.
    pub fn with_table_name(&self, origin: SourceOrigin, table_name: &str) -> Self {
        let mut updated = self.clone();
        updated.data_source = self.data_source.with_table_name(origin, table_name);
        updated
    }
}
