//! FILENAME: core/report-model/src/drill.rs
//! Drill-down state and configuration types.
//!
//! `DrillDownState` lives in a widget's props and records the value clicked
//! at each level. `DrillDownConfig` is the static interaction setting naming
//! the data field behind each level. The transitions themselves live in the
//! binding engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deepest supported drill level.
pub const MAX_DRILL_DEPTH: u8 = 3;

// ============================================================================
// STATE
// ============================================================================

/// Clicked values keyed by level (`level1`..`level3`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrillValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level1: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level2: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level3: Option<Value>,
}

impl DrillValues {
    pub fn get(&self, level: u8) -> Option<&Value> {
        match level {
            1 => self.level1.as_ref(),
            2 => self.level2.as_ref(),
            3 => self.level3.as_ref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, level: u8) -> Option<&mut Option<Value>> {
        match level {
            1 => Some(&mut self.level1),
            2 => Some(&mut self.level2),
            3 => Some(&mut self.level3),
            _ => None,
        }
    }

    pub fn set(&mut self, level: u8, value: Value) {
        if let Some(slot) = self.slot_mut(level) {
            *slot = Some(value);
        }
    }

    pub fn clear(&mut self, level: u8) {
        if let Some(slot) = self.slot_mut(level) {
            *slot = None;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.level1.is_none() && self.level2.is_none() && self.level3.is_none()
    }
}

/// Current drill depth of a widget plus the values that led there.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrillDownState {
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub values: DrillValues,
}

impl DrillDownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// What a click on a data point does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrillType {
    /// Narrow this widget's own data.
    #[default]
    #[serde(rename = "self")]
    SelfDrill,
    /// Push the clicked value into other widgets as a filter.
    Filter,
    /// Open another report.
    Navigate,
}

/// Data field behind each drill level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrillDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level3: Option<String>,
}

impl DrillDimensions {
    /// The configured field for a level; empty names count as unset.
    pub fn get(&self, level: u8) -> Option<&str> {
        let field = match level {
            1 => self.level1.as_deref(),
            2 => self.level2.as_deref(),
            3 => self.level3.as_deref(),
            _ => None,
        };
        field.filter(|f| !f.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrillDownConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub drill_type: DrillType,
    #[serde(default)]
    pub dimensions: DrillDimensions,
}

impl DrillDownConfig {
    /// An enabled self drill-down over the given level fields.
    pub fn self_drill(levels: &[&str]) -> Self {
        let mut dimensions = DrillDimensions::default();
        let mut names = levels.iter().map(|l| Some(l.to_string()));
        dimensions.level1 = names.next().flatten();
        dimensions.level2 = names.next().flatten();
        dimensions.level3 = names.next().flatten();
        DrillDownConfig {
            enabled: true,
            drill_type: DrillType::SelfDrill,
            dimensions,
        }
    }

    /// Enabled and narrowing this widget's own data.
    pub fn is_self_drill(&self) -> bool {
        self.enabled && self.drill_type == DrillType::SelfDrill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_deserializes_partial_values() {
        let state: DrillDownState =
            serde_json::from_value(json!({"level": 1, "values": {"level1": "Asia"}})).unwrap();
        assert_eq!(state.level, 1);
        assert_eq!(state.values.get(1), Some(&json!("Asia")));
        assert_eq!(state.values.get(2), None);
    }

    #[test]
    fn test_drill_type_self_keyword() {
        let config: DrillDownConfig = serde_json::from_value(json!({
            "enabled": true,
            "type": "self",
            "dimensions": {"level1": "region", "level2": ""}
        }))
        .unwrap();
        assert!(config.is_self_drill());
        assert_eq!(config.dimensions.get(1), Some("region"));
        assert_eq!(config.dimensions.get(2), None);
        assert_eq!(config.dimensions.get(4), None);
    }
}
