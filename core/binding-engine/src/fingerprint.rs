//! FILENAME: core/binding-engine/src/fingerprint.rs
//! Refetch fingerprints.
//!
//! A fingerprint captures everything a widget's query depends on: its data
//! source configuration, the peer values its conditions read, its drill
//! state, and its own id. Serialization goes through key-ordered maps so
//! equal inputs always give equal fingerprints.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use report_model::{ComponentConfig, DataSourceConfig};

use crate::error::BindingError;
use crate::value_resolver::ComponentValues;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint {
    pub widget_id: String,
    pub data_source: String,
    pub peer_values: String,
}

/// `(component_id, field)` pairs read by the widget's conditions, sorted.
pub fn referenced_peers(widget: &ComponentConfig) -> BTreeSet<(String, String)> {
    widget
        .data_source
        .conditional_sources()
        .iter()
        .flat_map(|source| source.conditions.iter())
        .filter_map(|condition| condition.component_operand())
        .map(|operand| (operand.component_id.clone(), operand.component_field.clone()))
        .collect()
}

/// Snapshot of the values a widget's query depends on, keyed `id.field`.
pub fn dependency_values<P: ComponentValues + ?Sized>(
    widget: &ComponentConfig,
    peers: &P,
) -> Result<BTreeMap<String, Value>, BindingError> {
    let mut values = BTreeMap::new();

    for (component_id, field) in referenced_peers(widget) {
        let value = peers
            .component_value(&component_id, Some(&field))
            .unwrap_or(Value::Null);
        values.insert(format!("{}.{}", component_id, field), value);
    }

    values.insert(
        format!("{}.drillDownState", widget.id),
        serde_json::to_value(widget.drill_state())?,
    );
    if let Some(drill_config) = widget.drill_config() {
        values.insert(
            format!("{}.drillDown", widget.id),
            serde_json::to_value(drill_config)?,
        );
    }

    Ok(values)
}

pub fn compute_fingerprint<P: ComponentValues + ?Sized>(
    widget: &ComponentConfig,
    peers: &P,
) -> Result<Fingerprint, BindingError> {
    Ok(Fingerprint {
        widget_id: widget.id.clone(),
        data_source: serde_json::to_string(&widget.data_source)?,
        peer_values: serde_json::to_string(&dependency_values(widget, peers)?)?,
    })
}

impl Fingerprint {
    /// The same fingerprint over a different data source configuration.
    pub fn with_data_source(&self, data_source: &DataSourceConfig) -> Result<Fingerprint, BindingError> {
        Ok(Fingerprint {
            data_source: serde_json::to_string(data_source)?,
            ..self.clone()
        })
    }
}

/// True when nothing was fetched yet or any part of the fingerprint changed.
pub fn should_refetch(previous: Option<&Fingerprint>, next: &Fingerprint) -> bool {
    previous != Some(next)
}
