//! FILENAME: core/binding-engine/src/view.rs
//! Binding View - what a widget shows after resolution.
//!
//! `BindingStatus` is the widget-local outcome of a refresh; every failure
//! lands here as a value so nothing propagates past the widget.

use serde::Serialize;
use serde_json::Value;

use report_model::{DatasetId, FieldMapping, QueryResponse, Row, SourceOrigin};

/// Rows plus the column roles needed to draw them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub dataset_id: DatasetId,
    pub table_name: Option<String>,
    pub origin: SourceOrigin,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Matching rows before paging.
    pub total: u64,
    /// Effective field mapping (after any conditional override).
    pub fields: FieldMapping,
    /// Category column at the current drill level.
    pub display_dimension: Option<String>,
}

impl ChartData {
    pub(crate) fn from_response(
        dataset_id: DatasetId,
        origin: SourceOrigin,
        fields: FieldMapping,
        display_dimension: Option<String>,
        response: QueryResponse,
    ) -> Self {
        ChartData {
            dataset_id,
            table_name: response.table_name,
            origin,
            columns: response.columns,
            rows: response.data,
            total: response.total,
            fields,
            display_dimension,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the column mapped to `role`, one per row (null when absent).
    pub fn series(&self, role: &str) -> Vec<Value> {
        match self.fields.get(role) {
            Some(column) => self.column(column),
            None => Vec::new(),
        }
    }

    /// Category labels: values of the active display dimension.
    pub fn categories(&self) -> Vec<Value> {
        match &self.display_dimension {
            Some(column) => self.column(column),
            None => Vec::new(),
        }
    }

    fn column(&self, column: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BindingStatus {
    /// Nothing resolved yet.
    Idle,
    Loading,
    Ready(ChartData),
    /// No source matched and there is no default.
    Unconfigured,
    /// Required roles of the widget type are not mapped; no query was sent.
    MissingFieldMapping(Vec<String>),
    Failed(String),
}

impl BindingStatus {
    pub fn chart_data(&self) -> Option<&ChartData> {
        match self {
            BindingStatus::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BindingStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, BindingStatus::Loading)
    }
}

impl Default for BindingStatus {
    fn default() -> Self {
        BindingStatus::Idle
    }
}
