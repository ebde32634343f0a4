//! FILENAME: core/report-model/src/data_source.rs
//! Data Source Definition - where a widget's rows come from.
//!
//! A data source is either a fixed table or an ordered list of conditional
//! sources with a default fallback. Order in `conditional_sources` is
//! significant: the first source whose conditions match wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::{DataSourceCondition, Filter};

/// Identifier of a dataset in the catalog.
pub type DatasetId = i64;

/// Chart role (e.g. "x", "category") to column name.
/// A BTreeMap keeps serialization key-ordered.
pub type FieldMapping = BTreeMap<String, String>;

// ============================================================================
// CONDITIONAL SOURCES
// ============================================================================

/// How the conditions of one conditional source are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Default for LogicOperator {
    fn default() -> Self {
        LogicOperator::And
    }
}

/// A bare dataset/table pair, used for the default source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub dataset_id: DatasetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl SourceRef {
    pub fn new(dataset_id: DatasetId, table_name: Option<&str>) -> Self {
        SourceRef {
            dataset_id,
            table_name: table_name.map(str::to_string),
        }
    }
}

/// One candidate source, selected when its conditions match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawConditionalSource")]
pub struct ConditionalDataSource {
    pub conditions: Vec<DataSourceCondition>,
    pub logic_operator: LogicOperator,
    pub dataset_id: DatasetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Overrides the widget's own field mapping when this source is chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldMapping>,
}

impl ConditionalDataSource {
    pub fn new(dataset_id: DatasetId, table_name: Option<&str>) -> Self {
        ConditionalDataSource {
            conditions: Vec::new(),
            logic_operator: LogicOperator::And,
            dataset_id,
            table_name: table_name.map(str::to_string),
            fields: None,
        }
    }

    pub fn with_condition(mut self, condition: DataSourceCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_logic(mut self, logic_operator: LogicOperator) -> Self {
        self.logic_operator = logic_operator;
        self
    }

    pub fn with_fields(mut self, fields: FieldMapping) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// Accepts both `conditions: [...]` and the older single `condition: {...}`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConditionalSource {
    #[serde(default)]
    conditions: Vec<DataSourceCondition>,
    #[serde(default)]
    condition: Option<DataSourceCondition>,
    #[serde(default)]
    logic_operator: LogicOperator,
    dataset_id: DatasetId,
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    fields: Option<FieldMapping>,
}

impl From<RawConditionalSource> for ConditionalDataSource {
    fn from(raw: RawConditionalSource) -> Self {
        let mut conditions = raw.conditions;
        if conditions.is_empty() {
            conditions.extend(raw.condition);
        }
        ConditionalDataSource {
            conditions,
            logic_operator: raw.logic_operator,
            dataset_id: raw.dataset_id,
            table_name: raw.table_name,
            fields: raw.fields,
        }
    }
}

// ============================================================================
// DATA SOURCE CONFIG
// ============================================================================

/// Fixed table or conditional selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Table {
        dataset_id: Option<DatasetId>,
        table_name: Option<String>,
    },
    Conditional {
        conditional_sources: Vec<ConditionalDataSource>,
        default_source: Option<SourceRef>,
    },
}

/// Which slot of a data source configuration produced a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceOrigin {
    Fixed,
    Conditional(usize),
    Default,
}

/// The complete data binding of a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDataSource", into = "RawDataSource")]
pub struct DataSourceConfig {
    pub kind: SourceKind,
    pub fields: FieldMapping,
    pub filters: Vec<Filter>,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        DataSourceConfig {
            kind: SourceKind::Table {
                dataset_id: None,
                table_name: None,
            },
            fields: FieldMapping::new(),
            filters: Vec::new(),
        }
    }
}

impl DataSourceConfig {
    pub fn table(dataset_id: DatasetId, table_name: Option<&str>) -> Self {
        DataSourceConfig {
            kind: SourceKind::Table {
                dataset_id: Some(dataset_id),
                table_name: table_name.map(str::to_string),
            },
            ..DataSourceConfig::default()
        }
    }

    pub fn conditional(
        conditional_sources: Vec<ConditionalDataSource>,
        default_source: Option<SourceRef>,
    ) -> Self {
        DataSourceConfig {
            kind: SourceKind::Conditional {
                conditional_sources,
                default_source,
            },
            ..DataSourceConfig::default()
        }
    }

    pub fn with_field(mut self, role: &str, column: &str) -> Self {
        self.fields.insert(role.to_string(), column.to_string());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self.kind, SourceKind::Conditional { .. })
    }

    /// Conditional sources in declaration order (empty for fixed tables).
    pub fn conditional_sources(&self) -> &[ConditionalDataSource] {
        match &self.kind {
            SourceKind::Conditional {
                conditional_sources,
                ..
            } => conditional_sources,
            SourceKind::Table { .. } => &[],
        }
    }

    /// Returns a copy with `table_name` stored on the given slot.
    /// A slot that does not exist leaves the copy unchanged.
    pub fn with_table_name(&self, origin: SourceOrigin, table_name: &str) -> Self {
        let mut updated = self.clone();
        match (&mut updated.kind, origin) {
            (SourceKind::Table { table_name: slot, .. }, SourceOrigin::Fixed) => {
                *slot = Some(table_name.to_string());
            }
            (
                SourceKind::Conditional {
                    conditional_sources,
                    ..
                },
                SourceOrigin::Conditional(index),
            ) => {
                if let Some(source) = conditional_sources.get_mut(index) {
                    source.table_name = Some(table_name.to_string());
                }
            }
            (
                SourceKind::Conditional {
                    default_source: Some(default),
                    ..
                },
                SourceOrigin::Default,
            ) => {
                default.table_name = Some(table_name.to_string());
            }
            _ => {}
        }
        updated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum DataSourceType {
    #[default]
    Table,
    Conditional,
}

/// The flat record the canvas reads and writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataSource {
    #[serde(default, rename = "type")]
    source_type: DataSourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_id: Option<DatasetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_name: Option<String>,
    #[serde(default)]
    fields: FieldMapping,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conditional_sources: Vec<ConditionalDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_source: Option<SourceRef>,
}

impl From<RawDataSource> for DataSourceConfig {
    fn from(raw: RawDataSource) -> Self {
        let kind = match raw.source_type {
            DataSourceType::Table => SourceKind::Table {
                dataset_id: raw.dataset_id,
                table_name: raw.table_name.filter(|t| !t.is_empty()),
            },
            DataSourceType::Conditional => SourceKind::Conditional {
                conditional_sources: raw.conditional_sources,
                default_source: raw.default_source,
            },
        };
        DataSourceConfig {
            kind,
            fields: raw.fields,
            filters: raw.filters,
        }
    }
}

impl From<DataSourceConfig> for RawDataSource {
    fn from(config: DataSourceConfig) -> Self {
        let mut raw = RawDataSource {
            fields: config.fields,
            filters: config.filters,
            ..RawDataSource::default()
        };
        match config.kind {
            SourceKind::Table {
                dataset_id,
                table_name,
            } => {
                raw.source_type = DataSourceType::Table;
                raw.dataset_id = dataset_id;
                raw.table_name = table_name;
            }
            SourceKind::Conditional {
                conditional_sources,
                default_source,
            } => {
                raw.source_type = DataSourceType::Conditional;
                raw.conditional_sources = conditional_sources;
                raw.default_source = default_source;
            }
        }
        raw
    }
}
