//! FILENAME: core/report-model/src/query.rs
//! Request and response shapes exchanged with the data service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::condition::Filter;
use crate::data_source::DatasetId;

/// One result row, keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub dataset_id: DatasetId,
    /// When absent the service picks a table containing the filtered fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl QueryRequest {
    pub fn new(dataset_id: DatasetId, table_name: Option<&str>) -> Self {
        QueryRequest {
            dataset_id,
            table_name: table_name.map(str::to_string),
            filters: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_page(mut self, limit: Option<u32>, offset: Option<u32>) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Row>,
    /// Matching rows before paging.
    #[serde(default)]
    pub total: u64,
    /// The table actually queried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}
