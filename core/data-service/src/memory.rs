//! FILENAME: core/data-service/src/memory.rs
//! In-memory data and catalog service.
//!
//! Holds datasets as lists of tables with declared columns and JSON rows.
//! Used by tests and demos, and as the executable description of how the
//! backend picks a table when a request names none.

use async_trait::async_trait;
use serde_json::Value;

use report_model::{log_debug, log_info};
use report_model::{DatasetId, Filter, QueryRequest, QueryResponse, Row};

use crate::catalog::{ColumnInfo, DatasetInfo, TableInfo};
use crate::config::InMemoryConfig;
use crate::error::DataServiceError;
use crate::filter::compile_filters;
use crate::service::{CatalogService, DataService};

// ============================================================================
// STORAGE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    pub name: String,
    pub display_name: String,
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
}

impl MemoryTable {
    pub fn new(name: &str, columns: Vec<ColumnInfo>) -> Self {
        MemoryTable {
            name: name.to_string(),
            display_name: name.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Adds rows given as JSON objects; anything else is skipped.
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Value>) -> Self {
        self.rows.extend(rows.into_iter().filter_map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        }));
        self
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            table_name: self.name.clone(),
            display_name: self.display_name.clone(),
            fields: self.columns.clone(),
        }
    }

    fn has_field(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c.name.eq_ignore_ascii_case(field))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDataset {
    pub info: DatasetInfo,
    pub tables: Vec<MemoryTable>,
}

impl MemoryDataset {
    pub fn new(id: DatasetId, name: &str) -> Self {
        MemoryDataset {
            info: DatasetInfo {
                id,
                name: name.to_string(),
                description: String::new(),
            },
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: MemoryTable) -> Self {
        self.tables.push(table);
        self
    }

    fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

// ============================================================================
// SERVICE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryDataService {
    config: InMemoryConfig,
    datasets: Vec<MemoryDataset>,
}

impl InMemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: InMemoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_dataset(mut self, dataset: MemoryDataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    fn dataset(&self, id: DatasetId) -> Result<&MemoryDataset, DataServiceError> {
        self.datasets
            .iter()
            .find(|d| d.info.id == id)
            .ok_or(DataServiceError::DatasetNotFound(id))
    }

    /// Picks the table a request without `table_name` should read.
    ///
    /// Preference order: the first table containing every filter field, then
    /// the table containing the most filter fields, then the first table.
    pub fn select_table<'a>(
        &self,
        dataset: &'a MemoryDataset,
        filters: &[Filter],
    ) -> Result<&'a MemoryTable, DataServiceError> {
        let first = dataset
            .tables
            .first()
            .ok_or(DataServiceError::NoTables(dataset.info.id))?;

        let fields: Vec<&str> = filters
            .iter()
            .map(|f| f.field.as_str())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            return Ok(first);
        }

        if let Some(table) = dataset
            .tables
            .iter()
            .find(|t| fields.iter().all(|f| t.has_field(f)))
        {
            return Ok(table);
        }

        let mut best: Option<(&MemoryTable, usize)> = None;
        for table in &dataset.tables {
            let count = fields.iter().filter(|f| table.has_field(f)).count();
            // strictly greater keeps the earliest table on ties
            if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((table, count));
            }
        }

        Ok(best.map(|(table, _)| table).unwrap_or(first))
    }
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, DataServiceError> {
        let dataset = self.dataset(request.dataset_id)?;

        let table = match request.table_name.as_deref().filter(|t| !t.is_empty()) {
            Some(name) => dataset
                .table(name)
                .ok_or_else(|| DataServiceError::TableNotFound(name.to_string()))?,
            None => {
                let table = self.select_table(dataset, &request.filters)?;
                log_info!(
                    "DATA",
                    "auto-selected table={} dataset={} filters={}",
                    table.name,
                    dataset.info.id,
                    request.filters.len()
                );
                table
            }
        };

        let filters = compile_filters(&request.filters)?;
        let matching: Vec<&Row> = table
            .rows
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .collect();

        let limit = request.limit.unwrap_or(self.config.default_limit) as usize;
        let offset = request.offset.unwrap_or(self.config.default_offset) as usize;

        let data: Vec<Row> = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|row| (*row).clone())
            .collect();

        log_debug!(
            "DATA",
            "query dataset={} table={} matched={} returned={}",
            dataset.info.id,
            table.name,
            matching.len(),
            data.len()
        );

        Ok(QueryResponse {
            columns: table.columns.iter().map(|c| c.name.clone()).collect(),
            data,
            total: matching.len() as u64,
            table_name: Some(table.name.clone()),
        })
    }
}

#[async_trait]
impl CatalogService for InMemoryDataService {
    async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, DataServiceError> {
        Ok(self.datasets.iter().map(|d| d.info.clone()).collect())
    }

    async fn list_tables(&self, dataset_id: DatasetId) -> Result<Vec<TableInfo>, DataServiceError> {
        Ok(self.dataset(dataset_id)?.tables.iter().map(MemoryTable::info).collect())
    }

    async fn list_columns(
        &self,
        dataset_id: DatasetId,
        table_name: &str,
    ) -> Result<Vec<ColumnInfo>, DataServiceError> {
        self.dataset(dataset_id)?
            .table(table_name)
            .map(|t| t.columns.clone())
            .ok_or_else(|| DataServiceError::TableNotFound(table_name.to_string()))
    }

    async fn find_tables_by_field(
        &self,
        dataset_id: DatasetId,
        field: &str,
    ) -> Result<Vec<TableInfo>, DataServiceError> {
        Ok(self
            .dataset(dataset_id)?
            .tables
            .iter()
            .filter(|t| t.has_field(field))
            .map(MemoryTable::info)
            .collect())
    }
}
