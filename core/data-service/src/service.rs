//! FILENAME: core/data-service/src/service.rs
//! The two external collaborators of the binding engine.
//!
//! Both are async seams: the engine never cares whether rows come from a
//! REST backend or from memory.

use async_trait::async_trait;

use report_model::{DatasetId, QueryRequest, QueryResponse};

use crate::catalog::{ColumnInfo, DatasetInfo, TableInfo};
use crate::error::DataServiceError;

/// Answers table queries.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Runs `request`. When `request.table_name` is `None` the service picks
    /// a table and reports it in `QueryResponse::table_name`.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, DataServiceError>;
}

/// Lists what can be queried.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, DataServiceError>;

    async fn list_tables(&self, dataset_id: DatasetId) -> Result<Vec<TableInfo>, DataServiceError>;

    async fn list_columns(
        &self,
        dataset_id: DatasetId,
        table_name: &str,
    ) -> Result<Vec<ColumnInfo>, DataServiceError>;

    /// Tables of a dataset containing `field` (case-insensitive).
    async fn find_tables_by_field(
        &self,
        dataset_id: DatasetId,
        field: &str,
    ) -> Result<Vec<TableInfo>, DataServiceError>;
}
