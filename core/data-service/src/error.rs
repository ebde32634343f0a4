//! FILENAME: core/data-service/src/error.rs

use report_model::DatasetId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataServiceError {
    #[error("Dataset {0} not found")]
    DatasetNotFound(DatasetId),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("No tables found in dataset {0}")]
    NoTables(DatasetId),

    #[error("Invalid filter on '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("Query error: {0}")]
    Query(String),
}
