//! FILENAME: core/binding-engine/src/error.rs

use data_service::DataServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("No data source matches and no default source is configured")]
    Unconfigured,

    #[error("Missing field mapping: {}", missing.join(", "))]
    MissingFieldMapping { missing: Vec<String> },

    #[error("Query failed: {0}")]
    Fetch(#[from] DataServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
