//! FILENAME: core/data-service/src/lib.rs
//! Data access seams for the binding engine.
//!
//! Layers:
//! - `service`: The async `DataService` / `CatalogService` traits
//! - `catalog`: Dataset, table and column listings
//! - `filter`: Row predicates compiled from request filters
//! - `memory`: In-memory implementation of both services

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod service;

pub use catalog::{ColumnInfo, DatasetInfo, TableInfo};
pub use config::InMemoryConfig;
pub use error::DataServiceError;
pub use memory::{InMemoryDataService, MemoryDataset, MemoryTable};
pub use service::{CatalogService, DataService};
