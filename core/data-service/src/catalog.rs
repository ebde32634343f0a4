//! FILENAME: core/data-service/src/catalog.rs
//! Catalog listings: datasets, their tables and the columns of each table.

use serde::{Deserialize, Serialize};

use report_model::DatasetId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub notnull: bool,
    #[serde(default)]
    pub pk: bool,
}

impl ColumnInfo {
    pub fn new(name: &str, column_type: &str) -> Self {
        ColumnInfo {
            name: name.to_string(),
            column_type: column_type.to_string(),
            notnull: false,
            pk: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.pk = true;
        self.notnull = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    pub display_name: String,
    pub fields: Vec<ColumnInfo>,
}

impl TableInfo {
    /// Case-insensitive column lookup.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|c| c.name.eq_ignore_ascii_case(field))
    }
}
