//! FILENAME: tests/common/mod.rs
//! Sample datasets for data service integration tests.

use data_service::{ColumnInfo, InMemoryDataService, MemoryDataset, MemoryTable};
use serde_json::json;

/// Dataset 5: regional sales split across two tables plus a lookup table.
pub fn sales_service() -> InMemoryDataService {
    let global = MemoryTable::new(
        "global_sales",
        vec![
            ColumnInfo::new("id", "INTEGER").primary_key(),
            ColumnInfo::new("region", "TEXT"),
            ColumnInfo::new("country", "TEXT"),
            ColumnInfo::new("month", "TEXT"),
            ColumnInfo::new("amount", "REAL"),
        ],
    )
    .with_rows(vec![
        json!({"id": 1, "region": "EU", "country": "FR", "month": "2024-01", "amount": 120.0}),
        json!({"id": 2, "region": "EU", "country": "DE", "month": "2024-01", "amount": 80.0}),
        json!({"id": 3, "region": "Asia", "country": "CN", "month": "2024-01", "amount": 200.0}),
        json!({"id": 4, "region": "Asia", "country": "JP", "month": "2024-02", "amount": 150.0}),
        json!({"id": 5, "region": "EU", "country": "FR", "month": "2024-02", "amount": 95.5}),
        json!({"id": 6, "region": null, "country": "??", "month": "2024-02", "amount": 1.0}),
    ]);

    let eu = MemoryTable::new(
        "eu_sales",
        vec![
            ColumnInfo::new("country", "TEXT"),
            ColumnInfo::new("month", "TEXT"),
            ColumnInfo::new("amount", "REAL"),
        ],
    )
    .with_rows(vec![
        json!({"country": "FR", "month": "2024-01", "amount": 120.0}),
        json!({"country": "DE", "month": "2024-01", "amount": 80.0}),
    ]);

    let regions = MemoryTable::new(
        "regions",
        vec![ColumnInfo::new("region", "TEXT"), ColumnInfo::new("manager", "TEXT")],
    )
    .with_rows(vec![
        json!({"region": "EU", "manager": "Ines"}),
        json!({"region": "Asia", "manager": "Kenji"}),
    ]);

    InMemoryDataService::new()
        .with_dataset(
            MemoryDataset::new(5, "sales")
                .with_table(global)
                .with_table(eu)
                .with_table(regions),
        )
        .with_dataset(MemoryDataset::new(9, "empty"))
}
