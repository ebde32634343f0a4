//! FILENAME: tests/common/mod.rs
//! Shared fixtures for binding engine integration tests.

#![allow(dead_code)]

use data_service::{ColumnInfo, InMemoryDataService, MemoryDataset, MemoryTable};
use report_model::{ComponentConfig, ReportConfig};
use serde_json::{json, Value};

pub const REGION_PICKER: &str = "region-picker";
pub const SALES_CHART: &str = "sales-chart";
pub const REGION_PIE: &str = "region-pie";

fn sales_columns() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo::new("region", "TEXT"),
        ColumnInfo::new("country", "TEXT"),
        ColumnInfo::new("city", "TEXT"),
        ColumnInfo::new("month", "TEXT"),
        ColumnInfo::new("amount", "REAL"),
    ]
}

fn sale(region: &str, country: &str, city: &str, month: &str, amount: f64) -> Value {
    json!({"region": region, "country": country, "city": city, "month": month, "amount": amount})
}

/// Dataset 5 with a global table and per-region tables.
pub fn sales_service() -> InMemoryDataService {
    let global = MemoryTable::new("global_sales", sales_columns()).with_rows(vec![
        sale("Asia", "China", "Shanghai", "2024-01", 200.0),
        sale("Asia", "China", "Beijing", "2024-01", 140.0),
        sale("Asia", "Japan", "Tokyo", "2024-02", 150.0),
        sale("EU", "France", "Paris", "2024-01", 120.0),
        sale("EU", "Germany", "Berlin", "2024-02", 80.0),
    ]);
    let asia = MemoryTable::new("asia_sales", sales_columns()).with_rows(vec![
        sale("Asia", "China", "Shanghai", "2024-01", 200.0),
        sale("Asia", "Japan", "Tokyo", "2024-02", 150.0),
    ]);
    let eu = MemoryTable::new("eu_sales", sales_columns()).with_rows(vec![sale(
        "EU", "France", "Paris", "2024-01", 120.0,
    )]);

    InMemoryDataService::new().with_dataset(
        MemoryDataset::new(5, "sales")
            .with_table(global)
            .with_table(asia)
            .with_table(eu),
    )
}

/// A region dropdown, a line chart switching tables on the dropdown, and a
/// drillable pie chart without a table name.
pub fn sample_report(region: &str) -> ReportConfig {
    let text = json!({
        "components": [
            {
                "id": REGION_PICKER,
                "type": "dropdown",
                "dataSource": {"datasetId": 5, "tableName": "global_sales", "fields": {"option": "region"}},
                "props": {"value": region}
            },
            {
                "id": SALES_CHART,
                "type": "line_chart",
                "dataSource": {
                    "type": "conditional",
                    "fields": {"x": "month", "y": "amount"},
                    "conditionalSources": [{
                        "conditions": [{
                            "valueType": "component",
                            "componentId": REGION_PICKER,
                            "componentField": "value",
                            "operator": "=",
                            "componentValueMode": "fixed",
                            "componentTargetValue": "Asia"
                        }],
                        "datasetId": 5,
                        "tableName": "asia_sales"
                    }],
                    "defaultSource": {"datasetId": 5, "tableName": "global_sales"}
                }
            },
            {
                "id": REGION_PIE,
                "type": "pie_chart",
                "dataSource": {"datasetId": 5, "fields": {"category": "region", "value": "amount"}},
                "interaction": {
                    "drillDown": {
                        "enabled": true,
                        "type": "self",
                        "dimensions": {"level1": "region", "level2": "country", "level3": "city"}
                    }
                }
            }
        ]
    })
    .to_string();

    ReportConfig::from_json(&text).expect("sample report parses")
}

pub fn component(report: &ReportConfig, id: &str) -> ComponentConfig {
    report.component(id).cloned().expect("component exists")
}
